// ============================================================================
// Delayed jobs and UI-thread dispatch
// ============================================================================
//
// Two layers:
//
// - `TimerQueue<J>` is a plain deadline queue of jobs. It owns no clock; the
//   caller passes `now` in. The ripple button keeps its delayed steps here so
//   that a stop or reset can cancel them and tests can drive time exactly.
//
// - `Dispatcher<D>` schedules closures on a calloop event loop: one-shot
//   delays on the loop thread, "run on the next iteration", and background
//   work whose result is handed back to the loop thread.

use std::time::{Duration, Instant};

use calloop::channel::{self, Sender};
use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};

use crate::error::Result;

/// Handle to a job scheduled in a [`TimerQueue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

struct Entry<J> {
    token: TimerToken,
    deadline: Instant,
    job: J,
}

/// One-shot delayed jobs, released in deadline order.
///
/// Jobs with the same deadline are released in the order they were
/// scheduled.
pub struct TimerQueue<J> {
    entries: Vec<Entry<J>>,
    next_token: u64,
}

impl<J> TimerQueue<J> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_token: 0,
        }
    }

    /// Schedule `job` to become due `delay` after `now`.
    pub fn after(&mut self, now: Instant, delay: Duration, job: J) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.entries.push(Entry {
            token,
            deadline: now + delay,
            job,
        });
        token
    }

    /// Cancel a pending job. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remove and return every job whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<J> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.deadline <= now);
        self.entries = pending;
        due.sort_by_key(|e| (e.deadline, e.token));
        due.into_iter().map(|e| e.job).collect()
    }

    /// Remove the earliest job due at or before `now`, with its deadline.
    ///
    /// Lets a caller process jobs one at a time when handling a job may
    /// schedule further jobs that are already due.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, J)> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.token))
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(pos);
        Some((entry.deadline, entry.job))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<J> Default for TimerQueue<J> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a callback scheduled on a [`Dispatcher`].
#[derive(Debug)]
pub struct TimerHandle(RegistrationToken);

type Task<D> = Box<dyn FnOnce(&mut D) + Send>;

/// Schedules closures on a calloop event loop.
///
/// All callbacks run on the thread that dispatches the loop, with mutable
/// access to the loop's shared data `D`.
pub struct Dispatcher<D: 'static> {
    handle: LoopHandle<'static, D>,
    results: Sender<Task<D>>,
}

impl<D: 'static> Dispatcher<D> {
    /// Register the background result channel on the loop.
    pub fn new(handle: LoopHandle<'static, D>) -> Result<Self> {
        let (results, receiver) = channel::channel::<Task<D>>();
        handle
            .insert_source(receiver, |event, _, data| {
                if let channel::Event::Msg(task) = event {
                    task(data);
                }
            })
            .map_err(|e| e.error)?;
        Ok(Self { handle, results })
    }

    /// Run `action` once on the loop thread, no earlier than `delay` from now.
    pub fn after<F>(&self, delay: Duration, action: F) -> Result<TimerHandle>
    where
        F: FnOnce(&mut D) + 'static,
    {
        let mut action = Some(action);
        let token = self
            .handle
            .insert_source(Timer::from_duration(delay), move |_, _, data| {
                if let Some(action) = action.take() {
                    action(data);
                }
                TimeoutAction::Drop
            })
            .map_err(|e| e.error)?;
        Ok(TimerHandle(token))
    }

    /// Run `action` on the next loop iteration.
    pub fn main<F>(&self, action: F) -> Result<TimerHandle>
    where
        F: FnOnce(&mut D) + 'static,
    {
        self.after(Duration::ZERO, action)
    }

    /// Cancel a callback that has not fired yet. Cancelling a fired
    /// callback is a no-op.
    pub fn cancel(&self, timer: TimerHandle) {
        self.handle.remove(timer.0);
    }

    /// Run `work` on a worker thread and hand its result to `then` on the
    /// loop thread.
    pub fn run_in_background<T, W, F>(&self, work: W, then: F)
    where
        T: Send + 'static,
        W: FnOnce() -> T + Send + 'static,
        F: FnOnce(T, &mut D) + Send + 'static,
    {
        let results = self.results.clone();
        std::thread::spawn(move || {
            let value = work();
            let task: Task<D> = Box::new(move |data| then(value, data));
            if results.send(task).is_err() {
                log::warn!("event loop closed before background result was delivered");
            }
        });
    }
}
