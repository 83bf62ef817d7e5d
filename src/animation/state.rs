use std::time::{Duration, Instant};

use super::{
    AnimationGroup, AnimationHooks, FillMode, Properties, PropertyAnimation, PropertyValues,
    RepeatCount, TimingFunction,
};

/// Lifecycle of an attached animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Attached but not yet ticked; samples its start values
    Pending,
    Running,
    /// Active duration over, end values held (`FillMode::Forwards`)
    Held,
    /// Finished or cancelled; to be dropped by the owner
    Done,
}

/// An animation group attached to a layer, with its `from` values resolved.
#[derive(Debug)]
pub(crate) struct ActiveAnimation {
    pub key: String,
    animations: Vec<PropertyAnimation>,
    duration: Duration,
    timing: TimingFunction,
    fill_mode: FillMode,
    repeat: RepeatCount,
    hooks: AnimationHooks,
    attached_at: Instant,
    /// Eased progress within the current cycle
    progress: f32,
    phase: Phase,
}

impl ActiveAnimation {
    pub fn attach(
        key: impl Into<String>,
        group: AnimationGroup,
        current: &PropertyValues,
        now: Instant,
    ) -> Self {
        let animations = group
            .animations
            .into_iter()
            .map(|a| a.resolve(current))
            .collect();
        Self {
            key: key.into(),
            animations,
            duration: group.duration,
            timing: group.timing,
            fill_mode: group.fill_mode,
            repeat: group.repeat,
            hooks: group.hooks,
            attached_at: now,
            progress: 0.0,
            phase: Phase::Pending,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn properties(&self) -> Properties {
        self.animations
            .iter()
            .fold(Properties::empty(), |acc, a| acc | a.property())
    }

    /// Advance to `now`, firing hooks. Returns false once the animation
    /// should be detached.
    pub fn advance(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Done => return false,
            Phase::Held => return true,
            Phase::Pending => {
                self.phase = Phase::Running;
                self.hooks.fire_start();
            }
            Phase::Running => {}
        }

        let elapsed = now.saturating_duration_since(self.attached_at);
        let finished = match self.repeat {
            RepeatCount::Once => elapsed >= self.duration,
            RepeatCount::Times(n) => elapsed >= self.duration * n.max(1),
            RepeatCount::Forever => false,
        };

        if finished {
            self.progress = self.timing.evaluate(1.0);
            self.phase = match self.fill_mode {
                FillMode::Forwards => Phase::Held,
                FillMode::Removed => Phase::Done,
            };
            self.hooks.fire_complete(true);
            return self.phase != Phase::Done;
        }

        let fraction = cycle_fraction(elapsed, self.duration);
        self.progress = self.timing.evaluate(fraction);
        self.hooks.fire_progress(fraction);
        true
    }

    /// Overlay this animation's current sample onto `values`.
    pub fn apply(&self, values: &mut PropertyValues) {
        if self.phase == Phase::Done {
            return;
        }
        for animation in &self.animations {
            animation.apply(values, self.progress);
        }
    }

    /// Stop early. Fires the completion hook with `finished = false` unless
    /// the animation already completed. A group removed before its first
    /// tick still reports its start first.
    pub fn cancel(&mut self) {
        if self.phase == Phase::Pending {
            self.hooks.fire_start();
        }
        if matches!(self.phase, Phase::Pending | Phase::Running) {
            self.hooks.fire_complete(false);
        }
        self.phase = Phase::Done;
    }
}

fn cycle_fraction(elapsed: Duration, cycle: Duration) -> f32 {
    if cycle.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / cycle.as_secs_f64()).fract() as f32
}
