//! Lifecycle callbacks attached to an animation group.
//!
//! Hooks are plain closures stored on the group when it is built. The layer
//! tree invokes them while ticking or when the animation is torn down, so the
//! closures must not expect access to the tree itself. Code that needs to react
//! by mutating layers should push a job and handle it after the tick (see
//! `RippleButton::advance`).

use std::fmt;

type StartHook = Box<dyn FnOnce()>;
type ProgressHook = Box<dyn FnMut(f32)>;
type CompleteHook = Box<dyn FnOnce(bool)>;

#[derive(Default)]
pub struct AnimationHooks {
    on_start: Option<StartHook>,
    on_progress: Option<ProgressHook>,
    on_complete: Option<CompleteHook>,
}

impl AnimationHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once, on the first tick after the animation is attached, or
    /// just before the completion hook if it is removed earlier.
    pub fn on_start(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    /// Called every tick while running with the fraction of the current
    /// cycle that has elapsed, in `[0, 1)`.
    pub fn on_progress(mut self, f: impl FnMut(f32) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Called once when the animation ends. The flag is `true` if it ran its
    /// full active duration, `false` if it was removed or replaced first.
    pub fn on_complete(mut self, f: impl FnOnce(bool) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn has_progress(&self) -> bool {
        self.on_progress.is_some()
    }

    pub(crate) fn fire_start(&mut self) {
        if let Some(f) = self.on_start.take() {
            f();
        }
    }

    pub(crate) fn fire_progress(&mut self, fraction: f32) {
        if let Some(f) = self.on_progress.as_mut() {
            f(fraction);
        }
    }

    /// Fires the completion hook and disarms progress polling.
    pub(crate) fn fire_complete(&mut self, finished: bool) {
        self.on_progress = None;
        if let Some(f) = self.on_complete.take() {
            f(finished);
        }
    }
}

impl fmt::Debug for AnimationHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationHooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}
