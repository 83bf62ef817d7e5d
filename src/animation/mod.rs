//! Layer animation engine.
//!
//! An [`AnimationGroup`] animates one or more layer properties together over
//! a shared duration. Groups are attached to a layer under a key with
//! [`LayerTree::add_animation`](crate::layer::LayerTree::add_animation) and
//! advanced by [`LayerTree::tick`](crate::layer::LayerTree::tick). While a
//! group is attached it overrides the layer's model values in the
//! presentation; the model itself is never written by an animation.

mod animatable;
pub mod hooks;
mod state;
mod timing;

use std::time::Duration;

use bitflags::bitflags;

pub use animatable::Animatable;
pub use hooks::AnimationHooks;
pub(crate) use state::{ActiveAnimation, Phase};
pub use timing::TimingFunction;

use crate::geometry::Rect;

bitflags! {
    /// Set of animatable layer properties.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Properties: u8 {
        const BOUNDS = 1 << 0;
        const CORNER_RADIUS = 1 << 1;
        const OPACITY = 1 << 2;
        const SCALE = 1 << 3;
    }
}

/// Snapshot of the animatable properties of a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyValues {
    pub bounds: Rect,
    pub corner_radius: f32,
    pub opacity: f32,
    pub scale: f32,
}

/// Start and end value of one property. A missing `from` is resolved to the
/// layer's presentation value when the animation is attached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween<T> {
    pub from: Option<T>,
    pub to: T,
}

impl<T: Animatable> Tween<T> {
    pub fn to(to: T) -> Self {
        Self { from: None, to }
    }

    pub fn between(from: T, to: T) -> Self {
        Self {
            from: Some(from),
            to,
        }
    }
}

/// A single property animation inside a group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyAnimation {
    Bounds(Tween<Rect>),
    CornerRadius(Tween<f32>),
    Opacity(Tween<f32>),
    Scale(Tween<f32>),
}

impl PropertyAnimation {
    pub fn bounds(to: Rect) -> Self {
        Self::Bounds(Tween::to(to))
    }

    pub fn corner_radius(to: f32) -> Self {
        Self::CornerRadius(Tween::to(to))
    }

    pub fn opacity(from: f32, to: f32) -> Self {
        Self::Opacity(Tween::between(from, to))
    }

    pub fn opacity_to(to: f32) -> Self {
        Self::Opacity(Tween::to(to))
    }

    pub fn scale(from: f32, to: f32) -> Self {
        Self::Scale(Tween::between(from, to))
    }

    pub fn scale_to(to: f32) -> Self {
        Self::Scale(Tween::to(to))
    }

    pub fn property(&self) -> Properties {
        match self {
            PropertyAnimation::Bounds(_) => Properties::BOUNDS,
            PropertyAnimation::CornerRadius(_) => Properties::CORNER_RADIUS,
            PropertyAnimation::Opacity(_) => Properties::OPACITY,
            PropertyAnimation::Scale(_) => Properties::SCALE,
        }
    }

    /// Fill in a missing `from` with the given presentation value.
    pub(crate) fn resolve(self, current: &PropertyValues) -> Self {
        match self {
            PropertyAnimation::Bounds(t) => PropertyAnimation::Bounds(Tween {
                from: Some(t.from.unwrap_or(current.bounds)),
                to: t.to,
            }),
            PropertyAnimation::CornerRadius(t) => PropertyAnimation::CornerRadius(Tween {
                from: Some(t.from.unwrap_or(current.corner_radius)),
                to: t.to,
            }),
            PropertyAnimation::Opacity(t) => PropertyAnimation::Opacity(Tween {
                from: Some(t.from.unwrap_or(current.opacity)),
                to: t.to,
            }),
            PropertyAnimation::Scale(t) => PropertyAnimation::Scale(Tween {
                from: Some(t.from.unwrap_or(current.scale)),
                to: t.to,
            }),
        }
    }

    /// Write the interpolated value at eased progress `t` into `values`.
    pub(crate) fn apply(&self, values: &mut PropertyValues, t: f32) {
        fn sample<T: Animatable>(tween: &Tween<T>, current: &T, t: f32) -> T {
            let from = tween.from.as_ref().unwrap_or(current);
            T::lerp(from, &tween.to, t)
        }

        match self {
            PropertyAnimation::Bounds(tw) => values.bounds = sample(tw, &values.bounds, t),
            PropertyAnimation::CornerRadius(tw) => {
                values.corner_radius = sample(tw, &values.corner_radius, t)
            }
            PropertyAnimation::Opacity(tw) => values.opacity = sample(tw, &values.opacity, t),
            PropertyAnimation::Scale(tw) => values.scale = sample(tw, &values.scale, t),
        }
    }
}

/// What happens to an animation's effect once its active duration ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Detach the animation; the layer snaps back to its model values.
    #[default]
    Removed,
    /// Keep the animation attached, holding its end values, until it is
    /// explicitly removed.
    Forwards,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RepeatCount {
    #[default]
    Once,
    Times(u32),
    Forever,
}

/// Properties animated together over one shared duration.
#[derive(Debug)]
pub struct AnimationGroup {
    pub animations: Vec<PropertyAnimation>,
    pub duration: Duration,
    pub timing: TimingFunction,
    pub fill_mode: FillMode,
    pub repeat: RepeatCount,
    pub hooks: AnimationHooks,
}

impl AnimationGroup {
    pub fn new(duration: Duration) -> Self {
        Self {
            animations: Vec::new(),
            duration,
            timing: TimingFunction::default(),
            fill_mode: FillMode::default(),
            repeat: RepeatCount::default(),
            hooks: AnimationHooks::default(),
        }
    }

    pub fn animate(mut self, animation: PropertyAnimation) -> Self {
        self.animations.push(animation);
        self
    }

    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    pub fn fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    /// Shorthand for `fill_mode(FillMode::Forwards)`.
    pub fn hold(self) -> Self {
        self.fill_mode(FillMode::Forwards)
    }

    pub fn repeat(mut self, repeat: RepeatCount) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn hooks(mut self, hooks: AnimationHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce(bool) + 'static) -> Self {
        self.hooks = self.hooks.on_complete(f);
        self
    }

    pub fn properties(&self) -> Properties {
        self.animations
            .iter()
            .fold(Properties::empty(), |acc, a| acc | a.property())
    }

    /// Total active time, or `None` for groups that repeat forever.
    pub fn total_duration(&self) -> Option<Duration> {
        match self.repeat {
            RepeatCount::Once => Some(self.duration),
            RepeatCount::Times(n) => Some(self.duration * n.max(1)),
            RepeatCount::Forever => None,
        }
    }
}
