//! Circle ripple button effect on a headless layer tree.
//!
//! A [`RippleButton`](button::RippleButton) morphs its rectangle into a
//! circle, emits expanding rings while an action runs, and then either grows
//! over a destination view or animates back to its original shape. Rendering
//! is left to the host: [`LayerTree::display_list`](layer::LayerTree::display_list)
//! flattens the current presentation into draw commands.

pub mod animation;
pub mod button;
pub mod color;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod scheduler;
pub mod transform;

pub use error::{Result, RippleError};

pub mod prelude {
    pub use crate::animation::{
        AnimationGroup, AnimationHooks, FillMode, PropertyAnimation, RepeatCount, TimingFunction,
    };
    pub use crate::button::{
        ButtonConfig, ButtonState, ButtonVisualState, HostView, RippleButton, SequenceTimings,
    };
    pub use crate::color::Color;
    pub use crate::geometry::{circle_path, square_bounds, Path, Point, Rect, Size};
    pub use crate::layer::{Clip, DrawCommand, Layer, LayerId, LayerTree};
    pub use crate::scheduler::{Dispatcher, TimerQueue};
    pub use crate::{Result, RippleError};
}

/// Initialise `env_logger` from `RUST_LOG`. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}
