use thiserror::Error;

use crate::button::ButtonState;
use crate::layer::LayerId;

pub type Result<T> = std::result::Result<T, RippleError>;

#[derive(Debug, Error)]
pub enum RippleError {
    #[error("cannot {action} while {state:?}")]
    InvalidStateTransition {
        action: &'static str,
        state: ButtonState,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("layer {0:?} is not in the tree")]
    UnknownLayer(LayerId),

    #[error("event loop error: {0}")]
    EventLoop(#[from] calloop::Error),
}
