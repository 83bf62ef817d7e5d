use std::time::Duration;

use crate::error::{Result, RippleError};

/// Durations and delays of the press sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceTimings {
    /// Rectangle to circle morph
    pub morph: Duration,
    /// Delay from `start` to the rippling phase. Shorter than `morph` so the
    /// overlay's model bounds are already square when the first ring appears.
    pub ripple_delay: Duration,
    /// Ring spawn times, measured from entry into the rippling phase
    pub ripple_offsets: Vec<Duration>,
    /// One expand-and-fade cycle of a ring
    pub ripple_period: Duration,
    /// Overlay shrink when rippling begins
    pub collapse: Duration,
    /// Grow-and-fade into the destination view
    pub expand: Duration,
    /// Circle back to the original rectangle
    pub restore: Duration,
}

impl Default for SequenceTimings {
    fn default() -> Self {
        Self {
            morph: Duration::from_millis(300),
            ripple_delay: Duration::from_millis(200),
            ripple_offsets: vec![
                Duration::from_millis(100),
                Duration::from_millis(300),
                Duration::from_millis(500),
            ],
            ripple_period: Duration::from_millis(800),
            collapse: Duration::from_millis(200),
            expand: Duration::from_millis(300),
            restore: Duration::from_millis(300),
        }
    }
}

/// Configuration for a [`RippleButton`](super::RippleButton).
///
/// # Example
/// ```ignore
/// let config = ButtonConfig::new()
///     .corner_radius(8.0)
///     .border_width(1.0)
///     .ripple_line_width(2.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonConfig {
    /// Corner radius of the button; the button clips its sublayers when > 0
    pub corner_radius: f32,
    pub border_width: f32,
    /// Stroke width of the ripple rings
    pub ripple_line_width: f32,
    /// Shrink the circular overlay away once rings start, leaving only the
    /// rings visible
    pub collapse_on_ripple: bool,
    pub timings: SequenceTimings,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            corner_radius: 0.0,
            border_width: 0.0,
            ripple_line_width: 3.0,
            collapse_on_ripple: true,
            timings: SequenceTimings::default(),
        }
    }
}

impl ButtonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn border_width(mut self, width: f32) -> Self {
        self.border_width = width;
        self
    }

    pub fn ripple_line_width(mut self, width: f32) -> Self {
        self.ripple_line_width = width;
        self
    }

    pub fn collapse_on_ripple(mut self, collapse: bool) -> Self {
        self.collapse_on_ripple = collapse;
        self
    }

    pub fn timings(mut self, timings: SequenceTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_length("corner radius", self.corner_radius)?;
        check_length("border width", self.border_width)?;
        check_length("ripple line width", self.ripple_line_width)?;
        if self.timings.ripple_period.is_zero() {
            return Err(RippleError::InvalidConfiguration(
                "ripple period must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn check_length(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RippleError::InvalidConfiguration(format!(
            "{} must be finite and non-negative, got {}",
            what, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ButtonConfig::default();
        assert_eq!(config.ripple_line_width, 3.0);
        assert_eq!(config.timings.ripple_offsets.len(), 3);
        assert!(config.timings.ripple_delay < config.timings.morph);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(matches!(
            ButtonConfig::new().corner_radius(-1.0).validate(),
            Err(RippleError::InvalidConfiguration(_))
        ));
        assert!(ButtonConfig::new().border_width(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_rejects_zero_ripple_period() {
        let timings = SequenceTimings {
            ripple_period: Duration::ZERO,
            ..SequenceTimings::default()
        };
        assert!(ButtonConfig::new().timings(timings).validate().is_err());
    }
}
