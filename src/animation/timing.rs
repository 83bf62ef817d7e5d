//! Timing functions (easing curves) for layer animations.
//!
//! - [`TimingFunction::Linear`] - Constant speed, the default for layer animations
//! - [`TimingFunction::EaseIn`] - Starts slow, ends fast
//! - [`TimingFunction::EaseOut`] - Starts fast, ends slow
//! - [`TimingFunction::EaseInOut`] - Slow start and end, fast middle
//! - [`TimingFunction::CubicBezier`] - CSS-style cubic bezier curve

/// Timing function that maps linear progress to eased progress.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TimingFunction {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Control points (x1, y1, x2, y2); x values are expected in [0, 1]
    CubicBezier(f32, f32, f32, f32),
}

impl TimingFunction {
    /// Evaluate at `t` in [0, 1]. Bezier curves may leave [0, 1] for overshoot.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            TimingFunction::Linear => t,
            TimingFunction::EaseIn => t * t,
            TimingFunction::EaseOut => t * (2.0 - t),
            TimingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                let s = solve_bezier_x(t, x1, x2);
                bezier(s, y1, y2)
            }
        }
    }
}

// One-dimensional cubic bezier with fixed end points 0 and 1.
fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let ms = 1.0 - s;
    3.0 * ms * ms * s * p1 + 3.0 * ms * s * s * p2 + s * s * s
}

fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let ms = 1.0 - s;
    3.0 * ms * ms * p1 + 6.0 * ms * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

// Newton-Raphson for the curve parameter whose x equals `x`.
fn solve_bezier_x(x: f32, x1: f32, x2: f32) -> f32 {
    let mut s = x;
    for _ in 0..8 {
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= (bezier(s, x1, x2) - x) / slope;
    }
    s.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        assert_eq!(TimingFunction::Linear.evaluate(0.0), 0.0);
        assert_eq!(TimingFunction::Linear.evaluate(0.5), 0.5);
        assert_eq!(TimingFunction::Linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_ease_in_out_endpoints() {
        for f in [
            TimingFunction::EaseIn,
            TimingFunction::EaseOut,
            TimingFunction::EaseInOut,
            TimingFunction::CubicBezier(0.25, 0.1, 0.25, 1.0),
        ] {
            assert!(f.evaluate(0.0).abs() < 1e-4, "{:?}", f);
            assert!((f.evaluate(1.0) - 1.0).abs() < 1e-4, "{:?}", f);
        }
    }

    #[test]
    fn test_ease_in_slower_at_start() {
        assert!(TimingFunction::EaseIn.evaluate(0.5) < 0.5);
        assert!(TimingFunction::EaseOut.evaluate(0.5) > 0.5);
    }

    #[test]
    fn test_linear_bezier_matches_linear() {
        let f = TimingFunction::CubicBezier(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
        assert!((f.evaluate(0.3) - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(TimingFunction::Linear.evaluate(1.7), 1.0);
        assert_eq!(TimingFunction::Linear.evaluate(-0.2), 0.0);
    }
}
