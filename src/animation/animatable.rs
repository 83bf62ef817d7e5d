use crate::color::Color;
use crate::geometry::Rect;

/// Trait for types that can be animated by interpolating between values
pub trait Animatable: Clone + PartialEq + 'static {
    /// Linear interpolation between two values
    /// t = 0.0 returns `from`, t = 1.0 returns `to`
    /// t can exceed [0, 1] range for overshoot effects
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Animatable for Color {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Color {
            r: f32::lerp(&from.r, &to.r, t),
            g: f32::lerp(&from.g, &to.g, t),
            b: f32::lerp(&from.b, &to.b, t),
            a: f32::lerp(&from.a, &to.a, t),
        }
    }
}

impl Animatable for Rect {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Rect {
            x: f32::lerp(&from.x, &to.x, t),
            y: f32::lerp(&from.y, &to.y, t),
            width: f32::lerp(&from.width, &to.width, t),
            height: f32::lerp(&from.height, &to.height, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_lerp() {
        assert_eq!(f32::lerp(&0.0, &10.0, 0.0), 0.0);
        assert_eq!(f32::lerp(&0.0, &10.0, 0.5), 5.0);
        assert_eq!(f32::lerp(&0.0, &10.0, 1.0), 10.0);
        // Overshoot
        assert_eq!(f32::lerp(&0.0, &10.0, 1.5), 15.0);
    }

    #[test]
    fn test_color_lerp() {
        let mid = Color::lerp(&Color::BLACK, &Color::WHITE, 0.5);
        assert_eq!(mid.r, 0.5);
        assert_eq!(mid.g, 0.5);
        assert_eq!(mid.b, 0.5);
        assert_eq!(mid.a, 1.0);
    }

    #[test]
    fn test_rect_lerp_morph() {
        let from = Rect::new(0.0, 0.0, 100.0, 60.0);
        let to = Rect::new(0.0, 0.0, 60.0, 60.0);
        assert_eq!(Rect::lerp(&from, &to, 0.5), Rect::new(0.0, 0.0, 80.0, 60.0));
    }
}
