use crate::geometry::{Point, Rect};

/// A 2D affine transform.
///
/// Stored as the first two rows of a 3x3 matrix, `[a, b, tx, c, d, ty]`:
///
/// ```text
/// | a  b  tx |
/// | c  d  ty |
/// | 0  0  1  |
/// ```
///
/// Layers only ever scale around their center and translate into their
/// superlayer, so rotation is not modelled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub data: [f32; 6],
}

impl Transform {
    pub const IDENTITY: Self = Self {
        data: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            data: [1.0, 0.0, x, 0.0, 1.0, y],
        }
    }

    /// Uniform scale around the origin
    pub fn scale(s: f32) -> Self {
        Self {
            data: [s, 0.0, 0.0, 0.0, s, 0.0],
        }
    }

    /// Uniform scale around `pivot`
    pub fn scale_about(s: f32, pivot: Point) -> Self {
        Transform::translate(pivot.x, pivot.y)
            .then(&Transform::scale(s))
            .then(&Transform::translate(-pivot.x, -pivot.y))
    }

    /// Compose this transform with another: self * other
    /// Applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Transform {
        let [a1, b1, tx1, c1, d1, ty1] = self.data;
        let [a2, b2, tx2, c2, d2, ty2] = other.data;
        Transform {
            data: [
                a1 * a2 + b1 * c2,
                a1 * b2 + b1 * d2,
                a1 * tx2 + b1 * ty2 + tx1,
                c1 * a2 + d1 * c2,
                c1 * b2 + d1 * d2,
                c1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }

    pub fn transform_point(&self, p: Point) -> Point {
        let [a, b, tx, c, d, ty] = self.data;
        Point::new(a * p.x + b * p.y + tx, c * p.x + d * p.y + ty)
    }

    /// Axis-aligned image of `rect`. Exact for scale + translate.
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        let p0 = self.transform_point(rect.origin());
        let p1 = self.transform_point(Point::new(rect.x + rect.width, rect.y + rect.height));
        let x = p0.x.min(p1.x);
        let y = p0.y.min(p1.y);
        Rect::new(x, y, (p1.x - p0.x).abs(), (p1.y - p0.y).abs())
    }

    /// Horizontal scale component; equal to the vertical one for the
    /// uniform transforms built here.
    pub fn scale_factor(&self) -> f32 {
        (self.data[0] * self.data[0] + self.data[3] * self.data[3]).sqrt()
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_identity() {
        let t = Transform::identity();
        assert!(t.is_identity());
        assert_eq!(t.transform_point(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_translate() {
        let p = Transform::translate(10.0, 20.0).transform_point(Point::new(5.0, 5.0));
        assert!(approx_eq(p.x, 15.0));
        assert!(approx_eq(p.y, 25.0));
    }

    #[test]
    fn test_compose() {
        // Point (0,0) -> translate -> (10,0) -> scale -> (20,0)
        let composed = Transform::scale(2.0).then(&Transform::translate(10.0, 0.0));
        let p = composed.transform_point(Point::ZERO);
        assert!(approx_eq(p.x, 20.0));
        assert!(approx_eq(p.y, 0.0));
    }

    #[test]
    fn test_scale_about_keeps_pivot_fixed() {
        let pivot = Point::new(30.0, 30.0);
        let t = Transform::scale_about(0.5, pivot);
        assert_eq!(t.transform_point(pivot), pivot);

        let r = t.transform_rect(Rect::new(0.0, 0.0, 60.0, 60.0));
        assert!(approx_eq(r.x, 15.0));
        assert!(approx_eq(r.width, 30.0));
        assert!(approx_eq(t.scale_factor(), 0.5));
    }

    #[test]
    fn test_zero_scale_collapses_to_pivot() {
        let pivot = Point::new(8.0, 2.0);
        let r = Transform::scale_about(0.0, pivot).transform_rect(Rect::new(0.0, 0.0, 16.0, 4.0));
        assert_eq!(r, Rect::new(8.0, 2.0, 0.0, 0.0));
    }
}
