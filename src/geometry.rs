//! Geometry primitives for layer placement and ripple outlines.
//!
//! Coordinates are logical pixels in `f32`, with the origin at the top-left
//! and y growing downwards.

use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
        }
    }

    /// Rect of the given size centered on `center`.
    pub fn centered_at(center: Point, size: Size) -> Self {
        Self {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// True when both sides are finite and strictly positive.
    pub fn has_area(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.x.is_finite()
            && self.y.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Zero-origin square whose side is the shorter side of `rect`.
///
/// With a corner radius of half the side this square renders as a circle.
pub fn square_bounds(rect: Rect) -> Rect {
    let side = rect.width.min(rect.height);
    Rect::new(0.0, 0.0, side, side)
}

/// A single path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    MoveTo(Point),
    LineTo(Point),
    /// Circular arc; angles in radians, measured from the positive x axis.
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    },
    Close,
}

/// Vector path used for stroked shape layers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, point: Point) -> Self {
        self.elements.push(PathElement::MoveTo(point));
        self
    }

    pub fn line_to(mut self, point: Point) -> Self {
        self.elements.push(PathElement::LineTo(point));
        self
    }

    pub fn arc(
        mut self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    ) -> Self {
        self.elements.push(PathElement::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.elements.push(PathElement::Close);
        self
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.elements.last(), Some(PathElement::Close))
    }

    /// Sample the path into a polyline.
    ///
    /// Each arc is split into `segments_per_arc` chords. A closing element
    /// repeats the first point of the current subpath.
    pub fn flatten(&self, segments_per_arc: usize) -> Vec<Point> {
        let segments = segments_per_arc.max(1);
        let mut points = Vec::new();
        let mut subpath_start: Option<Point> = None;

        for element in &self.elements {
            match *element {
                PathElement::MoveTo(p) => {
                    points.push(p);
                    subpath_start = Some(p);
                }
                PathElement::LineTo(p) => {
                    points.push(p);
                    subpath_start.get_or_insert(p);
                }
                PathElement::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    clockwise,
                } => {
                    let sweep = arc_sweep(start_angle, end_angle, clockwise);
                    for i in 0..=segments {
                        let angle = start_angle + sweep * (i as f32 / segments as f32);
                        let p = Point::new(
                            center.x + radius * angle.cos(),
                            center.y + radius * angle.sin(),
                        );
                        if i == 0 {
                            subpath_start.get_or_insert(p);
                        }
                        points.push(p);
                    }
                }
                PathElement::Close => {
                    if let Some(start) = subpath_start.take() {
                        points.push(start);
                    }
                }
            }
        }

        points
    }
}

// Signed sweep from start to end. A full turn is kept as a full turn in
// either direction instead of collapsing to zero.
fn arc_sweep(start: f32, end: f32, clockwise: bool) -> f32 {
    let delta = end - start;
    if delta.abs() >= TAU {
        return if clockwise { -TAU } else { TAU };
    }
    let ccw = delta.rem_euclid(TAU);
    if clockwise {
        -(TAU - ccw) % TAU
    } else {
        ccw
    }
}

/// Closed circle outline centered on `center` with a full 2π sweep.
pub fn circle_path(center: Point, radius: f32, clockwise: bool) -> Path {
    Path::new()
        .arc(center, radius, 0.0, TAU, clockwise)
        .close()
}
