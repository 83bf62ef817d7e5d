//! Flattening of the presentation tree into draw commands.

use super::{LayerContent, LayerId, LayerTree};
use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::transform::Transform;

/// Chords used to approximate each arc of a shape path.
const ARC_SEGMENTS: usize = 48;

/// Border definition for shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    /// Border width in logical pixels
    pub width: f32,
    pub color: Color,
}

/// Clip region in world coordinates, from layers that mask to their bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub rect: Rect,
    pub radius: f32,
}

impl Clip {
    /// Axis-aligned intersection. Keeps the smaller corner radius.
    pub fn intersect(&self, other: &Clip) -> Clip {
        let min_x = self.rect.x.max(other.rect.x);
        let min_y = self.rect.y.max(other.rect.y);
        let max_x = (self.rect.x + self.rect.width).min(other.rect.x + other.rect.width);
        let max_y = (self.rect.y + self.rect.height).min(other.rect.y + other.rect.height);
        Clip {
            rect: Rect::new(min_x, min_y, (max_x - min_x).max(0.0), (max_y - min_y).max(0.0)),
            radius: self.radius.min(other.radius),
        }
    }
}

/// A single draw operation in world coordinates, back to front.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled rounded rectangle with optional border
    RoundedRect {
        layer: LayerId,
        rect: Rect,
        color: Color,
        radius: f32,
        border: Option<Border>,
        clip: Option<Clip>,
    },

    /// Stroked (and optionally filled) polyline
    Path {
        layer: LayerId,
        points: Vec<Point>,
        fill: Option<Color>,
        stroke: Color,
        line_width: f32,
        clip: Option<Clip>,
    },
}

impl DrawCommand {
    pub fn layer(&self) -> LayerId {
        match self {
            DrawCommand::RoundedRect { layer, .. } | DrawCommand::Path { layer, .. } => *layer,
        }
    }

    /// Region the renderer must clip this command to.
    pub fn clip(&self) -> Option<Clip> {
        match self {
            DrawCommand::RoundedRect { clip, .. } | DrawCommand::Path { clip, .. } => *clip,
        }
    }
}

impl LayerTree {
    /// Draw commands for `root` and its visible descendants, using
    /// presentation values.
    ///
    /// Layers with zero effective opacity or scale are skipped along with
    /// their subtree. A layer with `masks_to_bounds` clips its own content
    /// and every descendant to its rounded world rect.
    pub fn display_list(&self, root: LayerId) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        self.flatten_into(root, Transform::IDENTITY, 1.0, None, &mut commands);
        commands
    }

    fn flatten_into(
        &self,
        id: LayerId,
        parent_transform: Transform,
        parent_opacity: f32,
        parent_clip: Option<Clip>,
        out: &mut Vec<DrawCommand>,
    ) {
        let (Some(layer), Ok(values)) = (self.get(id), self.presentation(id)) else {
            return;
        };

        let opacity = parent_opacity * values.opacity.clamp(0.0, 1.0);
        let size = values.bounds.size();
        let frame = Rect::centered_at(layer.position, size);
        let pivot = Point::new(size.width / 2.0, size.height / 2.0);

        // bounds space -> local frame -> scaled around center -> superlayer
        let transform = parent_transform
            .then(&Transform::translate(frame.x, frame.y))
            .then(&Transform::scale_about(values.scale, pivot))
            .then(&Transform::translate(-values.bounds.x, -values.bounds.y));

        let scale = transform.scale_factor();
        if opacity <= 0.0 || scale <= 0.0 {
            return;
        }

        let world_rect = transform.transform_rect(values.bounds);
        let radius = (values.corner_radius * scale).min(world_rect.width.min(world_rect.height) / 2.0);

        // Effective clip = intersection of the inherited clip and this layer's mask
        let own_clip = layer.masks_to_bounds.then(|| Clip {
            rect: world_rect,
            radius,
        });
        let clip = match (parent_clip, own_clip) {
            (Some(parent), Some(own)) => Some(parent.intersect(&own)),
            (parent, own) => parent.or(own),
        };

        let has_border = layer.border_width > 0.0 && !layer.border_color.is_transparent();
        if !layer.background.is_transparent() || has_border {
            out.push(DrawCommand::RoundedRect {
                layer: id,
                rect: world_rect,
                color: layer.background.with_opacity(opacity),
                radius,
                border: has_border.then(|| Border {
                    width: layer.border_width * scale,
                    color: layer.border_color.with_opacity(opacity),
                }),
                clip,
            });
        }

        if let LayerContent::Shape(ref style) = layer.content {
            let points = style
                .path
                .flatten(ARC_SEGMENTS)
                .into_iter()
                .map(|p| transform.transform_point(p))
                .collect();
            out.push(DrawCommand::Path {
                layer: id,
                points,
                fill: (!style.fill.is_transparent()).then(|| style.fill.with_opacity(opacity)),
                stroke: style.stroke.with_opacity(opacity),
                line_width: style.line_width * scale,
                clip,
            });
        }

        // Children are positioned in this layer's bounds space
        for &child in self.children(id) {
            self.flatten_into(child, transform, opacity, clip, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::circle_path;
    use crate::layer::{Layer, ShapeStyle};

    #[test]
    fn test_nested_layer_is_placed_in_world_space() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer(
            Layer::with_frame(Rect::new(10.0, 10.0, 100.0, 60.0)).background(Color::WHITE),
        );
        let child = tree.create_layer(
            Layer::with_frame(Rect::new(20.0, 0.0, 60.0, 60.0)).background(Color::BLACK),
        );
        tree.add_sublayer(root, child).unwrap();

        let list = tree.display_list(root);
        assert_eq!(list.len(), 2);
        match &list[1] {
            DrawCommand::RoundedRect { rect, layer, .. } => {
                assert_eq!(*layer, child);
                assert_eq!(*rect, Rect::new(30.0, 10.0, 60.0, 60.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_scale_shrinks_around_center() {
        let mut tree = LayerTree::new();
        let mut layer = Layer::with_frame(Rect::new(0.0, 0.0, 60.0, 60.0)).background(Color::WHITE);
        layer.scale = 0.5;
        layer.corner_radius = 30.0;
        let id = tree.create_layer(layer);

        match &tree.display_list(id)[0] {
            DrawCommand::RoundedRect { rect, radius, .. } => {
                assert_eq!(*rect, Rect::new(15.0, 15.0, 30.0, 30.0));
                assert_eq!(*radius, 15.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invisible_layers_are_skipped() {
        let mut tree = LayerTree::new();
        let mut faded = Layer::with_frame(Rect::new(0.0, 0.0, 10.0, 10.0)).background(Color::WHITE);
        faded.opacity = 0.0;
        let id = tree.create_layer(faded);
        assert!(tree.display_list(id).is_empty());

        let empty = tree.create_layer(Layer::with_frame(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(tree.display_list(empty).is_empty());
    }

    #[test]
    fn test_masking_layer_clips_descendants() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer(
            Layer::with_frame(Rect::new(10.0, 10.0, 100.0, 60.0))
                .background(Color::WHITE)
                .masks_to_bounds(true),
        );
        tree.get_mut(root).unwrap().corner_radius = 8.0;
        let ring = tree.create_layer(
            Layer::with_frame(Rect::new(80.0, 0.0, 60.0, 60.0)).shape(ShapeStyle {
                path: circle_path(Point::new(30.0, 30.0), 30.0, false),
                fill: Color::TRANSPARENT,
                stroke: Color::BLACK,
                line_width: 3.0,
            }),
        );
        tree.add_sublayer(root, ring).unwrap();

        let list = tree.display_list(root);
        let expected = Some(Clip {
            rect: Rect::new(10.0, 10.0, 100.0, 60.0),
            radius: 8.0,
        });
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|c| c.clip() == expected));

        // Without a mask nothing is clipped
        tree.get_mut(root).unwrap().masks_to_bounds = false;
        assert!(tree.display_list(root).iter().all(|c| c.clip().is_none()));
    }

    #[test]
    fn test_nested_clips_intersect() {
        let outer = Clip {
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            radius: 10.0,
        };
        let inner = Clip {
            rect: Rect::new(50.0, 80.0, 100.0, 100.0),
            radius: 4.0,
        };
        assert_eq!(
            outer.intersect(&inner),
            Clip {
                rect: Rect::new(50.0, 80.0, 50.0, 20.0),
                radius: 4.0,
            }
        );
    }

    #[test]
    fn test_shape_layer_emits_stroked_path() {
        let mut tree = LayerTree::new();
        let ring = tree.create_layer(
            Layer::with_frame(Rect::new(0.0, 0.0, 20.0, 20.0)).shape(ShapeStyle {
                path: circle_path(Point::new(10.0, 10.0), 10.0, false),
                fill: Color::TRANSPARENT,
                stroke: Color::WHITE,
                line_width: 3.0,
            }),
        );
        let list = tree.display_list(ring);
        assert_eq!(list.len(), 1);
        match &list[0] {
            DrawCommand::Path {
                points,
                fill,
                line_width,
                ..
            } => {
                assert!(fill.is_none());
                assert_eq!(*line_width, 3.0);
                assert_eq!(points.len(), ARC_SEGMENTS + 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
