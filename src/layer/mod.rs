//! Retained layer tree with attached animations.
//!
//! Layers live in an arena using a sparse-set layout with generational
//! indices: a dense `Vec` of nodes for iteration during `tick` and
//! `display_list`, and a sparse map for O(1) lookup by [`LayerId`]. A stale id
//! (one whose layer has been removed) never resolves to a newer layer that
//! reused the slot.
//!
//! Every layer has *model* properties, written directly by callers, and a
//! *presentation* computed from the model with all attached animations laid
//! over it in the order they were added.

mod display;

use std::time::Instant;

pub use display::{Border, Clip, DrawCommand};

use crate::animation::{ActiveAnimation, AnimationGroup, Phase, Properties, PropertyValues};
use crate::color::Color;
use crate::error::{Result, RippleError};
use crate::geometry::{Path, Point, Rect};

/// Unique identifier for a layer in a [`LayerTree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LayerId {
    index: u32,
    generation: u32,
}

impl LayerId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Combines generation (high bits) with index (low bits).
    pub fn as_u64(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }
}

/// Stroke and fill for a shape layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    /// Outline in the layer's bounds coordinates
    pub path: Path,
    pub fill: Color,
    pub stroke: Color,
    pub line_width: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LayerContent {
    /// Rounded rectangle filled with the layer background
    #[default]
    Plain,
    /// Vector path drawn in addition to the background
    Shape(ShapeStyle),
}

/// Model properties of a layer.
///
/// `position` is the center of the layer in its superlayer's coordinates and
/// `bounds` is its own coordinate space, so changing `bounds` resizes the
/// layer around a fixed center.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub position: Point,
    pub bounds: Rect,
    pub corner_radius: f32,
    pub opacity: f32,
    pub scale: f32,
    pub background: Color,
    pub border_width: f32,
    pub border_color: Color,
    pub masks_to_bounds: bool,
    pub content: LayerContent,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            bounds: Rect::default(),
            corner_radius: 0.0,
            opacity: 1.0,
            scale: 1.0,
            background: Color::TRANSPARENT,
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
            masks_to_bounds: false,
            content: LayerContent::Plain,
        }
    }
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer occupying `frame` in its superlayer.
    pub fn with_frame(frame: Rect) -> Self {
        let mut layer = Self::default();
        layer.set_frame(frame);
        layer
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.position = frame.center();
        self.bounds = Rect::from_size(frame.size());
    }

    /// Rectangle occupied in the superlayer, ignoring scale.
    pub fn frame(&self) -> Rect {
        Rect::centered_at(self.position, self.bounds.size())
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn border(mut self, width: f32, color: Color) -> Self {
        self.border_width = width;
        self.border_color = color;
        self
    }

    pub fn masks_to_bounds(mut self, masks: bool) -> Self {
        self.masks_to_bounds = masks;
        self
    }

    pub fn shape(mut self, style: ShapeStyle) -> Self {
        self.content = LayerContent::Shape(style);
        self
    }

    pub fn property_values(&self) -> PropertyValues {
        PropertyValues {
            bounds: self.bounds,
            corner_radius: self.corner_radius,
            opacity: self.opacity,
            scale: self.scale,
        }
    }
}

struct SparseEntry {
    dense_index: usize,
    generation: u32,
}

struct Node {
    layer: Layer,
    parent: Option<LayerId>,
    /// Back to front
    children: Vec<LayerId>,
    animations: Vec<ActiveAnimation>,
    /// Back-pointer to sparse array index (for swap-remove fixup)
    sparse_index: u32,
}

/// Arena of layers and their animations.
pub struct LayerTree {
    dense: Vec<Node>,
    sparse: Vec<Option<SparseEntry>>,
    free_indices: Vec<u32>,
    generations: Vec<u32>,
}

impl LayerTree {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            sparse: Vec::new(),
            free_indices: Vec::new(),
            generations: Vec::new(),
        }
    }

    /// Store a detached layer and return its id.
    pub fn create_layer(&mut self, layer: Layer) -> LayerId {
        let (sparse_index, generation) = if let Some(idx) = self.free_indices.pop() {
            let generation = self.generations[idx as usize].wrapping_add(1);
            self.generations[idx as usize] = generation;
            (idx, generation)
        } else {
            let idx = self.sparse.len() as u32;
            self.sparse.push(None);
            self.generations.push(0);
            (idx, 0)
        };

        let dense_index = self.dense.len();
        self.dense.push(Node {
            layer,
            parent: None,
            children: Vec::new(),
            animations: Vec::new(),
            sparse_index,
        });
        self.sparse[sparse_index as usize] = Some(SparseEntry {
            dense_index,
            generation,
        });

        LayerId::new(sparse_index, generation)
    }

    fn dense_index(&self, id: LayerId) -> Option<usize> {
        self.sparse
            .get(id.index as usize)
            .and_then(|e| e.as_ref())
            .filter(|e| e.generation == id.generation)
            .map(|e| e.dense_index)
    }

    fn node(&self, id: LayerId) -> Result<&Node> {
        self.dense_index(id)
            .map(|idx| &self.dense[idx])
            .ok_or(RippleError::UnknownLayer(id))
    }

    fn node_mut(&mut self, id: LayerId) -> Result<&mut Node> {
        match self.dense_index(id) {
            Some(idx) => Ok(&mut self.dense[idx]),
            None => Err(RippleError::UnknownLayer(id)),
        }
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.dense_index(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.node(id).ok().map(|n| &n.layer)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.node_mut(id).ok().map(|n| &mut n.layer)
    }

    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    /// Sublayers from back to front.
    pub fn children(&self, id: LayerId) -> &[LayerId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Attach `child` as the frontmost sublayer of `parent`, detaching it from
    /// any previous superlayer first.
    pub fn add_sublayer(&mut self, parent: LayerId, child: LayerId) -> Result<()> {
        self.node(parent)?;
        let old_parent = self.node(child)?.parent;
        if let Some(old_parent) = old_parent {
            if let Ok(node) = self.node_mut(old_parent) {
                node.children.retain(|&c| c != child);
            }
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach a layer and discard it along with its whole subtree.
    ///
    /// Animations still running in the subtree complete with
    /// `finished = false`.
    pub fn remove_from_superlayer(&mut self, id: LayerId) -> Result<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let Ok(node) = self.node_mut(parent) {
                node.children.retain(|&c| c != id);
            }
        }

        let mut stack = vec![id];
        let mut doomed = Vec::new();
        while let Some(current) = stack.pop() {
            if let Ok(node) = self.node(current) {
                stack.extend(node.children.iter().copied());
                doomed.push(current);
            }
        }

        for layer in doomed {
            self.remove_all_animations(layer)?;
            self.unregister(layer);
        }
        Ok(())
    }

    fn unregister(&mut self, id: LayerId) {
        let Some(dense_index) = self.dense_index(id) else {
            return;
        };

        let last_dense_index = self.dense.len() - 1;
        self.dense.swap_remove(dense_index);

        if dense_index != last_dense_index {
            let moved_sparse_idx = self.dense[dense_index].sparse_index;
            if let Some(ref mut entry) = self.sparse[moved_sparse_idx as usize] {
                entry.dense_index = dense_index;
            }
        }

        self.sparse[id.index as usize] = None;
        self.free_indices.push(id.index);
    }

    /// Attach `group` under `key`, replacing (and cancelling) any animation
    /// already attached under the same key.
    pub fn add_animation(
        &mut self,
        id: LayerId,
        key: &str,
        group: AnimationGroup,
        now: Instant,
    ) -> Result<()> {
        let current = self.presentation(id)?;
        let node = self.node_mut(id)?;
        if let Some(pos) = node.animations.iter().position(|a| a.key == key) {
            let mut replaced = node.animations.remove(pos);
            replaced.cancel();
        }
        log::trace!("layer {:?}: add animation {:?}", id, key);
        node.animations
            .push(ActiveAnimation::attach(key, group, &current, now));
        Ok(())
    }

    pub fn remove_animation(&mut self, id: LayerId, key: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        if let Some(pos) = node.animations.iter().position(|a| a.key == key) {
            let mut removed = node.animations.remove(pos);
            removed.cancel();
        }
        Ok(())
    }

    pub fn remove_all_animations(&mut self, id: LayerId) -> Result<()> {
        let node = self.node_mut(id)?;
        for mut animation in node.animations.drain(..) {
            animation.cancel();
        }
        Ok(())
    }

    /// Keys of attached animations, oldest first.
    pub fn animation_keys(&self, id: LayerId) -> Vec<String> {
        self.node(id)
            .map(|n| n.animations.iter().map(|a| a.key.clone()).collect())
            .unwrap_or_default()
    }

    pub fn has_running_animations(&self) -> bool {
        self.dense.iter().any(|n| {
            n.animations
                .iter()
                .any(|a| matches!(a.phase(), Phase::Pending | Phase::Running))
        })
    }

    /// Model values with attached animations applied.
    pub fn presentation(&self, id: LayerId) -> Result<PropertyValues> {
        let node = self.node(id)?;
        let mut values = node.layer.property_values();
        for animation in &node.animations {
            animation.apply(&mut values);
        }
        Ok(values)
    }

    /// Advance every attached animation to `now`, firing hooks and dropping
    /// animations that finished without a forwards fill.
    ///
    /// Returns the properties that were animated during this tick.
    pub fn tick(&mut self, now: Instant) -> Properties {
        let mut touched = Properties::empty();
        for node in &mut self.dense {
            for animation in &mut node.animations {
                if matches!(animation.phase(), Phase::Pending | Phase::Running) {
                    touched |= animation.properties();
                }
                animation.advance(now);
            }
            node.animations.retain(|a| a.phase() != Phase::Done);
        }
        touched
    }
}

impl Default for LayerTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{PropertyAnimation, RepeatCount};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_with_frame_centers_position() {
        let layer = Layer::with_frame(Rect::new(10.0, 20.0, 100.0, 60.0));
        assert_eq!(layer.position, Point::new(60.0, 50.0));
        assert_eq!(layer.bounds, Rect::new(0.0, 0.0, 100.0, 60.0));
        assert_eq!(layer.frame(), Rect::new(10.0, 20.0, 100.0, 60.0));
    }

    #[test]
    fn test_add_sublayer_orders_back_to_front() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer(Layer::new());
        let a = tree.create_layer(Layer::new());
        let b = tree.create_layer(Layer::new());
        tree.add_sublayer(root, a).unwrap();
        tree.add_sublayer(root, b).unwrap();
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(b), Some(root));

        // Re-adding moves to front
        tree.add_sublayer(root, a).unwrap();
        assert_eq!(tree.children(root), &[b, a]);
    }

    #[test]
    fn test_remove_subtree_invalidates_ids() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer(Layer::new());
        let child = tree.create_layer(Layer::new());
        let grandchild = tree.create_layer(Layer::new());
        tree.add_sublayer(root, child).unwrap();
        tree.add_sublayer(child, grandchild).unwrap();

        tree.remove_from_superlayer(child).unwrap();
        assert!(!tree.contains(child));
        assert!(!tree.contains(grandchild));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);

        // Slot reuse does not resurrect the stale id
        let fresh = tree.create_layer(Layer::new());
        assert!(tree.contains(fresh));
        assert!(!tree.contains(child));
        assert!(tree.get(root).is_some());
    }

    #[test]
    fn test_unknown_layer_is_an_error() {
        let mut tree = LayerTree::new();
        let id = tree.create_layer(Layer::new());
        tree.remove_from_superlayer(id).unwrap();
        assert!(matches!(
            tree.remove_from_superlayer(id),
            Err(RippleError::UnknownLayer(_))
        ));
    }

    #[test]
    fn test_presentation_follows_animation_then_model() {
        let now = Instant::now();
        let mut tree = LayerTree::new();
        let id = tree.create_layer(Layer::with_frame(Rect::new(0.0, 0.0, 100.0, 60.0)));

        tree.add_animation(
            id,
            "fade",
            AnimationGroup::new(ms(100)).animate(PropertyAnimation::opacity(1.0, 0.0)),
            now,
        )
        .unwrap();

        tree.tick(now + ms(25));
        assert!((tree.presentation(id).unwrap().opacity - 0.75).abs() < 1e-4);

        let touched = tree.tick(now + ms(100));
        assert_eq!(touched, Properties::OPACITY);
        assert_eq!(tree.presentation(id).unwrap().opacity, 1.0);
        assert!(tree.animation_keys(id).is_empty());
    }

    #[test]
    fn test_same_key_replaces_and_reports_unfinished() {
        let now = Instant::now();
        let mut tree = LayerTree::new();
        let id = tree.create_layer(Layer::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        tree.add_animation(
            id,
            "group",
            AnimationGroup::new(ms(300))
                .animate(PropertyAnimation::scale_to(2.0))
                .on_complete(move |f| l.borrow_mut().push(("first", f))),
            now,
        )
        .unwrap();
        let l = log.clone();
        tree.add_animation(
            id,
            "group",
            AnimationGroup::new(ms(300))
                .animate(PropertyAnimation::scale_to(3.0))
                .on_complete(move |f| l.borrow_mut().push(("second", f))),
            now,
        )
        .unwrap();

        assert_eq!(tree.animation_keys(id), vec!["group".to_string()]);
        tree.tick(now + ms(300));
        assert_eq!(*log.borrow(), vec![("first", false), ("second", true)]);
    }

    #[test]
    fn test_unresolved_from_uses_presentation() {
        let now = Instant::now();
        let mut tree = LayerTree::new();
        let id = tree.create_layer(Layer::new());
        tree.add_animation(
            id,
            "collapse",
            AnimationGroup::new(ms(100))
                .animate(PropertyAnimation::scale(1.0, 0.0))
                .hold(),
            now,
        )
        .unwrap();
        tree.tick(now + ms(100));

        tree.add_animation(
            id,
            "grow",
            AnimationGroup::new(ms(100)).animate(PropertyAnimation::scale_to(1.0)),
            now + ms(100),
        )
        .unwrap();
        tree.tick(now + ms(150));
        assert!((tree.presentation(id).unwrap().scale - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_removing_layer_cancels_infinite_animation() {
        let now = Instant::now();
        let mut tree = LayerTree::new();
        let root = tree.create_layer(Layer::new());
        let ring = tree.create_layer(Layer::new());
        tree.add_sublayer(root, ring).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        tree.add_animation(
            ring,
            "ripple",
            AnimationGroup::new(ms(800))
                .animate(PropertyAnimation::scale(0.0, 1.0))
                .repeat(RepeatCount::Forever)
                .on_complete(move |f| l.borrow_mut().push(f)),
            now,
        )
        .unwrap();
        tree.tick(now + ms(5000));
        assert!(tree.has_running_animations());
        assert!(log.borrow().is_empty());

        tree.remove_from_superlayer(ring).unwrap();
        assert_eq!(*log.borrow(), vec![false]);
        assert!(!tree.has_running_animations());
    }
}
