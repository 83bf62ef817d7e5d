//! The circle ripple button.
//!
//! Pressing runs a timed sequence on a set of transient layers:
//!
//! 1. **Morphing** - an overlay layer copies the button's fill and border, and
//!    the button itself turns transparent. The overlay animates from the
//!    button's rectangle to the largest centered circle.
//! 2. **Rippling** - shortly before the morph ends the overlay's model bounds
//!    are snapped to the circle, the overlay collapses, and stroked rings are
//!    spawned at fixed offsets. Each ring grows and fades forever.
//! 3. Either **Expanding** - rings are dropped and the overlay grows over a
//!    destination view while fading out - or **Restoring** - rings are
//!    dropped and the overlay animates back to the button's rectangle before
//!    the original look is restored.
//!
//! Time never advances on its own. The host calls [`RippleButton::advance`]
//! every frame; it releases delayed steps, ticks the layer tree, and then
//! handles completion jobs pushed by animation hooks.
//!
//! # Example
//! ```ignore
//! let mut button = RippleButton::new(
//!     Rect::new(40.0, 200.0, 240.0, 48.0),
//!     ButtonVisualState::new(Color::from_hex(0x2196F3), Color::TRANSPARENT, Color::WHITE),
//! );
//! button.start(Instant::now())?;
//! // each frame:
//! button.advance(Instant::now());
//! // later:
//! button.stop(true, Instant::now())?;
//! ```

mod config;

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;
use std::time::Instant;

pub use config::{ButtonConfig, SequenceTimings};

use crate::animation::{AnimationGroup, PropertyAnimation, RepeatCount};
use crate::color::Color;
use crate::error::{Result, RippleError};
use crate::geometry::{circle_path, square_bounds, Point, Rect};
use crate::layer::{DrawCommand, Layer, LayerId, LayerTree, ShapeStyle};
use crate::scheduler::TimerQueue;

const OVERLAY_ANIMATION: &str = "group";
const COLLAPSE_ANIMATION: &str = "collapse";
const RIPPLE_ANIMATION: &str = "ripple";

/// Colors of the button as drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonVisualState {
    pub background: Color,
    pub border_color: Color,
    pub title_color: Color,
}

impl ButtonVisualState {
    pub fn new(background: Color, border_color: Color, title_color: Color) -> Self {
        Self {
            background,
            border_color,
            title_color,
        }
    }

    fn hidden() -> Self {
        Self::new(Color::TRANSPARENT, Color::TRANSPARENT, Color::TRANSPARENT)
    }
}

/// Phase of the press sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Morphing,
    Rippling,
    Expanding,
    Restoring,
}

/// A surface the overlay can expand into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostView {
    /// Bounds in the view's own coordinates
    pub bounds: Rect,
    /// Set by `stop_into`; applying it is up to whoever renders the view
    pub clips_to_bounds: bool,
}

impl HostView {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            clips_to_bounds: false,
        }
    }
}

/// Transient layers and the look to restore, alive for one press cycle.
#[derive(Debug)]
struct ActiveCycle {
    generation: u64,
    snapshot: ButtonVisualState,
    overlay: LayerId,
    ripples: Vec<LayerId>,
    /// Circle the overlay morphs into, in overlay bounds space
    target: Rect,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Morphing(ActiveCycle),
    Rippling(ActiveCycle),
    Expanding(ActiveCycle),
    Restoring(ActiveCycle),
}

impl Phase {
    fn state(&self) -> ButtonState {
        match self {
            Phase::Idle => ButtonState::Idle,
            Phase::Morphing(_) => ButtonState::Morphing,
            Phase::Rippling(_) => ButtonState::Rippling,
            Phase::Expanding(_) => ButtonState::Expanding,
            Phase::Restoring(_) => ButtonState::Restoring,
        }
    }

    fn cycle(&self) -> Option<&ActiveCycle> {
        match self {
            Phase::Idle => None,
            Phase::Morphing(c)
            | Phase::Rippling(c)
            | Phase::Expanding(c)
            | Phase::Restoring(c) => Some(c),
        }
    }

    fn into_cycle(self) -> Option<ActiveCycle> {
        match self {
            Phase::Idle => None,
            Phase::Morphing(c)
            | Phase::Rippling(c)
            | Phase::Expanding(c)
            | Phase::Restoring(c) => Some(c),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum JobKind {
    BeginRippling,
    SpawnRipple,
    ExpandFinished,
    RestoreFinished,
}

/// Deferred step of a press cycle. Jobs from an older cycle are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Job {
    generation: u64,
    kind: JobKind,
}

/// Completion jobs pushed from animation hooks during a tick.
type JobQueue = Rc<RefCell<Vec<Job>>>;

pub struct RippleButton {
    config: ButtonConfig,
    bounds: Rect,
    visuals: ButtonVisualState,
    layers: LayerTree,
    root: LayerId,
    phase: Phase,
    timers: TimerQueue<Job>,
    jobs: JobQueue,
    generation: u64,
    /// Look captured before a completed dismiss, shown again by `reset`
    dismissed: Option<ButtonVisualState>,
}

impl RippleButton {
    /// Button occupying `bounds` in its host view, with default config.
    pub fn new(bounds: Rect, visuals: ButtonVisualState) -> Self {
        let mut layers = LayerTree::new();
        let root = layers.create_layer(Layer::with_frame(bounds));
        let mut button = Self {
            config: ButtonConfig::default(),
            bounds,
            visuals,
            layers,
            root,
            phase: Phase::Idle,
            timers: TimerQueue::new(),
            jobs: Rc::new(RefCell::new(Vec::new())),
            generation: 0,
            dismissed: None,
        };
        button.sync_root();
        button
    }

    pub fn with_config(
        bounds: Rect,
        visuals: ButtonVisualState,
        config: ButtonConfig,
    ) -> Result<Self> {
        config.validate()?;
        let mut button = Self::new(bounds, visuals);
        button.config = config;
        button.sync_root();
        Ok(button)
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    pub fn state(&self) -> ButtonState {
        self.phase.state()
    }

    /// True from a successful `start` until a stop begins.
    pub fn is_action_in_progress(&self) -> bool {
        matches!(self.phase, Phase::Morphing(_) | Phase::Rippling(_))
    }

    pub fn visuals(&self) -> ButtonVisualState {
        self.visuals
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// The button's own layer.
    pub fn root(&self) -> LayerId {
        self.root
    }

    pub fn layers(&self) -> &LayerTree {
        &self.layers
    }

    pub fn overlay(&self) -> Option<LayerId> {
        self.phase.cycle().map(|c| c.overlay)
    }

    /// Ring layers in creation order.
    pub fn ripples(&self) -> &[LayerId] {
        self.phase
            .cycle()
            .map(|c| c.ripples.as_slice())
            .unwrap_or(&[])
    }

    pub fn display_list(&self) -> Vec<DrawCommand> {
        self.layers.display_list(self.root)
    }

    /// Earliest pending delayed step, for hosts that sleep between frames.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Whether `advance` still has work: pending steps or running animations.
    pub fn needs_frame(&self) -> bool {
        !self.timers.is_empty() || self.layers.has_running_animations()
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub fn set_corner_radius(&mut self, radius: f32) -> Result<()> {
        config::check_length("corner radius", radius)?;
        self.config.corner_radius = radius;
        self.sync_root();
        Ok(())
    }

    pub fn set_border_width(&mut self, width: f32) -> Result<()> {
        config::check_length("border width", width)?;
        self.config.border_width = width;
        self.sync_root();
        Ok(())
    }

    pub fn set_ripple_line_width(&mut self, width: f32) -> Result<()> {
        config::check_length("ripple line width", width)?;
        self.config.ripple_line_width = width;
        Ok(())
    }

    /// Set the border color. While a cycle is running, or after a dismiss,
    /// the new color is shown only once the button is restored.
    pub fn set_border_color(&mut self, color: Color) {
        match self.active_snapshot_mut() {
            Some(snapshot) => snapshot.border_color = color,
            None => {
                self.visuals.border_color = color;
                self.sync_root();
            }
        }
    }

    /// Set the fill color, deferred like [`set_border_color`](Self::set_border_color).
    pub fn set_background(&mut self, color: Color) {
        match self.active_snapshot_mut() {
            Some(snapshot) => snapshot.background = color,
            None => {
                self.visuals.background = color;
                self.sync_root();
            }
        }
    }

    pub fn set_title_color(&mut self, color: Color) {
        match self.active_snapshot_mut() {
            Some(snapshot) => snapshot.title_color = color,
            None => self.visuals.title_color = color,
        }
    }

    /// Move or resize the button. Only allowed while idle.
    pub fn set_bounds(&mut self, bounds: Rect) -> Result<()> {
        self.require_idle("set bounds")?;
        self.bounds = bounds;
        if let Some(root) = self.layers.get_mut(self.root) {
            root.set_frame(bounds);
        }
        Ok(())
    }

    fn active_snapshot_mut(&mut self) -> Option<&mut ButtonVisualState> {
        match &mut self.phase {
            Phase::Idle => self.dismissed.as_mut(),
            Phase::Morphing(c)
            | Phase::Rippling(c)
            | Phase::Expanding(c)
            | Phase::Restoring(c) => Some(&mut c.snapshot),
        }
    }

    fn sync_root(&mut self) {
        let visuals = self.visuals;
        let corner_radius = self.config.corner_radius;
        let border_width = self.config.border_width;
        if let Some(root) = self.layers.get_mut(self.root) {
            root.background = visuals.background;
            root.border_color = visuals.border_color;
            root.border_width = border_width;
            root.corner_radius = corner_radius;
            root.masks_to_bounds = corner_radius > 0.0;
        }
    }

    fn require_idle(&self, action: &'static str) -> Result<()> {
        match self.phase {
            Phase::Idle => Ok(()),
            _ => Err(self.rejected(action)),
        }
    }

    fn rejected(&self, action: &'static str) -> RippleError {
        let state = self.state();
        log::warn!("ripple button: rejected {} while {:?}", action, state);
        RippleError::InvalidStateTransition { action, state }
    }

    // ------------------------------------------------------------------
    // Sequence
    // ------------------------------------------------------------------

    /// Begin the press effect.
    ///
    /// Fails with `InvalidStateTransition` unless idle, and with
    /// `InvalidConfiguration` if the button has no area; neither failure
    /// changes anything.
    pub fn start(&mut self, now: Instant) -> Result<()> {
        self.require_idle("start")?;
        if !self.bounds.has_area() {
            return Err(RippleError::InvalidConfiguration(format!(
                "button bounds {:?} have no area",
                self.bounds
            )));
        }

        self.generation += 1;
        // A dismissed button is already hidden; keep its real look
        let snapshot = self.dismissed.take().unwrap_or(self.visuals);
        self.visuals = ButtonVisualState::hidden();
        self.sync_root();

        let local = Rect::from_size(self.bounds.size());
        let mut overlay = Layer::with_frame(local)
            .background(snapshot.background)
            .border(self.config.border_width, snapshot.border_color)
            .masks_to_bounds(true);
        overlay.corner_radius = self.config.corner_radius;
        let overlay = self.layers.create_layer(overlay);
        self.layers.add_sublayer(self.root, overlay)?;

        let target = square_bounds(local);
        let morph = AnimationGroup::new(self.config.timings.morph)
            .animate(PropertyAnimation::corner_radius(target.width / 2.0))
            .animate(PropertyAnimation::bounds(target))
            .hold();
        self.layers
            .add_animation(overlay, OVERLAY_ANIMATION, morph, now)?;

        let begin = self.job(JobKind::BeginRippling);
        self.timers.after(now, self.config.timings.ripple_delay, begin);

        log::debug!(
            "ripple button: start (cycle {}), morph {:?} -> {:?}",
            self.generation,
            local,
            target
        );
        self.phase = Phase::Morphing(ActiveCycle {
            generation: self.generation,
            snapshot,
            overlay,
            ripples: Vec::new(),
            target,
        });
        Ok(())
    }

    /// Expand the overlay over `destination` while fading it out, then
    /// discard it. With `animated == false` the overlay is discarded at once.
    ///
    /// The destination is set to clip its contents. The button's own colors
    /// stay transparent afterwards; call [`reset`](Self::reset) to show it
    /// again.
    pub fn stop_into(
        &mut self,
        destination: &mut HostView,
        animated: bool,
        now: Instant,
    ) -> Result<()> {
        if !self.is_action_in_progress() {
            return Err(self.rejected("stop"));
        }
        if !destination.bounds.has_area() {
            return Err(RippleError::InvalidConfiguration(format!(
                "destination bounds {:?} have no area",
                destination.bounds
            )));
        }

        let cycle = self.end_action()?;

        destination.clips_to_bounds = true;
        if !animated {
            self.dismiss(cycle);
            return Ok(());
        }

        let overlay_bounds = self
            .layers
            .get(cycle.overlay)
            .map(|l| l.bounds)
            .ok_or(RippleError::UnknownLayer(cycle.overlay))?;
        let scale = expand_scale(destination.bounds, overlay_bounds);

        let jobs = Rc::clone(&self.jobs);
        let generation = cycle.generation;
        let expand = AnimationGroup::new(self.config.timings.expand)
            .animate(PropertyAnimation::scale_to(scale))
            .animate(PropertyAnimation::opacity(1.0, 0.0))
            .hold()
            .on_complete(move |finished| {
                log::trace!("ripple button: expand finished={}", finished);
                jobs.borrow_mut().push(Job {
                    generation,
                    kind: JobKind::ExpandFinished,
                });
            });
        self.layers
            .add_animation(cycle.overlay, OVERLAY_ANIMATION, expand, now)?;

        log::debug!(
            "ripple button: expand into {:?} (scale {:.3})",
            destination.bounds,
            scale
        );
        self.phase = Phase::Expanding(cycle);
        Ok(())
    }

    /// Return to the original look, either at once or by animating the
    /// overlay back to the button's rectangle first.
    pub fn stop(&mut self, animated: bool, now: Instant) -> Result<()> {
        if !self.is_action_in_progress() {
            return Err(self.rejected("stop"));
        }

        let cycle = self.end_action()?;

        if !animated {
            self.restore(cycle);
            return Ok(());
        }

        let jobs = Rc::clone(&self.jobs);
        let generation = cycle.generation;
        let restore = AnimationGroup::new(self.config.timings.restore)
            .animate(PropertyAnimation::corner_radius(self.config.corner_radius))
            .animate(PropertyAnimation::bounds(Rect::from_size(self.bounds.size())))
            .animate(PropertyAnimation::scale(0.0, 1.0))
            .hold()
            .on_complete(move |finished| {
                log::trace!("ripple button: restore finished={}", finished);
                jobs.borrow_mut().push(Job {
                    generation,
                    kind: JobKind::RestoreFinished,
                });
            });
        self.layers
            .add_animation(cycle.overlay, OVERLAY_ANIMATION, restore, now)?;

        log::debug!("ripple button: restoring (cycle {})", generation);
        self.phase = Phase::Restoring(cycle);
        Ok(())
    }

    /// Drop everything and show the original look immediately, whatever the
    /// current phase. Idle stays idle.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.timers.cancel_all();
        if let Some(mut cycle) = mem::replace(&mut self.phase, Phase::Idle).into_cycle() {
            self.discard_ripples(&mut cycle);
            self.restore(cycle);
            log::debug!("ripple button: reset");
        } else if let Some(snapshot) = self.dismissed.take() {
            self.visuals = snapshot;
            self.sync_root();
            log::debug!("ripple button: reset after dismiss");
        }
    }

    /// Advance the sequence to `now`.
    ///
    /// Due steps run at their scheduled instant, so animations they attach
    /// start on time even if frames are late.
    pub fn advance(&mut self, now: Instant) {
        while let Some((at, job)) = self.timers.pop_due(now) {
            self.handle_job(job, at);
        }

        self.layers.tick(now);

        loop {
            let pending: Vec<Job> = self.jobs.borrow_mut().drain(..).collect();
            if pending.is_empty() {
                break;
            }
            for job in pending {
                self.handle_job(job, now);
            }
        }
    }

    fn job(&self, kind: JobKind) -> Job {
        Job {
            generation: self.generation,
            kind,
        }
    }

    fn handle_job(&mut self, job: Job, at: Instant) {
        if job.generation != self.generation {
            log::trace!("ripple button: dropping stale {:?}", job);
            return;
        }

        let phase = mem::replace(&mut self.phase, Phase::Idle);
        self.phase = match (job.kind, phase) {
            (JobKind::BeginRippling, Phase::Morphing(cycle)) => self.begin_rippling(cycle, at),
            (JobKind::SpawnRipple, Phase::Rippling(mut cycle)) => {
                self.spawn_ripple(&mut cycle, at);
                Phase::Rippling(cycle)
            }
            (JobKind::ExpandFinished, Phase::Expanding(cycle)) => {
                self.dismiss(cycle);
                Phase::Idle
            }
            (JobKind::RestoreFinished, Phase::Restoring(cycle)) => {
                let _ = self.layers.remove_all_animations(cycle.overlay);
                self.restore(cycle);
                Phase::Idle
            }
            (kind, phase) => {
                log::trace!("ripple button: {:?} ignored while {:?}", kind, phase.state());
                phase
            }
        };
    }

    fn begin_rippling(&mut self, cycle: ActiveCycle, at: Instant) -> Phase {
        let target = cycle.target;
        if let Some(overlay) = self.layers.get_mut(cycle.overlay) {
            overlay.bounds = target;
            overlay.corner_radius = target.width / 2.0;
        }

        if self.config.collapse_on_ripple {
            let collapse = AnimationGroup::new(self.config.timings.collapse)
                .animate(PropertyAnimation::scale(1.0, 0.0))
                .hold();
            if let Err(e) =
                self.layers
                    .add_animation(cycle.overlay, COLLAPSE_ANIMATION, collapse, at)
            {
                log::warn!("ripple button: collapse failed: {}", e);
            }
        }

        let spawn = self.job(JobKind::SpawnRipple);
        for &offset in &self.config.timings.ripple_offsets {
            self.timers.after(at, offset, spawn);
        }

        log::debug!("ripple button: rippling (cycle {})", cycle.generation);
        Phase::Rippling(cycle)
    }

    fn spawn_ripple(&mut self, cycle: &mut ActiveCycle, at: Instant) {
        let Some(overlay) = self.layers.get(cycle.overlay) else {
            log::warn!("ripple button: overlay missing, ring not spawned");
            return;
        };
        let frame = overlay.frame();
        let side = overlay.bounds.width;

        let ring = Layer::with_frame(frame).shape(ShapeStyle {
            path: circle_path(Point::new(side / 2.0, side / 2.0), side / 2.0, false),
            fill: Color::TRANSPARENT,
            stroke: cycle.snapshot.background,
            line_width: self.config.ripple_line_width,
        });
        let ring = self.layers.create_layer(ring);

        let pulse = AnimationGroup::new(self.config.timings.ripple_period)
            .animate(PropertyAnimation::scale(0.0, 1.0))
            .animate(PropertyAnimation::opacity(1.0, 0.0))
            .repeat(RepeatCount::Forever)
            .hold();
        let attached = self
            .layers
            .add_sublayer(self.root, ring)
            .and_then(|_| self.layers.add_animation(ring, RIPPLE_ANIMATION, pulse, at));
        if let Err(e) = attached {
            log::warn!("ripple button: ring setup failed: {}", e);
            self.discard_layer(ring);
            return;
        }

        cycle.ripples.push(ring);
        log::debug!(
            "ripple button: ring {} spawned (cycle {})",
            cycle.ripples.len(),
            cycle.generation
        );
    }

    /// Common first half of both stops: leave the action, cancel pending
    /// steps, drop the rings and the overlay's animations.
    fn end_action(&mut self) -> Result<ActiveCycle> {
        let mut cycle = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Morphing(c) | Phase::Rippling(c) => c,
            other => {
                self.phase = other;
                return Err(self.rejected("stop"));
            }
        };

        self.timers.cancel_all();
        self.discard_ripples(&mut cycle);

        // Keep the shape reached so far; only the collapse scale is dropped.
        let current = self.layers.presentation(cycle.overlay)?;
        if let Some(overlay) = self.layers.get_mut(cycle.overlay) {
            overlay.bounds = current.bounds;
            overlay.corner_radius = current.corner_radius;
        }
        self.layers.remove_all_animations(cycle.overlay)?;
        Ok(cycle)
    }

    fn discard_ripples(&mut self, cycle: &mut ActiveCycle) {
        for ring in cycle.ripples.drain(..) {
            let _ = self.layers.remove_all_animations(ring);
            self.discard_layer(ring);
        }
    }

    fn discard_layer(&mut self, id: LayerId) {
        if let Err(e) = self.layers.remove_from_superlayer(id) {
            log::warn!("ripple button: {}", e);
        }
    }

    /// Remove the overlay but keep the button hidden.
    fn dismiss(&mut self, cycle: ActiveCycle) {
        let _ = self.layers.remove_all_animations(cycle.overlay);
        self.discard_layer(cycle.overlay);
        self.dismissed = Some(cycle.snapshot);
        log::debug!("ripple button: dismissed (cycle {})", cycle.generation);
    }

    /// Remove the overlay and put the captured colors back.
    fn restore(&mut self, cycle: ActiveCycle) {
        let _ = self.layers.remove_all_animations(cycle.overlay);
        self.discard_layer(cycle.overlay);
        self.visuals = cycle.snapshot;
        self.sync_root();
        log::debug!("ripple button: restored (cycle {})", cycle.generation);
    }
}

/// Scale that grows an overlay with bounds `overlay` over `destination`.
///
/// Uses the overlay's bounds origin, which is only meaningful right after
/// the morph; the result approximates a full cover rather than
/// guaranteeing one.
pub fn expand_scale(destination: Rect, overlay: Rect) -> f32 {
    let offset = f32::max(
        destination.width - overlay.x / 2.0,
        destination.height - overlay.y / 2.0,
    );
    offset / (overlay.width / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn visuals() -> ButtonVisualState {
        ButtonVisualState::new(
            Color::rgb(0.2, 0.4, 0.8),
            Color::rgb(0.1, 0.1, 0.1),
            Color::WHITE,
        )
    }

    fn button() -> RippleButton {
        RippleButton::new(Rect::new(20.0, 100.0, 100.0, 60.0), visuals())
    }

    #[test]
    fn test_start_hides_button_and_adds_overlay() {
        let now = Instant::now();
        let mut b = button();
        b.start(now).unwrap();

        assert_eq!(b.state(), ButtonState::Morphing);
        assert!(b.is_action_in_progress());
        assert_eq!(b.visuals(), ButtonVisualState::hidden());

        let overlay = b.overlay().unwrap();
        assert_eq!(b.layers().children(b.root()), &[overlay]);
        let layer = b.layers().get(overlay).unwrap();
        assert_eq!(layer.background, visuals().background);
        assert_eq!(layer.border_color, visuals().border_color);
        assert_eq!(layer.frame(), Rect::new(0.0, 0.0, 100.0, 60.0));
    }

    #[test]
    fn test_begin_rippling_snaps_overlay_to_circle() {
        let now = Instant::now();
        let mut b = button();
        b.start(now).unwrap();

        b.advance(now + ms(199));
        assert_eq!(b.state(), ButtonState::Morphing);

        b.advance(now + ms(200));
        assert_eq!(b.state(), ButtonState::Rippling);
        let layer = b.layers().get(b.overlay().unwrap()).unwrap();
        assert_eq!(layer.bounds, Rect::new(0.0, 0.0, 60.0, 60.0));
        assert_eq!(layer.corner_radius, 30.0);
        // Centered on the button
        assert_eq!(layer.frame(), Rect::new(20.0, 0.0, 60.0, 60.0));
    }

    #[test]
    fn test_expand_completion_ignores_finished_flag() {
        let now = Instant::now();
        let mut b = button();
        let mut view = HostView::new(Rect::new(0.0, 0.0, 320.0, 480.0));
        b.start(now).unwrap();
        b.advance(now + ms(400));
        b.stop_into(&mut view, true, now + ms(400)).unwrap();
        let overlay = b.overlay().unwrap();

        // Cut the expansion short: the hook reports finished = false
        b.layers.remove_all_animations(overlay).unwrap();
        b.advance(now + ms(410));

        assert_eq!(b.state(), ButtonState::Idle);
        assert!(!b.is_action_in_progress());
        assert!(!b.layers().contains(overlay));
    }

    #[test]
    fn test_stale_job_is_ignored() {
        let now = Instant::now();
        let mut b = button();
        b.start(now).unwrap();
        let stale = b.job(JobKind::BeginRippling);
        b.reset();
        b.start(now + ms(10)).unwrap();

        b.handle_job(stale, now + ms(20));
        assert_eq!(b.state(), ButtonState::Morphing);
    }

    #[test]
    fn test_expand_scale_formula() {
        let scale = expand_scale(
            Rect::new(0.0, 0.0, 320.0, 480.0),
            Rect::new(0.0, 0.0, 60.0, 60.0),
        );
        assert_eq!(scale, 16.0);

        // Origin offsets shrink the reach by half their value
        let scale = expand_scale(
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Rect::new(20.0, 10.0, 40.0, 40.0),
        );
        assert_eq!(scale, 90.0 / 20.0);
    }
}
