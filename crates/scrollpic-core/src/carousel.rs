#![forbid(unsafe_code)]

//! The carousel controller.
//!
//! [`Carousel`] owns the configuration, the mounted strip, the position track
//! and every timer handle. It is driven from the outside: the host forwards
//! timer firings to [`Carousel::on_timer`] and user input to the interaction
//! methods (`click_arrow`, `click_index`, `wheel`, `pointer_enter`,
//! `pointer_leave`).
//!
//! # Lifecycle
//!
//! 1. [`Carousel::new`] validates the configuration; the page is untouched.
//! 2. [`Carousel::initialize`] captures the slides, mounts the strip and the
//!    controls, and starts auto-advance.
//! 3. Transitions run until [`Carousel::destroy`] cancels every timer.
//!
//! # Invariants
//!
//! - At most one stepper and one step timer are live; a new transition
//!   replaces both.
//! - When no stepper is live, the rendered offset is `-start * width`.
//! - With index display enabled, exactly one indicator carries the selected
//!   class and it matches the displayed slide.

use core::time::Duration;

use serde::Serialize;
use tracing::{debug, debug_span, info, trace, warn};

use crate::config::CarouselConfig;
use crate::dom::{Dom, apply_styles, is_positioned, px};
use crate::error::{CarouselError, ConfigError, HostError};
use crate::indicator::{
    DATA_INDEX_ATTR, INDEX_TAG_ATTR, INDEX_WRAP_CLASS, IndicatorSet, indicator_class,
};
use crate::scheduler::{Scheduler, TimerHandle, TimerKind, VirtualScheduler};
use crate::stepper::{StepOutcome, Stepper};
use crate::track::{Direction, Track};

/// Class of the left arrow control.
pub const LEFT_ARROW_CLASS: &str = "plugin-scroll-left";
/// Class of the right arrow control.
pub const RIGHT_ARROW_CLASS: &str = "plugin-scroll-right";

/// The two arrow control elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrows<N> {
    pub left: N,
    pub right: N,
}

/// Observable state of a mounted carousel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Strip slot at rest (or being animated to).
    pub start: usize,
    /// Rendered strip offset in pixels.
    pub offset: f64,
    /// 1-based slide on screen.
    pub current_index: usize,
    pub animating: bool,
    pub auto_advancing: bool,
    pub wraps: u64,
}

#[derive(Debug)]
struct IndexControls<N> {
    wrap: N,
    items: Vec<N>,
    set: IndicatorSet,
}

/// Strip and controls built off-page, not yet installed.
#[derive(Debug)]
struct Parts<N> {
    wrapper: N,
    strip: Vec<N>,
    arrows: Option<Arrows<N>>,
    index: Option<IndexControls<N>>,
}

#[derive(Debug)]
struct Mount<N> {
    wrapper: N,
    strip: Vec<N>,
    track: Track,
    arrows: Option<Arrows<N>>,
    index: Option<IndexControls<N>>,
}

#[derive(Debug, Default)]
struct Timers {
    auto: Option<TimerHandle>,
    step: Option<TimerHandle>,
    settle: Option<TimerHandle>,
}

impl Timers {
    fn slot(&mut self, kind: TimerKind) -> &mut Option<TimerHandle> {
        match kind {
            TimerKind::AutoAdvance => &mut self.auto,
            TimerKind::Step => &mut self.step,
            TimerKind::WheelSettle => &mut self.settle,
        }
    }
}

/// Carousel controller over a host document `D` and timer source `S`.
#[derive(Debug)]
pub struct Carousel<D: Dom, S: Scheduler> {
    config: CarouselConfig,
    dom: D,
    scheduler: S,
    container: D::Node,
    mount: Option<Mount<D::Node>>,
    stepper: Option<Stepper>,
    timers: Timers,
    pending_wheel: f64,
    wraps: u64,
    destroyed: bool,
}

impl<D: Dom, S: Scheduler> Carousel<D, S> {
    /// Create a controller for `container`. Nothing is mounted yet.
    pub fn new(
        config: CarouselConfig,
        dom: D,
        scheduler: S,
        container: D::Node,
    ) -> Result<Self, CarouselError> {
        config.validate()?;
        Ok(Self {
            config,
            dom,
            scheduler,
            container,
            mount: None,
            stepper: None,
            timers: Timers::default(),
            pending_wheel: 0.0,
            wraps: 0,
            destroyed: false,
        })
    }

    // ------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------

    /// Build the looping strip inside the container, create the enabled
    /// controls, and start auto-advance.
    ///
    /// Fails with [`ConfigError::NoSlides`] before touching the page when the
    /// container has no element children. Strip and controls are built
    /// detached; if installing them fails, the original slides are put back
    /// so a later call starts from the same page.
    pub fn initialize(&mut self) -> Result<(), CarouselError> {
        if self.destroyed {
            return Err(CarouselError::Destroyed);
        }
        if self.mount.is_some() {
            return Err(CarouselError::AlreadyInitialized);
        }
        let _span = debug_span!("scrollpic.initialize", id = %self.config.id).entered();

        let slides = self.dom.element_children(&self.container);
        if slides.is_empty() {
            warn!(id = %self.config.id, "refusing to mount an empty carousel");
            return Err(ConfigError::NoSlides.into());
        }

        let parts = self.build_parts(&slides)?;
        if let Err(err) = self.install(&parts) {
            warn!(%err, "mount failed, restoring original slides");
            self.restore_slides(&slides);
            return Err(err.into());
        }

        let Parts {
            wrapper,
            strip,
            arrows,
            index,
        } = parts;
        info!(
            id = %self.config.id,
            slides = slides.len(),
            strip = strip.len(),
            "carousel mounted"
        );
        self.mount = Some(Mount {
            wrapper,
            strip,
            track: Track::new(slides.len(), self.config.width),
            arrows,
            index,
        });
        self.start_auto_advance();
        Ok(())
    }

    fn build_parts(&mut self, slides: &[D::Node]) -> Result<Parts<D::Node>, HostError> {
        let (wrapper, strip) = self.build_strip(slides)?;
        let arrows = if self.config.support_arrow_click {
            Some(self.build_arrows()?)
        } else {
            None
        };
        let index = if self.config.support_index {
            Some(self.build_index(slides.len())?)
        } else {
            None
        };
        Ok(Parts {
            wrapper,
            strip,
            arrows,
            index,
        })
    }

    /// Style the container and swap the built parts in for its children.
    fn install(&mut self, parts: &Parts<D::Node>) -> Result<(), HostError> {
        self.prepare_container()?;
        let container = self.container.clone();
        self.dom.clear_children(&container)?;
        self.dom.append_child(&container, &parts.wrapper)?;
        if let Some(arrows) = &parts.arrows {
            self.dom.append_child(&container, &arrows.left)?;
            self.dom.append_child(&container, &arrows.right)?;
            // Heights are only known once the arrows are in the document.
            for arrow in [&arrows.left, &arrows.right] {
                let top = (self.config.height - self.dom.offset_height(arrow)) / 2.0;
                self.dom.set_style(arrow, "top", &px(top))?;
            }
        }
        if let Some(index) = &parts.index {
            self.dom.append_child(&container, &index.wrap)?;
        }
        Ok(())
    }

    fn restore_slides(&mut self, slides: &[D::Node]) {
        let container = self.container.clone();
        if let Err(err) = self.dom.clear_children(&container) {
            warn!(%err, "could not clear container");
            return;
        }
        for slide in slides {
            if let Err(err) = self.dom.append_child(&container, slide) {
                warn!(%err, "could not restore slide");
                return;
            }
        }
    }

    fn prepare_container(&mut self) -> Result<(), HostError> {
        let container = self.container.clone();
        apply_styles(
            &mut self.dom,
            &container,
            &[
                ("overflow", "hidden".to_string()),
                ("height", px(self.config.height)),
                ("width", px(self.config.width)),
            ],
        )?;
        let position = self.dom.computed_style(&container, "position");
        if !is_positioned(position.as_deref()) {
            debug!(?position, "container has no positioning context, using relative");
            apply_styles(
                &mut self.dom,
                &container,
                &[
                    ("position", "relative".to_string()),
                    ("left", px(0.0)),
                    ("top", px(0.0)),
                ],
            )?;
        }
        Ok(())
    }

    /// Clone the slides into `[last, 1..=N, first]` inside a fresh, detached
    /// wrapper. The original slides are not modified.
    fn build_strip(&mut self, slides: &[D::Node]) -> Result<(D::Node, Vec<D::Node>), HostError> {
        let width = self.config.width;
        let height = self.config.height;
        let slide_styles = [
            ("float", "left".to_string()),
            ("display", "block".to_string()),
            ("width", px(width)),
            ("height", px(height)),
        ];

        let mut copies = Vec::with_capacity(slides.len());
        for slide in slides {
            let copy = self.dom.deep_clone(slide)?;
            apply_styles(&mut self.dom, &copy, &slide_styles)?;
            copies.push(copy);
        }

        let mut strip = Vec::with_capacity(copies.len() + 2);
        if let (Some(first), Some(last)) = (copies.first(), copies.last()) {
            let lead = self.dom.deep_clone(last)?;
            let tail = self.dom.deep_clone(first)?;
            strip.push(lead);
            strip.extend(copies.iter().cloned());
            strip.push(tail);
        }

        let wrapper = self.dom.create_element("div")?;
        apply_styles(
            &mut self.dom,
            &wrapper,
            &[
                ("height", px(height)),
                ("width", px(strip.len() as f64 * width)),
                ("position", "absolute".to_string()),
                ("left", px(-width)),
                ("top", px(0.0)),
            ],
        )?;
        for node in &strip {
            self.dom.append_child(&wrapper, node)?;
        }
        Ok((wrapper, strip))
    }

    fn build_arrows(&mut self) -> Result<Arrows<D::Node>, HostError> {
        let left = self.dom.create_element("span")?;
        let right = self.dom.create_element("span")?;
        self.dom.set_class_name(&left, LEFT_ARROW_CLASS);
        self.dom.set_class_name(&right, RIGHT_ARROW_CLASS);
        Ok(Arrows { left, right })
    }

    fn build_index(&mut self, count: usize) -> Result<IndexControls<D::Node>, HostError> {
        let set = IndicatorSet::new(count);
        let wrap = self.dom.create_element("div")?;
        self.dom.set_class_name(&wrap, INDEX_WRAP_CLASS);
        let mut items = Vec::with_capacity(count);
        for slot in 0..count {
            let label = (slot + 1).to_string();
            let item = self.dom.create_element("span")?;
            self.dom.set_class_name(&item, &set.class_for(slot));
            self.dom.set_attribute(&item, DATA_INDEX_ATTR, &label)?;
            self.dom.set_attribute(&item, INDEX_TAG_ATTR, "1")?;
            self.dom.set_text(&item, &label);
            self.dom.append_child(&wrap, &item)?;
            items.push(item);
        }
        Ok(IndexControls { wrap, items, set })
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Move `steps` slides in `direction`, replacing any running animation.
    ///
    /// `steps` is clamped to `1..=N`; see [`Track::plan`].
    pub fn advance(&mut self, direction: Direction, steps: usize) -> Result<(), CarouselError> {
        self.ensure_live()?;
        let _span = debug_span!("scrollpic.advance", direction = direction.as_str(), steps)
            .entered();

        self.cancel_timer(TimerKind::Step);
        self.stepper = None;

        let mount = self.mount.as_mut().ok_or(CarouselError::NotInitialized)?;
        let transition = mount.track.plan(direction, steps);
        if transition.masked {
            self.wraps += 1;
            trace!(from = transition.from, "wrap mask snap");
            write_offset(&mut self.dom, &mount.wrapper, transition.from);
        }
        if let Some(index) = mount.index.as_mut() {
            let previous = index.set.selected_slot();
            let selected = index.set.select_start(transition.start);
            if previous != selected {
                for (slot, item) in index.items.iter().enumerate() {
                    self.dom.set_class_name(item, &indicator_class(slot == selected));
                }
            }
        }
        debug!(
            start = transition.start,
            from = transition.from,
            target = transition.target,
            masked = transition.masked,
            "transition planned"
        );

        self.stepper = Some(Stepper::new(
            transition.from,
            transition.target,
            self.config.animation_duration(),
            self.config.tick(),
        ));
        let handle = self.scheduler.schedule(TimerKind::Step, self.config.tick(), true);
        if handle.is_none() {
            warn!("step timer unavailable, jumping to target");
            self.finish_animation();
        }
        self.timers.step = handle;
        Ok(())
    }

    /// Handle a timer firing routed from the host.
    ///
    /// Firings for a kind with no live handle are stale and ignored.
    pub fn on_timer(&mut self, kind: TimerKind) {
        if self.destroyed || self.timers.slot(kind).is_none() {
            trace!(%kind, "ignoring stale timer");
            return;
        }
        let _span = debug_span!("scrollpic.timer", kind = kind.as_str()).entered();
        match kind {
            TimerKind::AutoAdvance => {
                if let Err(err) = self.advance(Direction::Right, 1) {
                    warn!(%err, "auto-advance failed");
                }
            }
            TimerKind::Step => self.step_tick(),
            TimerKind::WheelSettle => {
                self.timers.settle = None;
                self.settle_wheel();
            }
        }
    }

    fn step_tick(&mut self) {
        let Some(stepper) = self.stepper.as_mut() else {
            self.cancel_timer(TimerKind::Step);
            return;
        };
        let outcome = stepper.tick();
        trace!(offset = outcome.offset(), "step");
        if let Some(mount) = self.mount.as_mut() {
            mount.track.set_offset(outcome.offset());
            write_offset(&mut self.dom, &mount.wrapper, outcome.offset());
        }
        if let StepOutcome::Arrived(_) = outcome {
            self.stepper = None;
            self.cancel_timer(TimerKind::Step);
        }
    }

    /// Snap the running animation to its target and stop it.
    fn finish_animation(&mut self) {
        if let Some(stepper) = self.stepper.take()
            && let Some(mount) = self.mount.as_mut()
        {
            mount.track.set_offset(stepper.target());
            write_offset(&mut self.dom, &mount.wrapper, stepper.target());
        }
        self.cancel_timer(TimerKind::Step);
    }

    /// Stop the running animation where it is.
    fn halt_animation(&mut self) {
        self.stepper = None;
        self.cancel_timer(TimerKind::Step);
    }

    // ------------------------------------------------------------------
    // Auto-advance driver
    // ------------------------------------------------------------------

    /// (Re)start the auto-advance driver. No-op before mount or after
    /// teardown.
    pub fn start_auto_advance(&mut self) {
        if self.destroyed || self.mount.is_none() {
            return;
        }
        self.cancel_timer(TimerKind::AutoAdvance);
        self.timers.auto =
            self.scheduler
                .schedule(TimerKind::AutoAdvance, self.config.switch_period(), true);
        if self.timers.auto.is_none() {
            warn!("auto-advance timer unavailable");
        }
    }

    /// Stop the auto-advance driver. Safe to call when it is not running.
    pub fn stop_auto_advance(&mut self) {
        self.cancel_timer(TimerKind::AutoAdvance);
    }

    fn cancel_timer(&mut self, kind: TimerKind) {
        if let Some(handle) = self.timers.slot(kind).take() {
            self.scheduler.cancel(handle);
        }
    }

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    /// Arrow control click.
    pub fn click_arrow(&mut self, direction: Direction) -> Result<(), CarouselError> {
        self.ensure_live()?;
        self.stop_auto_advance();
        self.halt_animation();
        let result = self.advance(direction, 1);
        self.start_auto_advance();
        result
    }

    /// Index control click on 1-based `position`.
    pub fn click_index(&mut self, position: usize) -> Result<(), CarouselError> {
        self.ensure_live()?;
        let count = self.slide_count().unwrap_or(0);
        if position == 0 || position > count {
            return Err(CarouselError::IndexOutOfRange {
                index: position,
                count,
            });
        }
        self.stop_auto_advance();
        let route = match self.mount.as_ref() {
            Some(Mount {
                index: Some(index), ..
            }) => index.set.route_to(position),
            Some(mount) => {
                let mut set = IndicatorSet::new(count);
                set.select_start(mount.track.start());
                set.route_to(position)
            }
            None => None,
        };
        let result = match route {
            Some((direction, steps)) => self.advance(direction, steps),
            None => {
                debug!(position, "index already selected");
                Ok(())
            }
        };
        self.start_auto_advance();
        result
    }

    /// Mouse-wheel input. Bursts are coalesced by the settle timer; only the
    /// last delta decides the direction.
    pub fn wheel(&mut self, delta: f64) -> Result<(), CarouselError> {
        self.ensure_live()?;
        if !self.config.wheelable {
            return Ok(());
        }
        self.cancel_timer(TimerKind::WheelSettle);
        self.stop_auto_advance();
        self.pending_wheel = delta;
        self.timers.settle =
            self.scheduler
                .schedule(TimerKind::WheelSettle, self.config.wheel_settle(), false);
        if self.timers.settle.is_none() {
            warn!("wheel settle timer unavailable, applying immediately");
            self.settle_wheel();
        }
        Ok(())
    }

    fn settle_wheel(&mut self) {
        let direction = if self.pending_wheel > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        };
        self.pending_wheel = 0.0;
        if let Err(err) = self.advance(direction, 1) {
            warn!(%err, "wheel transition failed");
        }
        self.start_auto_advance();
    }

    /// Pointer entered the container or an arrow.
    pub fn pointer_enter(&mut self) -> Result<(), CarouselError> {
        self.ensure_live()?;
        if self.config.pauseable {
            self.stop_auto_advance();
        }
        Ok(())
    }

    /// Pointer left the container or an arrow.
    pub fn pointer_leave(&mut self) -> Result<(), CarouselError> {
        self.ensure_live()?;
        if self.config.pauseable {
            self.start_auto_advance();
        }
        Ok(())
    }

    /// Cancel every timer and stop reacting to input. The mounted DOM is left
    /// as it is. Calling it twice is harmless.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        for kind in TimerKind::ALL {
            self.cancel_timer(kind);
        }
        self.stepper = None;
        self.destroyed = true;
        debug!(id = %self.config.id, "carousel destroyed");
    }

    fn ensure_live(&self) -> Result<(), CarouselError> {
        if self.destroyed {
            Err(CarouselError::Destroyed)
        } else if self.mount.is_none() {
            Err(CarouselError::NotInitialized)
        } else {
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    #[must_use]
    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[must_use]
    pub fn container(&self) -> &D::Node {
        &self.container
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.mount.is_some()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Position bookkeeping, once mounted.
    #[must_use]
    pub fn track(&self) -> Option<&Track> {
        self.mount.as_ref().map(|m| &m.track)
    }

    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.track().map(Track::start)
    }

    #[must_use]
    pub fn offset(&self) -> Option<f64> {
        self.track().map(Track::offset)
    }

    #[must_use]
    pub fn slide_count(&self) -> Option<usize> {
        self.track().map(Track::count)
    }

    /// 1-based index of the slide on screen.
    #[must_use]
    pub fn displayed_index(&self) -> Option<usize> {
        self.track().map(Track::displayed_index)
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.stepper.is_some()
    }

    #[must_use]
    pub fn is_auto_advancing(&self) -> bool {
        self.timers.auto.is_some()
    }

    /// Number of wrap-mask snaps performed so far.
    #[must_use]
    pub fn wrap_count(&self) -> u64 {
        self.wraps
    }

    /// Current state, once mounted.
    #[must_use]
    pub fn snapshot(&self) -> Option<Snapshot> {
        let track = self.track()?;
        Some(Snapshot {
            start: track.start(),
            offset: track.offset(),
            current_index: track.displayed_index(),
            animating: self.is_animating(),
            auto_advancing: self.is_auto_advancing(),
            wraps: self.wraps,
        })
    }

    /// The strip wrapper element.
    #[must_use]
    pub fn wrapper(&self) -> Option<&D::Node> {
        self.mount.as_ref().map(|m| &m.wrapper)
    }

    /// Strip slots: phantom, real slides, phantom.
    #[must_use]
    pub fn strip(&self) -> &[D::Node] {
        self.mount.as_ref().map_or(&[], |m| m.strip.as_slice())
    }

    #[must_use]
    pub fn arrows(&self) -> Option<&Arrows<D::Node>> {
        self.mount.as_ref().and_then(|m| m.arrows.as_ref())
    }

    /// Element wrapping the indicators.
    #[must_use]
    pub fn index_wrap(&self) -> Option<&D::Node> {
        self.mount
            .as_ref()
            .and_then(|m| m.index.as_ref())
            .map(|i| &i.wrap)
    }

    /// Indicator elements in display order.
    #[must_use]
    pub fn indicators(&self) -> &[D::Node] {
        self.mount
            .as_ref()
            .and_then(|m| m.index.as_ref())
            .map_or(&[], |i| i.items.as_slice())
    }

    /// 0-based slot of the selected indicator.
    #[must_use]
    pub fn selected_indicator(&self) -> Option<usize> {
        self.mount
            .as_ref()
            .and_then(|m| m.index.as_ref())
            .map(|i| i.set.selected_slot())
    }
}

impl<D: Dom> Carousel<D, VirtualScheduler> {
    /// Advance the virtual clock by `dt`, firing every timer that falls due.
    ///
    /// Returns the number of timer firings processed.
    pub fn advance_time(&mut self, dt: Duration) -> usize {
        let until = self.scheduler.now().saturating_add(dt);
        let mut fired = 0;
        while let Some((_, kind)) = self.scheduler.pop_due(until) {
            fired += 1;
            self.on_timer(kind);
        }
        self.scheduler.settle(until);
        fired
    }

    /// Run the clock until the current animation has settled.
    ///
    /// Returns the virtual time spent; zero when nothing was animating.
    pub fn run_until_idle(&mut self) -> Duration {
        let begin = self.scheduler.now();
        let tick = self.config.tick();
        let budget = self.config.animation_duration().saturating_mul(4) + tick * 4;
        while self.is_animating() && self.scheduler.now().saturating_sub(begin) < budget {
            self.advance_time(tick);
        }
        self.scheduler.now().saturating_sub(begin)
    }
}

fn write_offset<D: Dom>(dom: &mut D, wrapper: &D::Node, offset: f64) {
    if let Err(err) = dom.set_style(wrapper, "left", &px(offset)) {
        warn!(%err, "failed to move strip");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{MemoryDom, NodeId};

    fn mounted(n: usize) -> Carousel<MemoryDom, VirtualScheduler> {
        let mut dom = MemoryDom::new();
        let root = dom.element("body");
        let container = dom.append_element(root, "div");
        for i in 0..n {
            let slide = dom.append_element(container, "div");
            dom.append_text(slide, &format!("slide {}", i + 1));
        }
        let config = CarouselConfig::new("c", 100.0, 50.0);
        let mut c = Carousel::new(config, dom, VirtualScheduler::new(), container).unwrap();
        c.initialize().unwrap();
        c
    }

    fn left_style(c: &Carousel<MemoryDom, VirtualScheduler>) -> String {
        let wrapper: NodeId = *c.wrapper().unwrap();
        c.dom().style(wrapper, "left").unwrap_or_default().to_string()
    }

    #[test]
    fn operations_before_initialize_are_rejected() {
        let mut dom = MemoryDom::new();
        let container = dom.element("div");
        let mut c = Carousel::new(
            CarouselConfig::new("c", 10.0, 10.0),
            dom,
            VirtualScheduler::new(),
            container,
        )
        .unwrap();
        assert_eq!(
            c.advance(Direction::Right, 1),
            Err(CarouselError::NotInitialized)
        );
        assert_eq!(c.pointer_leave(), Err(CarouselError::NotInitialized));
        c.start_auto_advance();
        assert!(!c.is_auto_advancing());
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let mut dom = MemoryDom::new();
        let container = dom.element("div");
        let err = Carousel::new(
            CarouselConfig::new("c", 0.0, 10.0),
            dom,
            VirtualScheduler::new(),
            container,
        )
        .unwrap_err();
        assert!(matches!(err, CarouselError::Config(_)));
    }

    #[test]
    fn second_initialize_fails() {
        let mut c = mounted(2);
        assert_eq!(c.initialize(), Err(CarouselError::AlreadyInitialized));
    }

    #[test]
    fn stepper_writes_offsets_to_wrapper() {
        let mut c = mounted(3);
        assert_eq!(left_style(&c), "-100px");
        c.advance(Direction::Right, 1).unwrap();
        assert!(c.is_animating());
        c.advance_time(Duration::from_millis(5));
        let mid = left_style(&c);
        assert_ne!(mid, "-100px");
        c.run_until_idle();
        assert_eq!(left_style(&c), "-200px");
        assert_eq!(c.offset(), Some(-200.0));
    }

    #[test]
    fn new_transition_replaces_stepper() {
        let mut c = mounted(4);
        c.advance(Direction::Right, 1).unwrap();
        c.advance_time(Duration::from_millis(50));
        c.advance(Direction::Right, 1).unwrap();
        assert_eq!(c.scheduler().pending_count(), 2);
        c.run_until_idle();
        assert_eq!(c.start(), Some(3));
        assert_eq!(c.offset(), Some(-300.0));
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let mut c = mounted(3);
        c.advance(Direction::Left, 1).unwrap();
        c.run_until_idle();
        let snap = c.snapshot().unwrap();
        assert_eq!(snap.current_index, 3);
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(
            json,
            r#"{"start":0,"offset":0.0,"currentIndex":3,"animating":false,"autoAdvancing":true,"wraps":0}"#
        );
    }

    #[test]
    fn destroy_twice_is_harmless() {
        let mut c = mounted(2);
        c.destroy();
        c.destroy();
        assert!(c.is_destroyed());
        assert_eq!(c.scheduler().pending_count(), 0);
        assert_eq!(c.click_arrow(Direction::Left), Err(CarouselError::Destroyed));
        assert_eq!(c.initialize(), Err(CarouselError::Destroyed));
    }
}
