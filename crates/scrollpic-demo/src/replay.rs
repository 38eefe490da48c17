#![forbid(unsafe_code)]

//! Headless replay of a carousel against a timed input script.

use core::time::Duration;

use scrollpic_core::carousel::{Carousel, Snapshot};
use scrollpic_core::config::CarouselConfig;
use scrollpic_core::error::CarouselError;
use scrollpic_core::headless::{MemoryDom, NodeId};
use scrollpic_core::scheduler::VirtualScheduler;
use serde::Serialize;
use tracing::{debug, info_span, warn};

use crate::cli::Opts;
use crate::script::Action;

/// Why a frame was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameEvent {
    Mounted,
    Input,
    Settled,
}

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub t_ms: u64,
    pub event: FrameEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
    #[serde(flatten)]
    pub state: Snapshot,
}

/// Build a page whose container holds `slides` labelled `<div>`s.
pub fn page(slides: usize) -> (MemoryDom, NodeId) {
    let mut dom = MemoryDom::new();
    let body = dom.element("body");
    let container = dom.append_element(body, "div");
    for i in 1..=slides {
        let slide = dom.append_element(container, "div");
        dom.append_text(slide, &format!("slide {i}"));
    }
    (dom, container)
}

fn millis(t: Duration) -> u64 {
    u64::try_from(t.as_millis()).unwrap_or(u64::MAX)
}

fn frame(
    carousel: &Carousel<MemoryDom, VirtualScheduler>,
    event: FrameEvent,
) -> Option<Frame> {
    Some(Frame {
        t_ms: millis(carousel.scheduler().now()),
        event,
        input: None,
        rejected: None,
        state: carousel.snapshot()?,
    })
}

/// Mount a carousel per `opts`, play the script, and collect the frames.
///
/// Inputs are applied on the first frame boundary at or after their time.
pub fn replay(opts: &Opts) -> Result<Vec<Frame>, CarouselError> {
    let _span = info_span!("scrollpic.replay", slides = opts.slides).entered();
    let config = CarouselConfig::new("demo", opts.width, opts.height).with_wheelable(opts.wheelable);
    let (dom, container) = page(opts.slides);
    let mut carousel = Carousel::new(config, dom, VirtualScheduler::new(), container)?;
    carousel.initialize()?;

    let mut frames = Vec::new();
    frames.extend(frame(&carousel, FrameEvent::Mounted));

    let step = Duration::from_millis(opts.frame_ms.max(1));
    let end = Duration::from_millis(opts.duration_ms);
    let mut script = opts.script.iter().peekable();
    let mut was_animating = carousel.is_animating();

    while carousel.scheduler().now() < end {
        let now = carousel.scheduler().now();
        while let Some(entry) = script.next_if(|s| s.at <= now) {
            let rejected = entry.action.apply(&mut carousel).err().map(|err| {
                warn!(%err, action = ?entry.action, "scripted input rejected");
                err.to_string()
            });
            if let Some(mut f) = frame(&carousel, FrameEvent::Input) {
                f.input = Some(entry.action);
                f.rejected = rejected;
                frames.push(f);
            }
            was_animating |= carousel.is_animating();
        }

        let fired = carousel.advance_time(step.min(end - now));
        if fired > 0 {
            debug!(fired, t_ms = millis(carousel.scheduler().now()), "timers fired");
        }
        let animating = carousel.is_animating();
        if was_animating && !animating {
            frames.extend(frame(&carousel, FrameEvent::Settled));
        }
        was_animating = animating;
    }

    carousel.destroy();
    Ok(frames)
}
