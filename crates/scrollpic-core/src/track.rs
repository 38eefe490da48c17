#![forbid(unsafe_code)]

//! Position bookkeeping for the looping strip.
//!
//! The strip holds `N + 2` slots: slot `0` is a clone of the last slide,
//! slots `1..=N` are the real slides, and slot `N + 1` is a clone of the first
//! slide. The strip's horizontal offset at rest is `-start * width`.
//!
//! # Invariants
//!
//! 1. `start` stays in `0..=N`; `0` is the phantom alias of slide `N`.
//! 2. Wrapping from rest never moves the visible content: both wrap masks
//!    jump between slot `0` and slot `N`, which render the same slide.
//! 3. [`Track::plan`] clamps `steps` to `1..=N` and wraps overshoot modulo `N`.

use serde::Serialize;

/// Direction of a transition, named after where the next slide comes from.
///
/// `Right` shows the next slide (strip moves toward negative offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Stable lowercase name used in logs and traces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Outcome of planning one transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub direction: Direction,
    /// Offset the animation starts from, after any wrap-mask snap.
    pub from: f64,
    /// Rest offset of the new `start`.
    pub target: f64,
    /// Logical slot after the transition.
    pub start: usize,
    /// Whether a wrap mask repositioned the strip before animating.
    pub masked: bool,
}

/// Slot index and rendered offset of the strip.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    count: usize,
    width: f64,
    start: usize,
    offset: f64,
}

impl Track {
    /// Track for `count` real slides of `width` pixels, resting on slide 1.
    ///
    /// `count` must be at least 1.
    #[must_use]
    pub fn new(count: usize, width: f64) -> Self {
        debug_assert!(count >= 1, "track needs at least one slide");
        Self {
            count,
            width,
            start: 1,
            offset: -width,
        }
    }

    /// Number of real slides.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Slide width in pixels.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Number of slots in the rendered strip.
    #[must_use]
    pub const fn strip_len(&self) -> usize {
        self.count + 2
    }

    /// Current logical slot.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Currently rendered offset.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Record the rendered offset (driven by the stepper).
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    /// Rest offset of `slot`.
    #[must_use]
    pub fn slot_offset(&self, slot: usize) -> f64 {
        // `0.0 - x` keeps slot 0 at +0.0
        0.0 - slot as f64 * self.width
    }

    /// 1-based index of the displayed real slide (`start == 0` maps to `N`).
    #[must_use]
    pub const fn displayed_index(&self) -> usize {
        if self.start == 0 {
            self.count
        } else {
            self.start
        }
    }

    /// Whether the rendered offset equals the rest offset of `start`.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        same_offset(self.offset, self.slot_offset(self.start))
    }

    /// Whether the offset rests on `slot` or lies on the leg between
    /// `neighbour` and `slot`.
    fn within_leg(&self, slot: usize, neighbour: usize) -> bool {
        let (a, b) = (self.slot_offset(slot), self.slot_offset(neighbour));
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.offset > lo - 1e-6 && self.offset < hi + 1e-6
    }

    /// Compute the next `start` and the animation endpoints.
    ///
    /// Applies the wrap masks by moving the rendered offset in place, so the
    /// returned [`Transition::from`] equals [`Track::offset`] afterwards.
    /// A strip still travelling the last leg into a phantom slot is treated
    /// as having arrived there before the snap.
    pub fn plan(&mut self, direction: Direction, steps: usize) -> Transition {
        let n = self.count;
        let steps = steps.clamp(1, n);
        let last_rest = self.slot_offset(n);
        let mut masked = false;

        let start = match direction {
            Direction::Right => {
                let next = if self.start == n {
                    if self.within_leg(n, n - 1) {
                        self.offset = 0.0;
                        masked = true;
                    }
                    steps
                } else {
                    self.start + steps
                };
                if next > n { next - n } else { next }
            }
            Direction::Left => {
                if self.start == 0 {
                    if self.within_leg(0, 1) {
                        self.offset = last_rest;
                        masked = true;
                    }
                    n - steps
                } else if self.start >= steps {
                    self.start - steps
                } else {
                    self.start + n - steps
                }
            }
        };

        self.start = start;
        Transition {
            direction,
            from: self.offset,
            target: self.slot_offset(start),
            start,
            masked,
        }
    }
}

/// Offsets are sums of the same float increments and snapped targets;
/// compare with a sub-pixel tolerance.
fn same_offset(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
