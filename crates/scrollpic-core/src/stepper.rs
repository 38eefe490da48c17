#![forbid(unsafe_code)]

//! Fixed-step linear interpolation of the strip offset.
//!
//! A [`Stepper`] is created per transition and advanced once per step-timer
//! tick. The per-tick delta is `(target - from) / duration * tick`; there is no
//! easing and no compensation for late ticks.

use core::time::Duration;

/// Sign of the offset change over a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Offset decreases (the strip slides left, revealing the next slide).
    Decreasing,
    /// Offset increases.
    Increasing,
}

/// Result of one stepper tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Offset moved by one delta; keep ticking.
    Moving(f64),
    /// Offset snapped to the target; stop the step timer.
    Arrived(f64),
}

impl StepOutcome {
    /// Offset to render after this tick.
    #[must_use]
    pub const fn offset(self) -> f64 {
        match self {
            Self::Moving(offset) | Self::Arrived(offset) => offset,
        }
    }
}

/// In-flight animation state for one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Stepper {
    motion: Motion,
    offset: f64,
    target: f64,
    delta: f64,
    ticks: u32,
}

impl Stepper {
    /// Plan an animation from `from` to `target` over `duration`, ticking every
    /// `tick`. A zero `duration` is treated as one tick.
    #[must_use]
    pub fn new(from: f64, target: f64, duration: Duration, tick: Duration) -> Self {
        let distance = target - from;
        let duration_ms = duration.as_secs_f64() * 1000.0;
        let tick_ms = tick.as_secs_f64() * 1000.0;
        let delta = if duration_ms > 0.0 {
            distance / duration_ms * tick_ms
        } else {
            distance
        };
        let motion = if distance < 0.0 {
            Motion::Decreasing
        } else {
            Motion::Increasing
        };
        Self {
            motion,
            offset: from,
            target,
            delta,
            ticks: 0,
        }
    }

    #[must_use]
    pub const fn motion(&self) -> Motion {
        self.motion
    }

    /// Offset reached so far.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    #[must_use]
    pub const fn target(&self) -> f64 {
        self.target
    }

    /// Per-tick displacement.
    #[must_use]
    pub const fn delta(&self) -> f64 {
        self.delta
    }

    /// Ticks processed so far.
    #[must_use]
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Whether the accumulated offset has reached or passed the target.
    #[must_use]
    pub fn reached(&self) -> bool {
        match self.motion {
            Motion::Decreasing => self.offset <= self.target,
            Motion::Increasing => self.offset >= self.target,
        }
    }

    /// Advance by one tick.
    ///
    /// The arrival check runs before the move, so the tick after the offset
    /// lands on the target reports [`StepOutcome::Arrived`].
    pub fn tick(&mut self) -> StepOutcome {
        self.ticks = self.ticks.saturating_add(1);
        if self.reached() {
            self.offset = self.target;
            StepOutcome::Arrived(self.target)
        } else {
            self.offset += self.delta;
            StepOutcome::Moving(self.offset)
        }
    }
}
