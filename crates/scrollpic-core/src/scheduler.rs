#![forbid(unsafe_code)]

//! Timer scheduling seam.
//!
//! The controller never holds callbacks. It asks a [`Scheduler`] to fire a
//! [`TimerKind`] later and receives the firing through
//! [`Carousel::on_timer`](crate::carousel::Carousel::on_timer). The browser
//! adapter maps this onto `setInterval`/`setTimeout`; [`VirtualScheduler`] keeps
//! a host-advanced clock for deterministic runs.

use core::fmt;
use core::time::Duration;

/// The three timer roles a carousel uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Recurring auto-advance driver.
    AutoAdvance,
    /// Recurring animation stepper tick.
    Step,
    /// One-shot wheel debounce.
    WheelSettle,
}

impl TimerKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 3] = [Self::AutoAdvance, Self::Step, Self::WheelSettle];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoAdvance => "auto_advance",
            Self::Step => "step",
            Self::WheelSettle => "wheel_settle",
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque id of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub i64);

/// Host timer primitives.
pub trait Scheduler {
    /// Fire `kind` after `delay`, and every `delay` thereafter if `repeat`.
    ///
    /// Returns `None` when the host could not create the timer.
    fn schedule(&mut self, kind: TimerKind, delay: Duration, repeat: bool) -> Option<TimerHandle>;

    /// Cancel a timer. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Smallest period the virtual scheduler accepts for a recurring timer.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    kind: TimerKind,
    due: Duration,
    period: Option<Duration>,
}

/// Deterministic scheduler driven by an explicit clock.
///
/// Timers fire in `(due, schedule order)` order. The clock only moves when
/// [`pop_due`](Self::pop_due) hands out a timer or [`settle`](Self::settle) is
/// called.
#[derive(Debug, Default, Clone)]
pub struct VirtualScheduler {
    now: Duration,
    next_id: i64,
    pending: Vec<PendingTimer>,
}

impl VirtualScheduler {
    /// Scheduler with its clock at zero and nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of live timers.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether any timer of `kind` is live.
    #[must_use]
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    /// Due time of the earliest live timer of `kind`.
    #[must_use]
    pub fn next_due(&self, kind: TimerKind) -> Option<Duration> {
        self.pending
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.due)
            .min()
    }

    /// Hand out the earliest timer due at or before `until`.
    ///
    /// Moves the clock to its due time, re-arms recurring timers and drops
    /// one-shots.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, TimerKind)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.handle))
            .map(|(idx, _)| idx)?;

        let PendingTimer {
            handle,
            kind,
            due,
            period,
        } = self.pending[idx];
        self.now = self.now.max(due);
        match period {
            Some(period) => self.pending[idx].due = due.saturating_add(period),
            None => {
                self.pending.swap_remove(idx);
            }
        }
        Some((handle, kind))
    }

    /// Move the clock forward to `until` once nothing else is due.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&mut self, kind: TimerKind, delay: Duration, repeat: bool) -> Option<TimerHandle> {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let delay = if repeat { delay.max(MIN_PERIOD) } else { delay };
        self.pending.push(PendingTimer {
            handle,
            kind,
            due: self.now.saturating_add(delay),
            period: repeat.then_some(delay),
        });
        Some(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|t| t.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_in_due_order() {
        let mut s = VirtualScheduler::new();
        let a = s.schedule(TimerKind::AutoAdvance, ms(30), false).unwrap();
        let b = s.schedule(TimerKind::Step, ms(10), false).unwrap();
        assert_eq!(s.pop_due(ms(100)), Some((b, TimerKind::Step)));
        assert_eq!(s.now(), ms(10));
        assert_eq!(s.pop_due(ms(100)), Some((a, TimerKind::AutoAdvance)));
        assert_eq!(s.pop_due(ms(100)), None);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn ties_break_by_schedule_order() {
        let mut s = VirtualScheduler::new();
        let first = s.schedule(TimerKind::WheelSettle, ms(5), false).unwrap();
        let _second = s.schedule(TimerKind::Step, ms(5), false).unwrap();
        assert_eq!(s.pop_due(ms(5)).map(|(h, _)| h), Some(first));
    }

    #[test]
    fn recurring_timers_rearm() {
        let mut s = VirtualScheduler::new();
        s.schedule(TimerKind::Step, ms(5), true);
        let mut fired = 0;
        while s.pop_due(ms(20)).is_some() {
            fired += 1;
        }
        assert_eq!(fired, 4);
        assert_eq!(s.next_due(TimerKind::Step), Some(ms(25)));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut s = VirtualScheduler::new();
        let h = s.schedule(TimerKind::AutoAdvance, ms(5), true).unwrap();
        s.cancel(h);
        s.cancel(h);
        assert!(!s.is_pending(TimerKind::AutoAdvance));
        assert_eq!(s.pop_due(ms(100)), None);
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut s = VirtualScheduler::new();
        s.schedule(TimerKind::Step, Duration::ZERO, true);
        assert_eq!(s.next_due(TimerKind::Step), Some(ms(1)));
    }

    #[test]
    fn settle_never_rewinds() {
        let mut s = VirtualScheduler::new();
        s.settle(ms(50));
        s.settle(ms(10));
        assert_eq!(s.now(), ms(50));
    }
}
