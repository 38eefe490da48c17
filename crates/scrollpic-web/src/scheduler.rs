#![forbid(unsafe_code)]

//! [`Scheduler`] over `setInterval` / `setTimeout`.

use core::time::Duration;
use std::rc::Rc;

use scrollpic_core::scheduler::{Scheduler, TimerHandle, TimerKind};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::dom::host_error;

/// Receives every timer firing.
pub type TimerSink = Rc<dyn Fn(TimerKind)>;

/// Browser timers.
///
/// One closure per [`TimerKind`] is created up front and handed to every
/// `setInterval`/`setTimeout` call for that kind, so closures live exactly as
/// long as the scheduler. Handles encode intervals as positive ids and
/// timeouts as negative ids.
pub struct BrowserScheduler {
    window: Window,
    callbacks: [Closure<dyn FnMut()>; 3],
}

impl core::fmt::Debug for BrowserScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BrowserScheduler").finish_non_exhaustive()
    }
}

fn slot(kind: TimerKind) -> usize {
    match kind {
        TimerKind::AutoAdvance => 0,
        TimerKind::Step => 1,
        TimerKind::WheelSettle => 2,
    }
}

fn delay_ms(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

impl BrowserScheduler {
    pub fn new(window: Window, sink: TimerSink) -> Self {
        let callbacks = TimerKind::ALL.map(|kind| {
            let sink = Rc::clone(&sink);
            Closure::wrap(Box::new(move || sink(kind)) as Box<dyn FnMut()>)
        });
        Self { window, callbacks }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, kind: TimerKind, delay: Duration, repeat: bool) -> Option<TimerHandle> {
        let callback = self.callbacks[slot(kind)].as_ref().unchecked_ref();
        let ms = delay_ms(delay);
        let result = if repeat {
            self.window
                .set_interval_with_callback_and_timeout_and_arguments_0(callback, ms)
                .map(|id| TimerHandle(i64::from(id)))
        } else {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(callback, ms)
                .map(|id| TimerHandle(-i64::from(id)))
        };
        match result {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(%kind, err = %host_error("setTimer", &err), "timer rejected");
                None
            }
        }
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let Ok(id) = i32::try_from(handle.0.unsigned_abs()) else {
            return;
        };
        if handle.0 > 0 {
            self.window.clear_interval_with_handle(id);
        } else {
            self.window.clear_timeout_with_handle(id);
        }
    }
}
