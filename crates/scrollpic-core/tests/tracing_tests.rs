#![forbid(unsafe_code)]

//! Tracing instrumentation tests.
//!
//! A capture layer records every span and event emitted while driving a
//! carousel, so the span names, their fields and their nesting can be checked.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use core::time::Duration;

use scrollpic_core::carousel::Carousel;
use scrollpic_core::config::CarouselConfig;
use scrollpic_core::headless::MemoryDom;
use scrollpic_core::scheduler::VirtualScheduler;
use scrollpic_core::track::Direction;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
    span_name: Option<String>,
}

#[derive(Default)]
struct Captured {
    spans: Vec<CapturedSpan>,
    events: Vec<CapturedEvent>,
}

struct Capture(Arc<Mutex<Captured>>);

struct CaptureHandle(Arc<Mutex<Captured>>);

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.0.lock().unwrap().spans.clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().unwrap().events.clone()
    }

    fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans().into_iter().filter(|s| s.name == name).collect()
    }

    fn event(&self, message: &str) -> Option<CapturedEvent> {
        self.events().into_iter().find(|e| e.message == message)
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());
        self.0.lock().unwrap().spans.push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        let span_name = ctx
            .event_span(event)
            .map(|span_ref| span_ref.name().to_string());
        self.0.lock().unwrap().events.push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
            span_name,
        });
    }
}

fn with_captured<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let store = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(Capture(store.clone()));
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle(store)
}

fn mounted(n: usize, config: CarouselConfig) -> Carousel<MemoryDom, VirtualScheduler> {
    let mut dom = MemoryDom::new();
    let body = dom.element("body");
    let container = dom.append_element(body, "div");
    for _ in 0..n {
        dom.append_element(container, "img");
    }
    let mut c = Carousel::new(config, dom, VirtualScheduler::new(), container).unwrap();
    c.initialize().unwrap();
    c
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn initialize_span_carries_id() {
    let handle = with_captured(|| {
        mounted(3, CarouselConfig::new("hero", 600.0, 300.0));
    });
    let spans = handle.spans_named("scrollpic.initialize");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].fields.get("id").map(String::as_str), Some("hero"));

    let mounted = handle.event("carousel mounted").expect("mount event");
    assert_eq!(mounted.level, tracing::Level::INFO);
    assert_eq!(mounted.span_name.as_deref(), Some("scrollpic.initialize"));
    assert_eq!(mounted.fields.get("slides").map(String::as_str), Some("3"));
    assert_eq!(mounted.fields.get("strip").map(String::as_str), Some("5"));
}

#[test]
fn empty_container_warns() {
    let handle = with_captured(|| {
        let mut dom = MemoryDom::new();
        let container = dom.element("div");
        let mut c = Carousel::new(
            CarouselConfig::new("empty", 10.0, 10.0),
            dom,
            VirtualScheduler::new(),
            container,
        )
        .unwrap();
        assert!(c.initialize().is_err());
    });
    let warning = handle
        .event("refusing to mount an empty carousel")
        .expect("warning event");
    assert_eq!(warning.level, tracing::Level::WARN);
}

#[test]
fn advance_span_records_direction_and_steps() {
    let handle = with_captured(|| {
        let mut c = mounted(4, CarouselConfig::new("c", 100.0, 50.0));
        c.advance(Direction::Left, 2).unwrap();
    });
    let spans = handle.spans_named("scrollpic.advance");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].fields.get("direction").map(String::as_str), Some("left"));
    assert_eq!(spans[0].fields.get("steps").map(String::as_str), Some("2"));

    let planned = handle.event("transition planned").expect("plan event");
    assert_eq!(planned.span_name.as_deref(), Some("scrollpic.advance"));
    assert_eq!(planned.fields.get("start").map(String::as_str), Some("3"));
    assert_eq!(planned.fields.get("masked").map(String::as_str), Some("false"));
}

#[test]
fn auto_advance_nests_under_timer_span() {
    let handle = with_captured(|| {
        let mut c = mounted(2, CarouselConfig::new("c", 100.0, 50.0));
        c.advance_time(Duration::from_millis(3000));
    });
    let timer_spans = handle.spans_named("scrollpic.timer");
    assert!(
        timer_spans
            .iter()
            .any(|s| s.fields.get("kind").map(String::as_str) == Some("auto_advance"))
    );
    let advance = handle.spans_named("scrollpic.advance");
    assert_eq!(advance.len(), 1);
    assert_eq!(advance[0].parent_name.as_deref(), Some("scrollpic.timer"));
}

#[test]
fn wrap_snap_is_traced() {
    let handle = with_captured(|| {
        let mut c = mounted(1, CarouselConfig::new("c", 100.0, 50.0));
        c.advance(Direction::Right, 1).unwrap();
    });
    let planned = handle.event("transition planned").expect("plan event");
    assert_eq!(planned.fields.get("masked").map(String::as_str), Some("true"));
    assert!(handle.event("wrap mask snap").is_some());
}

#[test]
fn stale_timers_are_ignored_quietly() {
    let handle = with_captured(|| {
        let mut c = mounted(2, CarouselConfig::new("c", 100.0, 50.0));
        c.destroy();
        c.on_timer(scrollpic_core::TimerKind::Step);
    });
    let stale = handle.event("ignoring stale timer").expect("stale event");
    assert_eq!(stale.level, tracing::Level::TRACE);
    assert!(handle.spans_named("scrollpic.timer").is_empty());
}

#[test]
fn reselecting_current_index_logs_position() {
    let handle = with_captured(|| {
        let mut c = mounted(3, CarouselConfig::new("c", 100.0, 50.0));
        c.click_index(1).unwrap();
        assert!(!c.is_animating());
    });
    let event = handle.event("index already selected").expect("no-op event");
    assert_eq!(event.level, tracing::Level::DEBUG);
    assert_eq!(event.fields.get("position").map(String::as_str), Some("1"));
}

#[test]
fn failed_mount_warns_and_restores() {
    let handle = with_captured(|| {
        let mut dom = MemoryDom::new();
        let body = dom.element("body");
        let container = dom.append_element(body, "div");
        dom.append_element(container, "img");
        dom.fail_on("clearChildren");
        let mut c = Carousel::new(
            CarouselConfig::new("c", 100.0, 50.0),
            dom,
            VirtualScheduler::new(),
            container,
        )
        .unwrap();
        assert!(c.initialize().is_err());
    });
    let warning = handle
        .event("mount failed, restoring original slides")
        .expect("rollback warning");
    assert_eq!(warning.level, tracing::Level::WARN);
    assert_eq!(warning.span_name.as_deref(), Some("scrollpic.initialize"));
}
