//! Property-based invariant tests for the carousel controller.
//!
//! For any slide count and any interleaving of input and elapsed time:
//!
//! 1. The strip holds `N + 2` slots whose ends clone the last and first slide.
//! 2. Once the animation settles, the offset is `-start * width`.
//! 3. Exactly one indicator is selected and it matches the displayed slide.
//! 4. The offset never leaves the strip by more than one slide.
//! 5. Replaying the same input gives the same trace.

use core::time::Duration;

use proptest::prelude::*;
use scrollpic_core::carousel::Carousel;
use scrollpic_core::config::CarouselConfig;
use scrollpic_core::headless::MemoryDom;
use scrollpic_core::indicator::has_selected_class;
use scrollpic_core::scheduler::VirtualScheduler;
use scrollpic_core::track::Direction;

const WIDTH: f64 = 120.0;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Input {
    Arrow(Direction),
    Advance(Direction, usize),
    Index(usize),
    Wheel(f64),
    Enter,
    Leave,
    Wait(u64),
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Left), Just(Direction::Right)]
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        direction().prop_map(Input::Arrow),
        (direction(), 0usize..12).prop_map(|(d, s)| Input::Advance(d, s)),
        (1usize..=10).prop_map(Input::Index),
        prop_oneof![Just(-120.0), Just(-1.0), Just(1.0), Just(120.0)].prop_map(Input::Wheel),
        Just(Input::Enter),
        Just(Input::Leave),
        (0u64..4000).prop_map(Input::Wait),
    ]
}

fn mount(n: usize) -> Carousel<MemoryDom, VirtualScheduler> {
    let mut dom = MemoryDom::new();
    let body = dom.element("body");
    let container = dom.append_element(body, "ul");
    for i in 0..n {
        let li = dom.append_element(container, "li");
        dom.append_text(li, &i.to_string());
    }
    let config = CarouselConfig::new("prop", WIDTH, 80.0).with_wheelable(true);
    let mut c = Carousel::new(config, dom, VirtualScheduler::new(), container).unwrap();
    c.initialize().unwrap();
    c
}

fn apply(c: &mut Carousel<MemoryDom, VirtualScheduler>, input: &Input) {
    let n = c.slide_count().unwrap();
    match *input {
        Input::Arrow(d) => c.click_arrow(d).unwrap(),
        Input::Advance(d, s) => c.advance(d, s).unwrap(),
        Input::Index(d) => {
            let result = c.click_index(d);
            assert_eq!(result.is_ok(), d <= n);
        }
        Input::Wheel(delta) => c.wheel(delta).unwrap(),
        Input::Enter => c.pointer_enter().unwrap(),
        Input::Leave => c.pointer_leave().unwrap(),
        Input::Wait(ms) => {
            c.advance_time(Duration::from_millis(ms));
        }
    }
}

fn selected(c: &Carousel<MemoryDom, VirtualScheduler>) -> Vec<usize> {
    c.indicators()
        .iter()
        .enumerate()
        .filter(|(_, node)| has_selected_class(c.dom().class_name(**node)))
        .map(|(slot, _)| slot)
        .collect()
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn strip_has_phantom_ends(n in 1usize..=8) {
        let c = mount(n);
        let strip = c.strip();
        prop_assert_eq!(strip.len(), n + 2);
        let dom = c.dom();
        prop_assert_eq!(dom.text_content(strip[0]), (n - 1).to_string());
        prop_assert_eq!(dom.text_content(strip[n + 1]), "0".to_string());
    }

    #[test]
    fn settled_offset_matches_start(
        n in 1usize..=8,
        inputs in prop::collection::vec(input(), 0..40),
    ) {
        let mut c = mount(n);
        for input in &inputs {
            apply(&mut c, input);
            let offset = c.offset().unwrap();
            prop_assert!(
                offset <= WIDTH && offset >= -((n + 1) as f64) * WIDTH,
                "offset {} left the strip (n = {})", offset, n
            );
        }
        c.run_until_idle();
        prop_assert!(!c.is_animating());
        let start = c.start().unwrap();
        prop_assert!(start <= n);
        prop_assert_eq!(c.offset().unwrap(), -(start as f64) * WIDTH);
    }

    #[test]
    fn exactly_one_indicator_selected(
        n in 1usize..=8,
        inputs in prop::collection::vec(input(), 0..40),
    ) {
        let mut c = mount(n);
        for input in &inputs {
            apply(&mut c, input);
            let marked = selected(&c);
            prop_assert_eq!(marked.len(), 1);
            prop_assert_eq!(marked[0] + 1, c.displayed_index().unwrap());
            prop_assert_eq!(c.selected_indicator(), Some(marked[0]));
        }
    }

    #[test]
    fn replay_is_deterministic(
        n in 1usize..=6,
        inputs in prop::collection::vec(input(), 0..30),
    ) {
        let mut a = mount(n);
        let mut b = mount(n);
        for input in &inputs {
            apply(&mut a, input);
            apply(&mut b, input);
            prop_assert_eq!(a.start(), b.start());
            prop_assert_eq!(a.offset(), b.offset());
            prop_assert_eq!(a.scheduler().now(), b.scheduler().now());
        }
    }

    #[test]
    fn destroy_leaves_nothing_pending(
        n in 1usize..=6,
        inputs in prop::collection::vec(input(), 0..20),
    ) {
        let mut c = mount(n);
        for input in &inputs {
            apply(&mut c, input);
        }
        c.destroy();
        prop_assert_eq!(c.scheduler().pending_count(), 0);
        prop_assert_eq!(c.advance_time(Duration::from_secs(60)), 0);
    }
}
