#![forbid(unsafe_code)]

//! Decoding of DOM events into controller input.

use scrollpic_core::track::Direction;

/// DOM event types the widget listens for.
pub const CLICK: &str = "click";
pub const MOUSE_ENTER: &str = "mouseenter";
pub const MOUSE_LEAVE: &str = "mouseleave";
pub const WHEEL: &str = "wheel";

/// Controller input derived from one DOM event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Arrow(Direction),
    Index(usize),
    Wheel(f64),
    Enter,
    Leave,
}

/// Resolve a click inside the index wrap from the target's `index-tag` and
/// `data-index` attributes.
///
/// Clicks on anything that is not an indicator yield `None`.
#[must_use]
pub fn index_click(index_tag: Option<&str>, data_index: Option<&str>) -> Option<Input> {
    if index_tag.is_none_or(str::is_empty) {
        return None;
    }
    let display = data_index?.trim().parse::<usize>().ok()?;
    (display > 0).then_some(Input::Index(display))
}

/// Wheel input from a `wheel` event.
///
/// `delta_y` is positive when scrolling down, which moves the strip right.
/// Events with no vertical component are ignored.
#[must_use]
pub fn wheel(delta_y: f64) -> Option<Input> {
    (delta_y.is_finite() && delta_y != 0.0).then_some(Input::Wheel(delta_y))
}

/// Hover input for an enter/leave event type.
#[must_use]
pub fn hover(event_type: &str) -> Option<Input> {
    match event_type {
        MOUSE_ENTER => Some(Input::Enter),
        MOUSE_LEAVE => Some(Input::Leave),
        _ => None,
    }
}
