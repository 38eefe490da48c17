#![forbid(unsafe_code)]

//! Numeric index indicators.

use crate::track::Direction;

/// Class carried by every indicator element.
pub const INDEX_CLASS: &str = "plugin-scroll-index";
/// Class appended to the selected indicator.
pub const SELECTED_CLASS: &str = "plugin-scroll-tag-sel";
/// Class of the element wrapping all indicators.
pub const INDEX_WRAP_CLASS: &str = "plugin-scroll-index-wrap";
/// Attribute holding an indicator's 1-based position.
pub const DATA_INDEX_ATTR: &str = "data-index";
/// Marker attribute distinguishing indicators from the wrapper in click targets.
pub const INDEX_TAG_ATTR: &str = "index-tag";

/// One indicator per real slide, exactly one selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSet {
    count: usize,
    selected: usize,
}

impl IndicatorSet {
    /// `count` indicators with the first one selected.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self { count, selected: 0 }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// 1-based position of the selected indicator.
    #[must_use]
    pub const fn selected_position(&self) -> usize {
        self.selected + 1
    }

    /// 0-based slot of the selected indicator.
    #[must_use]
    pub const fn selected_slot(&self) -> usize {
        self.selected
    }

    /// Select the indicator matching strip slot `start` (`0` maps to the last).
    ///
    /// Returns the 0-based slot that became selected.
    pub fn select_start(&mut self, start: usize) -> usize {
        let position = if start == 0 { self.count } else { start };
        self.selected = position.clamp(1, self.count.max(1)) - 1;
        self.selected
    }

    #[must_use]
    pub fn is_selected(&self, slot: usize) -> bool {
        slot == self.selected
    }

    /// Class attribute for the indicator at 0-based `slot`.
    #[must_use]
    pub fn class_for(&self, slot: usize) -> String {
        indicator_class(self.is_selected(slot))
    }

    /// Direction and distance from the selected indicator to 1-based `target`.
    ///
    /// `None` when `target` is already selected.
    #[must_use]
    pub fn route_to(&self, target: usize) -> Option<(Direction, usize)> {
        let current = self.selected_position();
        match target.cmp(&current) {
            core::cmp::Ordering::Greater => Some((Direction::Right, target - current)),
            core::cmp::Ordering::Less => Some((Direction::Left, current - target)),
            core::cmp::Ordering::Equal => None,
        }
    }
}

/// Class attribute for an indicator element.
#[must_use]
pub fn indicator_class(selected: bool) -> String {
    if selected {
        format!("{INDEX_CLASS} {SELECTED_CLASS}")
    } else {
        INDEX_CLASS.to_string()
    }
}

/// Whether a class attribute carries the selected marker.
#[must_use]
pub fn has_selected_class(class: &str) -> bool {
    class.split_ascii_whitespace().any(|c| c == SELECTED_CLASS)
}
