#![forbid(unsafe_code)]

//! DOM adapter seam.
//!
//! The controller touches the page only through [`Dom`]. Environment quirks
//! (legacy style APIs, event models) stay inside implementations; the
//! controller sees a uniform, fallible element API.

use core::fmt;

use crate::error::HostError;

/// Element-level operations the carousel needs from its host document.
pub trait Dom {
    /// Handle to an element. Cloning the handle must not clone the element.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Element children of `parent` in document order; text and comment nodes
    /// are skipped.
    fn element_children(&self, parent: &Self::Node) -> Vec<Self::Node>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, HostError>;

    /// Detached deep copy of `node`, including inline styles and attributes.
    fn deep_clone(&mut self, node: &Self::Node) -> Result<Self::Node, HostError>;

    /// Append `child` as the last child of `parent`, moving it if attached.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    /// Remove every child node of `parent`.
    fn clear_children(&mut self, parent: &Self::Node) -> Result<(), HostError>;

    /// Set one inline style property (kebab-case name).
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str)
    -> Result<(), HostError>;

    /// Computed value of a style property, if the host can resolve it.
    fn computed_style(&self, node: &Self::Node, property: &str) -> Option<String>;

    fn set_class_name(&mut self, node: &Self::Node, class: &str);

    fn set_attribute(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &str,
    ) -> Result<(), HostError>;

    /// Replace the node's content with a single text node.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Rendered height in pixels; `0` for detached or unrendered nodes.
    fn offset_height(&self, node: &Self::Node) -> f64;
}

/// Set several inline styles, stopping at the first failure.
///
/// Returns how many properties were applied.
pub fn apply_styles<D: Dom + ?Sized>(
    dom: &mut D,
    node: &D::Node,
    styles: &[(&str, String)],
) -> Result<usize, HostError> {
    for (property, value) in styles {
        dom.set_style(node, property, value)?;
    }
    Ok(styles.len())
}

/// Format a pixel length for inline styles.
#[must_use]
pub fn px(value: f64) -> String {
    if value == 0.0 {
        // avoids "-0px"
        "0px".to_string()
    } else {
        format!("{value}px")
    }
}

/// Whether a computed `position` value establishes a positioning context for
/// the strip.
#[must_use]
pub fn is_positioned(position: Option<&str>) -> bool {
    matches!(position.map(str::trim), Some("relative" | "absolute"))
}
