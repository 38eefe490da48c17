#![forbid(unsafe_code)]

//! In-memory DOM for headless runs and tests.
//!
//! [`MemoryDom`] is an arena of element, text and comment nodes. It models
//! just enough of the browser for the carousel: inline styles, a per-node
//! "stylesheet" layer consulted by [`Dom::computed_style`], classes,
//! attributes, and a configurable layout height per class.

use std::collections::BTreeMap;

use crate::dom::Dom;
use crate::error::HostError;

/// Handle into a [`MemoryDom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element(String),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    inline: BTreeMap<String, String>,
    sheet: BTreeMap<String, String>,
    class: String,
    attributes: BTreeMap<String, String>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            inline: BTreeMap::new(),
            sheet: BTreeMap::new(),
            class: String::new(),
            attributes: BTreeMap::new(),
        }
    }
}

/// Arena-backed document.
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    class_heights: BTreeMap<String, f64>,
    fail_on: Option<&'static str>,
    /// Successful calls to let through before `fail_on` fires, and whether
    /// the failure clears itself after firing once.
    fail_skip: usize,
    fail_once: bool,
}

impl MemoryDom {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `height` as the layout height of attached elements carrying
    /// `class`.
    #[must_use]
    pub fn with_class_height(mut self, class: &str, height: f64) -> Self {
        self.class_heights.insert(class.to_string(), height);
        self
    }

    /// Make the named adapter operation fail from now on.
    pub fn fail_on(&mut self, op: &'static str) {
        self.fail_on = Some(op);
        self.fail_skip = 0;
        self.fail_once = false;
    }

    /// Make only the `nth` (1-based) upcoming call of `op` fail.
    pub fn fail_nth(&mut self, op: &'static str, nth: usize) {
        self.fail_on = Some(op);
        self.fail_skip = nth.saturating_sub(1);
        self.fail_once = true;
    }

    /// Stop injecting failures.
    pub fn clear_failure(&mut self) {
        self.fail_on = None;
    }

    /// Create a detached element with the given tag.
    pub fn element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(tag.to_ascii_lowercase()))
    }

    /// Append a new `<tag>` element to `parent` and return it.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.element(tag);
        self.attach(parent, id);
        id
    }

    /// Append a text node to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.push(NodeKind::Text(text.to_string()));
        self.attach(parent, id);
        id
    }

    /// Append a comment node to `parent`.
    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.push(NodeKind::Comment(text.to_string()));
        self.attach(parent, id);
        id
    }

    /// Set a style that applies through the stylesheet rather than inline.
    pub fn set_sheet_style(&mut self, node: NodeId, property: &str, value: &str) {
        self.nodes[node.0]
            .sheet
            .insert(property.to_string(), value.to_string());
    }

    /// All child nodes, including text and comments.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Tag name of an element, `None` for text and comments.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(tag) => Some(tag.as_str()),
            NodeKind::Text(_) | NodeKind::Comment(_) => None,
        }
    }

    /// Inline style value.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].inline.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn class_name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].class
    }

    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    /// Concatenated text of the node and its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Comment(_) => {}
            NodeKind::Element(_) => {
                for &child in &self.nodes[node.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn copy_subtree(&mut self, node: NodeId) -> NodeId {
        let mut data = self.nodes[node.0].clone();
        let children = std::mem::take(&mut data.children);
        data.parent = None;
        self.nodes.push(data);
        let id = NodeId(self.nodes.len() - 1);
        for child in children {
            let copy = self.copy_subtree(child);
            self.attach(id, copy);
        }
        id
    }

    fn check(&mut self, op: &'static str) -> Result<(), HostError> {
        if self.fail_on != Some(op) {
            return Ok(());
        }
        if self.fail_skip > 0 {
            self.fail_skip -= 1;
            return Ok(());
        }
        if self.fail_once {
            self.fail_on = None;
        }
        Err(HostError::new(op, "injected failure"))
    }

    fn is_attached_element(&self, node: NodeId) -> bool {
        let data = &self.nodes[node.0];
        matches!(data.kind, NodeKind::Element(_)) && data.parent.is_some()
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn element_children(&self, parent: &NodeId) -> Vec<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .filter(|c| matches!(self.nodes[c.0].kind, NodeKind::Element(_)))
            .collect()
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError> {
        self.check("createElement")?;
        Ok(self.element(tag))
    }

    fn deep_clone(&mut self, node: &NodeId) -> Result<NodeId, HostError> {
        self.check("cloneNode")?;
        Ok(self.copy_subtree(*node))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        self.check("appendChild")?;
        self.attach(*parent, *child);
        Ok(())
    }

    fn clear_children(&mut self, parent: &NodeId) -> Result<(), HostError> {
        self.check("clearChildren")?;
        for child in std::mem::take(&mut self.nodes[parent.0].children) {
            self.nodes[child.0].parent = None;
        }
        Ok(())
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) -> Result<(), HostError> {
        self.check("setStyle")?;
        self.nodes[node.0]
            .inline
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn computed_style(&self, node: &NodeId, property: &str) -> Option<String> {
        let data = &self.nodes[node.0];
        data.inline
            .get(property)
            .or_else(|| data.sheet.get(property))
            .cloned()
            .or_else(|| match property {
                "position" => Some("static".to_string()),
                _ => None,
            })
    }

    fn set_class_name(&mut self, node: &NodeId, class: &str) {
        self.nodes[node.0].class = class.to_string();
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.check("setAttribute")?;
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        let id = self.push(NodeKind::Text(text.to_string()));
        self.attach(*node, id);
    }

    fn offset_height(&self, node: &NodeId) -> f64 {
        if !self.is_attached_element(*node) {
            return 0.0;
        }
        let class = &self.nodes[node.0].class;
        class
            .split_ascii_whitespace()
            .find_map(|c| self.class_heights.get(c).copied())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_children_skip_text_and_comments() {
        let mut dom = MemoryDom::new();
        let root = dom.element("div");
        dom.append_text(root, "\n  ");
        let a = dom.append_element(root, "img");
        dom.append_comment(root, "note");
        let b = dom.append_element(root, "P");
        assert_eq!(dom.element_children(&root), vec![a, b]);
        assert_eq!(dom.children(root).len(), 4);
        assert_eq!(dom.tag(b), Some("p"));
    }

    #[test]
    fn deep_clone_copies_subtree_detached() {
        let mut dom = MemoryDom::new();
        let root = dom.element("div");
        let slide = dom.append_element(root, "div");
        dom.append_text(slide, "slide one");
        dom.set_style(&slide, "color", "red").unwrap();

        let copy = dom.deep_clone(&slide).unwrap();
        assert_ne!(copy, slide);
        assert_eq!(dom.parent(copy), None);
        assert_eq!(dom.text_content(copy), "slide one");
        assert_eq!(dom.style(copy, "color"), Some("red"));
        assert_eq!(dom.children(root), &[slide]);
    }

    #[test]
    fn append_moves_attached_child() {
        let mut dom = MemoryDom::new();
        let a = dom.element("div");
        let b = dom.element("div");
        let child = dom.append_element(a, "span");
        dom.append_child(&b, &child).unwrap();
        assert!(dom.children(a).is_empty());
        assert_eq!(dom.parent(child), Some(b));
    }

    #[test]
    fn computed_style_layers() {
        let mut dom = MemoryDom::new();
        let node = dom.element("div");
        assert_eq!(dom.computed_style(&node, "position").as_deref(), Some("static"));
        dom.set_sheet_style(node, "position", "absolute");
        assert_eq!(dom.computed_style(&node, "position").as_deref(), Some("absolute"));
        dom.set_style(&node, "position", "fixed").unwrap();
        assert_eq!(dom.computed_style(&node, "position").as_deref(), Some("fixed"));
    }

    #[test]
    fn offset_height_needs_attachment() {
        let mut dom = MemoryDom::new().with_class_height("arrow", 40.0);
        let root = dom.element("div");
        let span = dom.element("span");
        dom.set_class_name(&span, "arrow left");
        assert_eq!(dom.offset_height(&span), 0.0);
        dom.append_child(&root, &span).unwrap();
        assert_eq!(dom.offset_height(&span), 40.0);
    }

    #[test]
    fn injected_failures() {
        let mut dom = MemoryDom::new();
        dom.fail_on("createElement");
        let err = dom.create_element("div").unwrap_err();
        assert_eq!(err.op(), "createElement");
        assert!(dom.create_element("div").is_err());
        dom.clear_failure();
        assert!(dom.create_element("div").is_ok());
    }

    #[test]
    fn nth_failure_fires_once() {
        let mut dom = MemoryDom::new();
        let root = dom.element("div");
        let a = dom.element("a");
        dom.fail_nth("appendChild", 2);
        assert!(dom.append_child(&root, &a).is_ok());
        assert_eq!(dom.append_child(&root, &a).unwrap_err().op(), "appendChild");
        assert!(dom.append_child(&root, &a).is_ok());
        assert_eq!(dom.children(root), &[a]);
    }
}
