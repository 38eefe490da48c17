#![forbid(unsafe_code)]

//! [`Dom`] over the live document.

use scrollpic_core::dom::Dom;
use scrollpic_core::error::HostError;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, Window};

/// The page the carousel lives in.
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn new(window: Window) -> Result<Self, HostError> {
        let document = window
            .document()
            .ok_or_else(|| HostError::new("document", "window has no document"))?;
        Ok(Self { window, document })
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Look up an HTML element by id.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }
}

/// Turn a thrown JS value into a [`HostError`].
pub(crate) fn host_error(op: &'static str, value: &JsValue) -> HostError {
    let detail = value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    HostError::new(op, detail)
}

fn as_html(op: &'static str, node: web_sys::Node) -> Result<HtmlElement, HostError> {
    node.dyn_into::<HtmlElement>()
        .map_err(|_| HostError::new(op, "result is not an HTML element"))
}

impl Dom for WebDom {
    type Node = HtmlElement;

    fn element_children(&self, parent: &HtmlElement) -> Vec<HtmlElement> {
        let children = parent.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter_map(|el| match el.dyn_into::<HtmlElement>() {
                Ok(html) => Some(html),
                Err(other) => {
                    debug!(tag = %other.tag_name(), "skipping non-HTML child");
                    None
                }
            })
            .collect()
    }

    fn create_element(&mut self, tag: &str) -> Result<HtmlElement, HostError> {
        let element = self
            .document
            .create_element(tag)
            .map_err(|e| host_error("createElement", &e))?;
        as_html("createElement", element.into())
    }

    fn deep_clone(&mut self, node: &HtmlElement) -> Result<HtmlElement, HostError> {
        let copy = node
            .clone_node_with_deep(true)
            .map_err(|e| host_error("cloneNode", &e))?;
        as_html("cloneNode", copy)
    }

    fn append_child(&mut self, parent: &HtmlElement, child: &HtmlElement) -> Result<(), HostError> {
        parent
            .append_child(child)
            .map(drop)
            .map_err(|e| host_error("appendChild", &e))
    }

    fn clear_children(&mut self, parent: &HtmlElement) -> Result<(), HostError> {
        parent.set_inner_html("");
        Ok(())
    }

    fn set_style(
        &mut self,
        node: &HtmlElement,
        property: &str,
        value: &str,
    ) -> Result<(), HostError> {
        node.style()
            .set_property(property, value)
            .map_err(|e| host_error("setStyle", &e))
    }

    fn computed_style(&self, node: &HtmlElement, property: &str) -> Option<String> {
        let style = self.window.get_computed_style(node).ok().flatten()?;
        style
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_class_name(&mut self, node: &HtmlElement, class: &str) {
        node.set_class_name(class);
    }

    fn set_attribute(
        &mut self,
        node: &HtmlElement,
        name: &str,
        value: &str,
    ) -> Result<(), HostError> {
        node.set_attribute(name, value)
            .map_err(|e| host_error("setAttribute", &e))
    }

    fn set_text(&mut self, node: &HtmlElement, text: &str) {
        node.set_text_content(Some(text));
    }

    fn offset_height(&self, node: &HtmlElement) -> f64 {
        f64::from(node.offset_height())
    }
}
