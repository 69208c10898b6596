#![forbid(unsafe_code)]

//! [`PageView`] over the live browser document.
//!
//! DOM elements are interned into a registry so the controller can hold
//! plain [`ElementId`] handles. Handles are stable for the lifetime of the
//! view; the page never removes elements, so the registry only grows.

use std::cell::RefCell;

use folio_core::{ElementId, PageView, StyleProperty};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

pub struct DomView {
    window: Window,
    document: Document,
    registry: RefCell<Vec<Element>>,
}

impl DomView {
    /// Bind to the global window and document.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self {
            window,
            document,
            registry: RefCell::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Handle for `el`, registering it on first sight.
    pub fn intern(&self, el: Element) -> ElementId {
        let mut registry = self.registry.borrow_mut();
        if let Some(idx) = registry.iter().position(|known| *known == el) {
            return ElementId::new(idx as u32);
        }
        registry.push(el);
        ElementId::new((registry.len() - 1) as u32)
    }

    /// DOM element behind a handle.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.registry.borrow().get(id.get() as usize).cloned()
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }
}

impl PageView for DomView {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                warn!(selector, ?err, "invalid selector");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.intern(el))
            .collect()
    }

    fn by_id(&self, id: &str) -> Option<ElementId> {
        self.document
            .get_element_by_id(id)
            .map(|el| self.intern(el))
    }

    fn closest(&self, el: ElementId, selector: &str) -> Option<ElementId> {
        let found = self.element(el)?.closest(selector).ok().flatten()?;
        Some(self.intern(found))
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el)?.get_attribute(name)
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.element(el)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(el) = self.element(el) {
            if let Err(err) = el.class_list().add_1(class) {
                warn!(class, ?err, "classList.add failed");
            }
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(el) = self.element(el) {
            if let Err(err) = el.class_list().remove_1(class) {
                warn!(class, ?err, "classList.remove failed");
            }
        }
    }

    fn text(&self, el: ElementId) -> String {
        self.element(el)
            .and_then(|el| el.text_content())
            .unwrap_or_default()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(el) = self.element(el) {
            el.set_text_content(Some(text));
        }
    }

    fn set_style(&mut self, el: ElementId, property: StyleProperty, value: &str) {
        if let Some(el) = self.html(el) {
            if let Err(err) = el.style().set_property(property.css_name(), value) {
                warn!(property = property.css_name(), ?err, "style write failed");
            }
        }
    }

    fn clear_style(&mut self, el: ElementId, property: StyleProperty) {
        if let Some(el) = self.html(el) {
            if let Err(err) = el.style().remove_property(property.css_name()) {
                warn!(property = property.css_name(), ?err, "style removal failed");
            }
        }
    }

    fn element_top(&self, el: ElementId) -> f64 {
        self.element(el)
            .map_or(f64::INFINITY, |el| el.get_bounding_client_rect().top())
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_into_view(&mut self, el: ElementId) {
        if let Some(el) = self.element(el) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            el.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn console_log(&mut self, message: &str) {
        web_sys::console::log_1(&JsValue::from_str(message));
    }
}
