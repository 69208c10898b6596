#![forbid(unsafe_code)]

//! In-memory [`PageView`] for native hosts and tests.
//!
//! [`MemoryPage`] is a flat arena of [`MemoryElement`]s with parent links.
//! Selector support covers what page configs use in practice: selector
//! groups (`a, b`) of compound selectors made of an optional tag, `.class`,
//! `#id`, and `[attr]`, `[attr="v"]`, `[attr^="v"]` parts. Combinators
//! (descendant, child, sibling) are not supported and never match.

use std::collections::{BTreeMap, BTreeSet};

use crate::view::{ElementId, PageView, StyleProperty};

const SIMPLE_SELECTOR_STARTS: &[char] = &['.', '#', '['];

/// One element of a [`MemoryPage`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryElement {
    pub tag: String,
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub styles: BTreeMap<StyleProperty, String>,
    pub parent: Option<ElementId>,
    /// Top edge relative to the viewport, in pixels.
    pub top: f64,
}

impl MemoryElement {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_owned());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    #[must_use]
    pub fn top(mut self, top: f64) -> Self {
        self.top = top;
        self
    }

    /// Whether this element matches a selector group.
    #[must_use]
    pub fn matches(&self, selector: &str) -> bool {
        selector
            .split(',')
            .any(|compound| self.matches_compound(compound.trim()))
    }

    fn matches_compound(&self, selector: &str) -> bool {
        if selector.is_empty() || selector.contains(char::is_whitespace) {
            return false;
        }
        let tag_end = selector.find(SIMPLE_SELECTOR_STARTS).unwrap_or(selector.len());
        let tag = &selector[..tag_end];
        if !tag.is_empty() && tag != "*" && !tag.eq_ignore_ascii_case(&self.tag) {
            return false;
        }

        let mut rest = &selector[tag_end..];
        while let Some(first) = rest.chars().next() {
            match first {
                '.' | '#' => {
                    let body = &rest[1..];
                    let end = body.find(SIMPLE_SELECTOR_STARTS).unwrap_or(body.len());
                    let name = &body[..end];
                    let ok = if first == '.' {
                        self.classes.contains(name)
                    } else {
                        self.id.as_deref() == Some(name)
                    };
                    if name.is_empty() || !ok {
                        return false;
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let Some(close) = rest.find(']') else {
                        return false;
                    };
                    if !self.matches_attribute(&rest[1..close]) {
                        return false;
                    }
                    rest = &rest[close + 1..];
                }
                _ => return false,
            }
        }
        true
    }

    fn matches_attribute(&self, inner: &str) -> bool {
        let unquote = |v: &str| v.trim().trim_matches(|c: char| c == '"' || c == '\'').to_owned();
        if let Some((name, value)) = inner.split_once("^=") {
            self.attributes
                .get(name.trim())
                .is_some_and(|actual| actual.starts_with(&unquote(value)))
        } else if let Some((name, value)) = inner.split_once('=') {
            self.attributes
                .get(name.trim())
                .is_some_and(|actual| *actual == unquote(value))
        } else {
            self.attributes.contains_key(inner.trim())
        }
    }
}

/// In-memory page document.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    elements: Vec<MemoryElement>,
    viewport_height: f64,
    scrolled_to: Vec<ElementId>,
    console: Vec<String>,
}

impl MemoryPage {
    #[must_use]
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    /// Append a top-level element.
    pub fn push(&mut self, element: MemoryElement) -> ElementId {
        let id = ElementId::new(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    /// Append an element nested under `parent`.
    pub fn push_child(&mut self, parent: ElementId, mut element: MemoryElement) -> ElementId {
        element.parent = Some(parent);
        self.push(element)
    }

    /// Element behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this page.
    #[must_use]
    pub fn element(&self, id: ElementId) -> &MemoryElement {
        &self.elements[id.get() as usize]
    }

    fn element_mut(&mut self, id: ElementId) -> &mut MemoryElement {
        &mut self.elements[id.get() as usize]
    }

    #[must_use]
    pub fn style(&self, id: ElementId, property: StyleProperty) -> Option<&str> {
        self.element(id).styles.get(&property).map(String::as_str)
    }

    #[must_use]
    pub fn is_hidden(&self, id: ElementId, hidden_class: &str) -> bool {
        self.has_class(id, hidden_class)
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    /// Scroll the page down by `dy` pixels (negative scrolls up).
    pub fn scroll_by(&mut self, dy: f64) {
        for el in &mut self.elements {
            el.top -= dy;
        }
    }

    /// Elements passed to [`PageView::scroll_into_view`], oldest first.
    #[must_use]
    pub fn scrolled_to(&self) -> &[ElementId] {
        &self.scrolled_to
    }

    /// Lines written with [`PageView::console_log`].
    #[must_use]
    pub fn console(&self) -> &[String] {
        &self.console
    }

    fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        (0..self.elements.len()).map(|i| ElementId::new(i as u32))
    }
}

impl PageView for MemoryPage {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.ids()
            .filter(|&id| self.element(id).matches(selector))
            .collect()
    }

    fn by_id(&self, id: &str) -> Option<ElementId> {
        self.ids()
            .find(|&el| self.element(el).id.as_deref() == Some(id))
    }

    fn closest(&self, el: ElementId, selector: &str) -> Option<ElementId> {
        let mut cursor = Some(el);
        while let Some(current) = cursor {
            let element = self.element(current);
            if element.matches(selector) {
                return Some(current);
            }
            cursor = element.parent;
        }
        None
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el).attributes.get(name).cloned()
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.element(el).classes.contains(class)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        self.element_mut(el).classes.insert(class.to_owned());
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        self.element_mut(el).classes.remove(class);
    }

    fn text(&self, el: ElementId) -> String {
        self.element(el).text.clone()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        self.element_mut(el).text = text.to_owned();
    }

    fn set_style(&mut self, el: ElementId, property: StyleProperty, value: &str) {
        self.element_mut(el).styles.insert(property, value.to_owned());
    }

    fn clear_style(&mut self, el: ElementId, property: StyleProperty) {
        self.element_mut(el).styles.remove(&property);
    }

    fn element_top(&self, el: ElementId) -> f64 {
        self.element(el).top
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_into_view(&mut self, el: ElementId) {
        let dy = self.element(el).top;
        self.scroll_by(dy);
        self.scrolled_to.push(el);
    }

    fn console_log(&mut self, message: &str) {
        self.console.push(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_id_and_tag_selectors() {
        let el = MemoryElement::new("div").id("orderCount").class("menu-item");
        assert!(el.matches(".menu-item"));
        assert!(el.matches("div.menu-item"));
        assert!(el.matches("#orderCount"));
        assert!(el.matches("*"));
        assert!(!el.matches("span.menu-item"));
        assert!(!el.matches(".contact-item"));
        assert!(!el.matches("."));
    }

    #[test]
    fn selector_groups() {
        let contact = MemoryElement::new("li").class("contact-item");
        assert!(contact.matches(".menu-item, .contact-item"));
        assert!(!contact.matches(".menu-item, .nav-btn"));
    }

    #[test]
    fn attribute_selectors() {
        let anchor = MemoryElement::new("a").attr("href", "#about");
        assert!(anchor.matches("a[href^=\"#\"]"));
        assert!(anchor.matches("a[href='#about']"));
        assert!(anchor.matches("[href]"));
        assert!(!anchor.matches("a[href^=\"http\"]"));

        let external = MemoryElement::new("a").attr("href", "https://example.com");
        assert!(!external.matches("a[href^=\"#\"]"));
    }

    #[test]
    fn combinators_never_match() {
        let el = MemoryElement::new("div").class("menu-item");
        assert!(!el.matches(".grid .menu-item"));
        assert!(!el.matches(".grid>.menu-item"));
    }

    #[test]
    fn closest_walks_parents() {
        let mut page = MemoryPage::new(800.0);
        let item = page.push(MemoryElement::new("div").class("menu-item"));
        let body = page.push_child(item, MemoryElement::new("div").class("body"));
        let button = page.push_child(body, MemoryElement::new("button").class("order-btn"));
        let loose = page.push(MemoryElement::new("button").class("order-btn"));

        assert_eq!(page.closest(button, ".menu-item"), Some(item));
        assert_eq!(page.closest(item, ".menu-item"), Some(item));
        assert_eq!(page.closest(loose, ".menu-item"), None);
    }

    #[test]
    fn scroll_into_view_moves_target_to_top() {
        let mut page = MemoryPage::new(800.0);
        let a = page.push(MemoryElement::new("section").id("a").top(100.0));
        let b = page.push(MemoryElement::new("section").id("b").top(1500.0));
        page.scroll_into_view(b);
        assert_eq!(page.element_top(b), 0.0);
        assert_eq!(page.element_top(a), -1400.0);
        assert_eq!(page.scrolled_to(), &[b]);
    }
}
