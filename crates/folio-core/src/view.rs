#![forbid(unsafe_code)]

//! Document abstraction the controller drives.
//!
//! [`PageView`] is the seam between [`PageController`](crate::PageController)
//! and whatever renders the page. The browser binding implements it over
//! `web-sys`; native tests use [`MemoryPage`](crate::memory::MemoryPage).
//!
//! Elements are referred to by opaque [`ElementId`] handles that the view
//! hands out. A view must return the same handle for the same element across
//! calls so the controller can key timers and reveal state by it.

use core::fmt;

/// Opaque handle to one element of the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl ElementId {
    /// Wrap a raw handle value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw handle value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Inline style properties the controller writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleProperty {
    Opacity,
    Transform,
    Background,
    Animation,
}

impl StyleProperty {
    /// CSS property name.
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::Transform => "transform",
            Self::Background => "background",
            Self::Animation => "animation",
        }
    }
}

/// Host document operations needed by the page controller.
///
/// Selector arguments are CSS selector strings taken from
/// [`PageConfig`](crate::PageConfig). Implementations are free to support
/// only the selector shapes the configuration actually uses.
pub trait PageView {
    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Element with the given `id` attribute.
    fn by_id(&self, id: &str) -> Option<ElementId>;

    /// Nearest inclusive ancestor of `el` matching `selector`.
    fn closest(&self, el: ElementId, selector: &str) -> Option<ElementId>;

    /// Attribute value, `None` when absent.
    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;

    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);

    /// Current text content.
    fn text(&self, el: ElementId) -> String;
    fn set_text(&mut self, el: ElementId, text: &str);

    fn set_style(&mut self, el: ElementId, property: StyleProperty, value: &str);

    /// Remove an inline style property, falling back to the stylesheet value.
    fn clear_style(&mut self, el: ElementId, property: StyleProperty);

    /// Top edge of the element relative to the viewport, in CSS pixels.
    fn element_top(&self, el: ElementId) -> f64;

    /// Viewport height in CSS pixels.
    fn viewport_height(&self) -> f64;

    /// Smoothly scroll `el` into view, aligned to the top of the viewport.
    fn scroll_into_view(&mut self, el: ElementId);

    /// Write a line to the host console.
    fn console_log(&mut self, message: &str);
}
