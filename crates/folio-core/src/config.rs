#![forbid(unsafe_code)]

//! Page configuration as data.
//!
//! [`PageConfig`] captures every selector, label, and delay the controller
//! uses. `PageConfig::default()` matches the stock profile page markup, so a
//! host only needs to pass JSON when its markup differs.
//!
//! ```json
//! {
//!   "selectors": { "items": ".card", "reveal_targets": ".card, .footer-link" },
//!   "feedback": { "acknowledgement_label": "Thanks!" },
//!   "timing": { "label_revert_ms": 1500 }
//! }
//! ```

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level page configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Where to find elements in the host document.
    pub selectors: SelectorConfig,
    /// Text and style values written as feedback.
    pub feedback: FeedbackConfig,
    /// Revert delays.
    pub timing: TimingConfig,
    /// Scroll reveal tuning.
    pub reveal: RevealConfig,
    /// Line written to the console once the page is ready.
    pub ready_message: String,
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Selectors and ids of the page structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Filterable items.
    pub items: String,
    /// Category navigation controls.
    pub nav_controls: String,
    /// Per-item action controls that bump the counter.
    pub action_controls: String,
    /// Same-page anchors intercepted for smooth scrolling.
    pub anchors: String,
    /// Elements revealed when scrolled into view.
    pub reveal_targets: String,
    /// `id` of the counter container.
    pub counter_container_id: String,
    /// `id` of the element showing the counter value.
    pub counter_display_id: String,
    /// Attribute carrying an item's or control's category token.
    pub category_attribute: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            items: ".menu-item".into(),
            nav_controls: ".nav-btn".into(),
            action_controls: ".order-btn".into(),
            anchors: "a[href^=\"#\"]".into(),
            reveal_targets: ".menu-item, .contact-item".into(),
            counter_container_id: "orderCounter".into(),
            counter_display_id: "orderCount".into(),
            category_attribute: "data-category".into(),
        }
    }
}

/// Class names and inline style values used for feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub hidden_class: String,
    pub active_class: String,
    /// Class that makes the counter container visible.
    pub show_class: String,
    /// Label shown on an action control right after it is used.
    pub acknowledgement_label: String,
    /// Background shown on an action control right after it is used.
    pub acknowledgement_color: String,
    pub fade_in_animation: String,
    pub item_press_transform: String,
    pub counter_pulse_transform: String,
    pub counter_rest_transform: String,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            hidden_class: "hidden".into(),
            active_class: "active".into(),
            show_class: "show".into(),
            acknowledgement_label: "Reviewed".into(),
            acknowledgement_color: "#28a745".into(),
            fade_in_animation: "fadeIn 0.5s ease-in".into(),
            item_press_transform: "scale(0.95)".into(),
            counter_pulse_transform: "scale(1.2)".into(),
            counter_rest_transform: "scale(1)".into(),
        }
    }
}

/// Delays, in milliseconds, before feedback reverts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Acknowledgement label and color.
    pub label_revert_ms: u64,
    /// Item press scale.
    pub item_press_ms: u64,
    /// Counter pulse scale.
    pub counter_pulse_ms: u64,
    /// Fade-in stagger when showing every category.
    pub fade_stagger_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            label_revert_ms: 1000,
            item_press_ms: 200,
            counter_pulse_ms: 300,
            fade_stagger_ms: 50,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub const fn label_revert(&self) -> Duration {
        Duration::from_millis(self.label_revert_ms)
    }

    #[must_use]
    pub const fn item_press(&self) -> Duration {
        Duration::from_millis(self.item_press_ms)
    }

    #[must_use]
    pub const fn counter_pulse(&self) -> Duration {
        Duration::from_millis(self.counter_pulse_ms)
    }

    #[must_use]
    pub const fn fade_stagger(&self) -> Duration {
        Duration::from_millis(self.fade_stagger_ms)
    }
}

/// Scroll reveal parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Distance above the viewport bottom an element's top must cross.
    pub offset_px: f64,
    pub revealed_opacity: String,
    pub revealed_transform: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            offset_px: 180.0,
            revealed_opacity: "1".into(),
            revealed_transform: "translateY(0)".into(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            selectors: SelectorConfig::default(),
            feedback: FeedbackConfig::default(),
            timing: TimingConfig::default(),
            reveal: RevealConfig::default(),
            ready_message: "Student profile website loaded successfully.".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

impl PageConfig {
    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.into_validated()
    }

    /// Return `self` if [`validate`](Self::validate) reports nothing.
    pub fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let s = &self.selectors;
        for (name, value) in [
            ("selectors.items", &s.items),
            ("selectors.nav_controls", &s.nav_controls),
            ("selectors.action_controls", &s.action_controls),
            ("selectors.anchors", &s.anchors),
            ("selectors.reveal_targets", &s.reveal_targets),
            ("selectors.counter_container_id", &s.counter_container_id),
            ("selectors.counter_display_id", &s.counter_display_id),
            ("selectors.category_attribute", &s.category_attribute),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        let f = &self.feedback;
        for (name, value) in [
            ("feedback.hidden_class", &f.hidden_class),
            ("feedback.active_class", &f.active_class),
            ("feedback.show_class", &f.show_class),
        ] {
            if value.trim().is_empty() || value.contains(char::is_whitespace) {
                errors.push(format!("{name} must be a single class name, got {value:?}"));
            }
        }
        if f.acknowledgement_label.is_empty() {
            errors.push("feedback.acknowledgement_label must not be empty".into());
        }

        let t = &self.timing;
        if t.label_revert_ms == 0 {
            errors.push("timing.label_revert_ms must be > 0".into());
        }
        if t.item_press_ms == 0 {
            errors.push("timing.item_press_ms must be > 0".into());
        }
        if t.counter_pulse_ms == 0 {
            errors.push("timing.counter_pulse_ms must be > 0".into());
        }

        if !self.reveal.offset_px.is_finite() || self.reveal.offset_px < 0.0 {
            errors.push(format!(
                "reveal.offset_px must be finite and >= 0, got {}",
                self.reveal.offset_px
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_valid() {
        assert!(PageConfig::default().validate().is_empty());
    }

    #[test]
    fn default_delays() {
        let timing = TimingConfig::default();
        assert_eq!(timing.label_revert(), Duration::from_millis(1000));
        assert_eq!(timing.item_press(), Duration::from_millis(200));
        assert_eq!(timing.counter_pulse(), Duration::from_millis(300));
        assert_eq!(timing.fade_stagger(), Duration::from_millis(50));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PageConfig::from_json_str(
            r#"{"feedback": {"acknowledgement_label": "Thanks!"}, "timing": {"label_revert_ms": 1500}}"#,
        )
        .unwrap();
        assert_eq!(config.feedback.acknowledgement_label, "Thanks!");
        assert_eq!(config.feedback.acknowledgement_color, "#28a745");
        assert_eq!(config.timing.label_revert_ms, 1500);
        assert_eq!(config.timing.item_press_ms, 200);
        assert_eq!(config.selectors, SelectorConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(PageConfig::from_json_str("{}").unwrap(), PageConfig::default());
    }

    #[test]
    fn bad_json_is_json_error() {
        let err = PageConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn validate_catches_empty_selector() {
        let mut config = PageConfig::default();
        config.selectors.items = "  ".into();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("selectors.items")));
    }

    #[test]
    fn validate_catches_zero_delay() {
        let mut config = PageConfig::default();
        config.timing.label_revert_ms = 0;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("label_revert_ms")));
    }

    #[test]
    fn validate_catches_multi_word_class() {
        let mut config = PageConfig::default();
        config.feedback.active_class = "is active".into();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("feedback.active_class")));
    }

    #[test]
    fn validate_catches_negative_offset() {
        let mut config = PageConfig::default();
        config.reveal.offset_px = -1.0;
        assert!(matches!(
            config.into_validated(),
            Err(ConfigError::Validation(errors)) if errors.iter().any(|e| e.contains("offset_px"))
        ));
    }
}
