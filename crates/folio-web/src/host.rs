#![forbid(unsafe_code)]

//! Host-side helpers shared by the wasm exports and native tests.

use core::time::Duration;

use folio_core::{ConfigError, PageConfig};

/// Parse the optional JSON config a page passes to `mountPage`.
///
/// A missing or blank string yields the default config.
pub fn config_from_json(json: Option<&str>) -> Result<PageConfig, ConfigError> {
    match json.map(str::trim) {
        None | Some("") => Ok(PageConfig::default()),
        Some(json) => PageConfig::from_json_str(json),
    }
}

/// Fragment of a same-page `href` (`"#about"` → `"about"`).
///
/// Returns `None` for links that leave the page.
#[must_use]
pub fn href_fragment(href: &str) -> Option<&str> {
    href.strip_prefix('#')
}

/// `setTimeout` delay for a revert due `remaining` from now.
#[must_use]
pub fn timeout_millis(remaining: Duration) -> i32 {
    // Round up so the timer never fires before the deadline.
    let millis = remaining.as_micros().div_ceil(1000);
    i32::try_from(millis).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_config_is_default() {
        assert_eq!(config_from_json(None).unwrap(), PageConfig::default());
        assert_eq!(config_from_json(Some("  ")).unwrap(), PageConfig::default());
    }

    #[test]
    fn config_json_is_validated() {
        let err = config_from_json(Some(r#"{"timing": {"item_press_ms": 0}}"#)).unwrap_err();
        assert!(err.to_string().contains("item_press_ms"));
    }

    #[test]
    fn same_page_hrefs_only() {
        assert_eq!(href_fragment("#contact"), Some("contact"));
        assert_eq!(href_fragment("#"), Some(""));
        assert_eq!(href_fragment("/about#team"), None);
        assert_eq!(href_fragment("https://example.com"), None);
    }

    #[test]
    fn timeout_rounds_up_and_saturates() {
        assert_eq!(timeout_millis(Duration::ZERO), 0);
        assert_eq!(timeout_millis(Duration::from_micros(1)), 1);
        assert_eq!(timeout_millis(Duration::from_millis(200)), 200);
        assert_eq!(timeout_millis(Duration::from_micros(199_500)), 200);
        assert_eq!(timeout_millis(Duration::from_secs(u64::MAX / 4)), i32::MAX);
    }
}
