#![forbid(unsafe_code)]

//! Category tokens and item matching.

use core::fmt;

/// Token that selects every item.
pub const ALL_TOKEN: &str = "all";

/// The active category selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every item is shown.
    #[default]
    All,
    /// Only items whose category equals the token are shown.
    Only(String),
}

impl CategoryFilter {
    /// Interpret a category token. `"all"` selects everything; any other
    /// token, including unknown ones, selects items with exactly that
    /// category.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token == ALL_TOKEN {
            Self::All
        } else {
            Self::Only(token.to_owned())
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::All => ALL_TOKEN,
            Self::Only(token) => token,
        }
    }

    /// Whether an item carrying `item_category` stays visible.
    #[must_use]
    pub fn matches(&self, item_category: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(token) => item_category == Some(token.as_str()),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Visible/hidden tally of one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub visible: usize,
    pub hidden: usize,
}
