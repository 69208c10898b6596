#![forbid(unsafe_code)]

//! Error types for configuration loading and controller mounting.

use std::fmt;

/// Errors that can occur when loading a [`PageConfig`](crate::PageConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Role of a structural element the controller needs at mount time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// Container that is revealed after the first interaction.
    CounterContainer,
    /// Element whose text shows the counter value.
    CounterDisplay,
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CounterContainer => f.write_str("counter container"),
            Self::CounterDisplay => f.write_str("counter display"),
        }
    }
}

/// Errors raised while mounting a [`PageController`](crate::PageController).
#[derive(Debug)]
pub enum PageError {
    /// A required element is not present in the host document.
    MissingElement { role: ElementRole, selector: String },
    /// The configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement { role, selector } => {
                write!(f, "missing {role} element (`{selector}`)")
            }
            Self::Config(e) => write!(f, "invalid page config: {e}"),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingElement { .. } => None,
            Self::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for PageError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
