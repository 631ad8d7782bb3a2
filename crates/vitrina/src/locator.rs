//! Selectors for element addressing.
//!
//! Elements are addressed by stable test identifiers (the storefront's
//! `data-test` attribute) rather than by DOM structure. Per-item controls
//! carry no identifier of their own; they are addressed through the
//! [`slug`] of the item's display name, which makes the slug rule part of
//! the harness contract.

use serde::{Deserialize, Serialize};

/// Attribute the storefront uses for stable test identifiers
pub const TEST_ID_ATTRIBUTE: &str = "data-test";

/// Selector for locating elements on the driven page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Stable test identifier (`data-test` attribute)
    TestId(String),
    /// Raw CSS selector, for the few landmarks without a test identifier
    Css(String),
}

impl Selector {
    /// Create a test-id selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Render as a CSS selector string
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::TestId(id) => format!("[{TEST_ID_ATTRIBUTE}=\"{id}\"]"),
            Self::Css(css) => css.clone(),
        }
    }

    /// Short human-readable description for error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::TestId(id) => format!("{TEST_ID_ATTRIBUTE}={id}"),
            Self::Css(css) => format!("css={css}"),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Derive the control identifier for an item display name.
///
/// Lowercases the name and collapses internal whitespace runs to single
/// hyphens: `"Sauce Labs Bike Light"` becomes `sauce-labs-bike-light`.
/// This is the only address space for per-item controls, so the rule must
/// match the storefront's exactly.
#[must_use]
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
