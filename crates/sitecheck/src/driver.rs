//! PageDriver - abstract page automation trait
//!
//! Everything sitecheck knows about a browser goes through this trait, so the
//! element registry, the assertion façade and the theme controller run the same
//! way against [`crate::mock::MockPage`] and a real chromium page.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PageObject / ThemeController                                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  PageDriver (trait)                                          │
//! │  ┌────────────────────┐        ┌─────────────────────────┐   │
//! │  │  ChromiumPage      │        │  MockPage               │   │
//! │  │  (feature browser) │        │  (in-memory DOM)        │   │
//! │  └────────────────────┘        └─────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::locator::Locator;
use crate::result::SiteCheckResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Browser identity reported in test annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserInfo {
    /// Engine name (e.g., "chromium")
    pub engine: String,
    /// Engine version string
    pub version: String,
}

impl BrowserInfo {
    /// Create browser info
    #[must_use]
    pub fn new(engine: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for BrowserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.engine, self.version)
    }
}

/// Abstract page trait for browser automation.
///
/// Locators are resolved on every call. Methods that act on one element fail with
/// [`crate::SiteCheckError::NoMatch`] when nothing matches and with
/// [`crate::SiteCheckError::StrictModeViolation`] when a strict locator matches
/// several elements.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to URL and wait for the load event
    async fn navigate(&self, url: &str) -> SiteCheckResult<()>;

    /// Whether the located element exists and is rendered.
    /// A locator that matches nothing is simply not visible.
    async fn is_visible(&self, locator: &Locator) -> SiteCheckResult<bool>;

    /// Rendered text content of the located element
    async fn text_content(&self, locator: &Locator) -> SiteCheckResult<Option<String>>;

    /// Attribute of the located element, `None` if the attribute is absent
    async fn get_attribute(&self, locator: &Locator, name: &str)
        -> SiteCheckResult<Option<String>>;

    /// Click the located element
    async fn click(&self, locator: &Locator) -> SiteCheckResult<()>;

    /// Full-page screenshot as PNG bytes
    async fn screenshot(&self) -> SiteCheckResult<Vec<u8>>;

    /// Engine name and version of the browser behind this page
    async fn browser_info(&self) -> SiteCheckResult<BrowserInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_info_display() {
        let info = BrowserInfo::new("chromium", "131.0.6778.33");
        assert_eq!(info.to_string(), "chromium 131.0.6778.33");
    }

    #[test]
    fn test_browser_info_serde() {
        let info = BrowserInfo::new("chromium", "1.0");
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"engine":"chromium","version":"1.0"}"#);
    }
}
