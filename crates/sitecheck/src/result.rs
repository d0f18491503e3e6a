//! Result and error types for sitecheck.

use crate::assertion::SoftAssertionError;
use thiserror::Error;

/// Result type for sitecheck operations
pub type SiteCheckResult<T> = Result<T, SiteCheckError>;

/// Errors that can occur while checking a page
#[derive(Debug, Error)]
pub enum SiteCheckError {
    /// Registry lookup by name failed
    #[error("Element '{name}' is not registered on this page")]
    ElementNotFound {
        /// Name that was looked up
        name: String,
    },

    /// Two descriptors share one name
    #[error("Element '{name}' is registered more than once")]
    DuplicateElement {
        /// Colliding name
        name: String,
    },

    /// Hard assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// One or more soft assertions failed during the test
    #[error("{0}")]
    SoftAssertionsFailed(SoftAssertionError),

    /// Theme switching did not reach the requested theme
    #[error("Theme did not converge to '{target}' after {attempts} attempt(s), page is '{observed}'")]
    ThemeConvergenceFailed {
        /// Requested theme
        target: String,
        /// Theme observed after the last attempt
        observed: String,
        /// Number of toggles performed
        attempts: usize,
    },

    /// Screenshot requested while the page shows another theme
    #[error("Theme screenshot for '{expected}' requested while page is '{observed}'")]
    ThemePreconditionFailed {
        /// Theme the screenshot is tagged with
        expected: String,
        /// Theme the page shows
        observed: String,
    },

    /// Screenshot differs from its baseline
    #[error("Screenshot {name} differs from baseline ({diff_ratio:.4} of pixels)")]
    VisualMismatch {
        /// Baseline name
        name: String,
        /// Ratio of differing pixels (0.0-1.0)
        diff_ratio: f64,
    },

    /// No baseline existed; the actual screenshot was written in its place
    #[error("Baseline {path} did not exist, actual screenshot written")]
    MissingBaseline {
        /// Baseline path that was written
        path: String,
    },

    /// Locator did not match any element
    #[error("No element matches {selector}")]
    NoMatch {
        /// Selector description
        selector: String,
    },

    /// Strict locator matched several elements
    #[error("Strict mode violation: {selector} resolved to {count} elements")]
    StrictModeViolation {
        /// Selector description
        selector: String,
        /// Number of matches
        count: usize,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    ScreenshotError {
        /// Error message
        message: String,
    },

    /// Image comparison error
    #[error("Image comparison failed: {message}")]
    ImageComparisonError {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl SiteCheckError {
    /// Whether the error is one an expectation may poll through
    /// (the element may still appear before the timeout).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}

impl From<SoftAssertionError> for SiteCheckError {
    fn from(err: SoftAssertionError) -> Self {
        Self::SoftAssertionsFailed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_message() {
        let err = SiteCheckError::ElementNotFound {
            name: "nonexistent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Element 'nonexistent' is not registered on this page"
        );
    }

    #[test]
    fn test_convergence_message() {
        let err = SiteCheckError::ThemeConvergenceFailed {
            target: "dark".to_string(),
            observed: "light".to_string(),
            attempts: 2,
        };
        assert!(err.to_string().contains("after 2 attempt(s)"));
    }

    #[test]
    fn test_transient() {
        let missing = SiteCheckError::NoMatch {
            selector: "css=html".to_string(),
        };
        let strict = SiteCheckError::StrictModeViolation {
            selector: "css=a".to_string(),
            count: 3,
        };
        assert!(missing.is_transient());
        assert!(!strict.is_transient());
    }
}
