//! Suite configuration
//!
//! Every field has a default, so an empty YAML document is a valid config.
//!
//! ```yaml
//! base_url: https://playwright.dev/
//! browser:
//!   headless: true
//! expect:
//!   timeout_ms: 5000
//! theme:
//!   max_attempts: 2
//! snapshots:
//!   dir: __snapshots__
//!   max_diff_pixel_ratio: 0.01
//! ```

use crate::assertion::ExpectConfig;
use crate::result::{SiteCheckError, SiteCheckResult};
use crate::snapshot::SnapshotConfig;
use crate::theme::{ThemeSettings, DEFAULT_MAX_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides `base_url`
pub const ENV_BASE_URL: &str = "SITECHECK_BASE_URL";
/// Overrides `browser.chromium_path`
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";
/// `1`/`true` runs the browser with a window
pub const ENV_HEADED: &str = "SITECHECK_HEADED";
/// `1`/`true` rewrites baselines
pub const ENV_UPDATE_SNAPSHOTS: &str = "SITECHECK_UPDATE_SNAPSHOTS";

/// Browser launch options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a window
    pub headless: bool,
    /// Keep the chromium sandbox enabled
    pub sandbox: bool,
    /// Chromium executable, auto-detected when unset
    pub chromium_path: Option<PathBuf>,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            chromium_path: None,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

/// Expectation timing in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectSettings {
    /// Total wait per expectation
    pub timeout_ms: u64,
    /// Interval between reads
    pub poll_interval_ms: u64,
}

impl Default for ExpectSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            poll_interval_ms: 100,
        }
    }
}

impl From<ExpectSettings> for ExpectConfig {
    fn from(settings: ExpectSettings) -> Self {
        Self::new(Duration::from_millis(settings.timeout_ms))
            .with_poll_interval(Duration::from_millis(settings.poll_interval_ms))
    }
}

/// Theme switching in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Toggles before `ensure_state` gives up
    pub max_attempts: usize,
    /// Wait after each toggle
    pub settle_ms: u64,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            settle_ms: 500,
        }
    }
}

impl From<ThemeConfig> for ThemeSettings {
    fn from(config: ThemeConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            settle: Duration::from_millis(config.settle_ms),
        }
    }
}

/// Suite configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Site under test
    pub base_url: String,
    /// Browser launch options
    pub browser: BrowserSettings,
    /// Expectation timing
    pub expect: ExpectSettings,
    /// Theme switching
    pub theme: ThemeConfig,
    /// Baseline screenshots
    pub snapshots: SnapshotConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: crate::main_page::MAIN_PAGE_URL.to_string(),
            browser: BrowserSettings::default(),
            expect: ExpectSettings::default(),
            theme: ThemeConfig::default(),
            snapshots: SnapshotConfig::default(),
        }
    }
}

impl SuiteConfig {
    /// Parse YAML and validate
    ///
    /// # Errors
    ///
    /// Returns a YAML error or [`SiteCheckError::Config`]
    pub fn from_yaml_str(yaml: &str) -> SiteCheckResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    ///
    /// # Errors
    ///
    /// Returns an I/O, YAML or validation error
    pub fn load(path: impl AsRef<Path>) -> SiteCheckResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded suite config");
        Self::from_yaml_str(&yaml)
    }

    /// Apply the `SITECHECK_*` environment overrides
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::Config`] for a malformed boolean
    pub fn with_env_overrides(self) -> SiteCheckResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::Config`] for a malformed boolean
    pub fn with_overrides<F>(mut self, lookup: F) -> SiteCheckResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(path) = lookup(ENV_CHROMIUM_PATH) {
            self.browser.chromium_path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup(ENV_HEADED) {
            self.browser.headless = !parse_flag(ENV_HEADED, &value)?;
        }
        if let Some(value) = lookup(ENV_UPDATE_SNAPSHOTS) {
            self.snapshots.update = parse_flag(ENV_UPDATE_SNAPSHOTS, &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::Config`] describing the first invalid field
    pub fn validate(&self) -> SiteCheckResult<()> {
        if self.base_url.is_empty() {
            return Err(config_error("base_url must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.snapshots.max_diff_pixel_ratio) {
            return Err(config_error(format!(
                "snapshots.max_diff_pixel_ratio must be within 0.0..=1.0, got {}",
                self.snapshots.max_diff_pixel_ratio
            )));
        }
        if self.browser.viewport_width == 0 || self.browser.viewport_height == 0 {
            return Err(config_error("browser viewport must be non-empty"));
        }
        if self.theme.max_attempts == 0 {
            return Err(config_error("theme.max_attempts must be at least 1"));
        }
        Ok(())
    }

    /// Expectation timing
    #[must_use]
    pub fn expect_config(&self) -> ExpectConfig {
        self.expect.into()
    }

    /// Theme settings
    #[must_use]
    pub fn theme_settings(&self) -> ThemeSettings {
        self.theme.into()
    }
}

fn config_error(message: impl Into<String>) -> SiteCheckError {
    SiteCheckError::Config {
        message: message.into(),
    }
}

fn parse_flag(key: &str, value: &str) -> SiteCheckResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(config_error(format!("{key}: expected a boolean, got '{other}'"))),
    }
}
