//! Theme controller.
//!
//! The page theme is the `data-theme` attribute of the root element. It changes
//! only through clicks on the theme switch. [`ThemeController::ensure_state`] is
//! the one operation allowed to retry, and its retries are bounded by
//! [`ThemeSettings::max_attempts`]; every other operation runs exactly once.
//!
//! ```text
//!            toggle()                   toggle() (UI responds)
//!   Light ─────────────▶ Dark ─────────────────────────▶ Light
//!     ▲                                                   │
//!     └──── ensure_state(Light): 0 clicks ◀───────────────┘
//!
//!   Unknown (attribute absent or unrecognized) ── toggle() ──▶ Light | Dark | Unknown
//! ```

use crate::driver::PageDriver;
use crate::locator::Locator;
use crate::registry::ElementRegistry;
use crate::result::{SiteCheckError, SiteCheckResult};
use crate::snapshot::{baseline_name, SnapshotOutcome, SnapshotStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Registry name of the theme switch
pub const SWITCH_THEME_BUTTON: &str = "Switch theme button";

/// Registry name of the root element carrying the theme attribute
pub const HTML_TAG: &str = "html tag";

/// Attribute holding the theme
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Default number of toggles before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

/// Default wait after each toggle
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(500);

/// A theme the page can be put into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light mode
    Light,
    /// Dark mode
    Dark,
}

impl Theme {
    /// Both themes, light first
    pub const ALL: [Self; 2] = [Self::Light, Self::Dark];

    /// Attribute value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SiteCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(SiteCheckError::Config {
                message: format!("unknown theme '{other}'"),
            }),
        }
    }
}

/// Theme observed on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeState {
    /// `data-theme="light"`
    Light,
    /// `data-theme="dark"`
    Dark,
    /// Attribute absent (`None`) or carrying another value
    Unknown(Option<String>),
}

impl ThemeState {
    /// Map a raw attribute value
    #[must_use]
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("light") => Self::Light,
            Some("dark") => Self::Dark,
            other => Self::Unknown(other.map(str::to_string)),
        }
    }

    /// Whether the page shows `theme`
    #[must_use]
    pub const fn is(&self, theme: Theme) -> bool {
        matches!(
            (self, theme),
            (Self::Light, Theme::Light) | (Self::Dark, Theme::Dark)
        )
    }

    /// Known theme, if any
    #[must_use]
    pub const fn theme(&self) -> Option<Theme> {
        match self {
            Self::Light => Some(Theme::Light),
            Self::Dark => Some(Theme::Dark),
            Self::Unknown(_) => None,
        }
    }
}

impl From<Theme> for ThemeState {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::Light,
            Theme::Dark => Self::Dark,
        }
    }
}

impl fmt::Display for ThemeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
            Self::Unknown(Some(value)) => write!(f, "unknown({value})"),
            Self::Unknown(None) => f.write_str("unset"),
        }
    }
}

/// Result of [`ThemeController::ensure_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeTransition {
    /// Theme the page now shows
    pub target: Theme,
    /// Toggles performed
    pub clicks: usize,
}

impl ThemeTransition {
    /// Whether the page already showed the target
    #[must_use]
    pub const fn was_already_set(&self) -> bool {
        self.clicks == 0
    }
}

/// Retry bound and settle delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// Toggles attempted by `ensure_state` before failing
    pub max_attempts: usize,
    /// Wait after each toggle before the attribute is read
    pub settle: Duration,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            settle: DEFAULT_SETTLE,
        }
    }
}

/// Toggles and verifies the page theme
#[derive(Debug)]
pub struct ThemeController<'p, P: ?Sized> {
    page: &'p P,
    switch: Locator,
    root: Locator,
    attribute: String,
    settings: ThemeSettings,
}

impl<'p, P: PageDriver + ?Sized> ThemeController<'p, P> {
    /// Controller over explicit locators
    #[must_use]
    pub fn new(page: &'p P, switch: Locator, root: Locator) -> Self {
        Self {
            page,
            switch,
            root,
            attribute: THEME_ATTRIBUTE.to_string(),
            settings: ThemeSettings::default(),
        }
    }

    /// Controller using the registry's `Switch theme button` and `html tag`
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::ElementNotFound`] if either is not registered
    pub fn from_registry(page: &'p P, registry: &ElementRegistry) -> SiteCheckResult<Self> {
        let switch = registry.get(SWITCH_THEME_BUTTON)?.locator().clone();
        let root = registry.get(HTML_TAG)?.locator().clone();
        Ok(Self::new(page, switch, root))
    }

    /// Set retry bound and settle delay
    #[must_use]
    pub const fn with_settings(mut self, settings: ThemeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Read the theme from another attribute
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    /// Current settings
    #[must_use]
    pub const fn settings(&self) -> ThemeSettings {
        self.settings
    }

    /// Click the switch once, then wait for the UI to settle
    ///
    /// # Errors
    ///
    /// Returns the driver's click error
    pub async fn toggle(&self) -> SiteCheckResult<()> {
        self.page.click(&self.switch).await?;
        if !self.settings.settle.is_zero() {
            tokio::time::sleep(self.settings.settle).await;
        }
        Ok(())
    }

    /// Read the theme attribute
    ///
    /// # Errors
    ///
    /// Returns the driver's error when the root element cannot be read
    pub async fn read_state(&self) -> SiteCheckResult<ThemeState> {
        let value = self.page.get_attribute(&self.root, &self.attribute).await?;
        Ok(ThemeState::from_attribute(value.as_deref()))
    }

    /// Put the page into `target`, toggling at most `max_attempts` times (at
    /// least once)
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::ThemeConvergenceFailed`] when the page still
    /// shows another theme after the last attempt
    pub async fn ensure_state(&self, target: Theme) -> SiteCheckResult<ThemeTransition> {
        let mut observed = self.read_state().await?;
        if observed.is(target) {
            info!(%target, "theme already set");
            return Ok(ThemeTransition { target, clicks: 0 });
        }

        let max_attempts = self.settings.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            self.toggle().await?;
            observed = self.read_state().await?;
            if observed.is(target) {
                info!(%target, clicks = attempt, "theme switched");
                return Ok(ThemeTransition {
                    target,
                    clicks: attempt,
                });
            }
            warn!(%target, %observed, attempt, "theme did not switch");
        }

        Err(SiteCheckError::ThemeConvergenceFailed {
            target: target.to_string(),
            observed: observed.to_string(),
            attempts: max_attempts,
        })
    }

    /// Compare a full-page screenshot against the baseline of `target`
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::ThemePreconditionFailed`] if the page does not
    /// show `target`, otherwise the store's comparison error
    pub async fn capture_screenshot(
        &self,
        target: Theme,
        store: &SnapshotStore,
    ) -> SiteCheckResult<SnapshotOutcome> {
        let observed = self.read_state().await?;
        if !observed.is(target) {
            return Err(SiteCheckError::ThemePreconditionFailed {
                expected: target.to_string(),
                observed: observed.to_string(),
            });
        }
        let engine = self.page.browser_info().await?.engine;
        let png = self.page.screenshot().await?;
        store.compare(&engine, &baseline_name(target), &png)
    }

    /// [`ThemeController::ensure_state`] followed by [`ThemeController::capture_screenshot`]
    ///
    /// # Errors
    ///
    /// Returns the first error of either step
    pub async fn check_theme(
        &self,
        target: Theme,
        store: &SnapshotStore,
    ) -> SiteCheckResult<SnapshotOutcome> {
        let _ = self.ensure_state(target).await?;
        self.capture_screenshot(target, store).await
    }
}
