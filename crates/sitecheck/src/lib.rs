//! Sitecheck: page-object UI checks for documentation sites
//!
//! A page is described once, as an [`ElementRegistry`] of named elements with
//! their locators and expected text or attributes. A [`PageObject`] turns that
//! table into soft or hard checks, a [`ThemeController`] switches the light/dark
//! theme with a bounded number of attempts, and a [`SnapshotStore`] compares
//! full-page screenshots against per-theme baselines.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   scenarios (named steps, TestInfo)                             │
//! ├───────────────────────────────┬─────────────────────────────────┤
//! │   PageObject                  │   ThemeController               │
//! │   check_all_* / click         │   toggle / ensure_state         │
//! │   expect + SoftAssertions     │   capture_screenshot ──► Store  │
//! ├───────────────────────────────┴─────────────────────────────────┤
//! │   ElementRegistry (main_page::registry)                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   PageDriver: MockPage | ChromiumPage (feature "browser")       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;
mod driver;
mod element;
mod locator;
mod page_object;
mod registry;
mod result;

/// Chromium driver over the DevTools protocol
#[cfg(feature = "browser")]
pub mod browser;

/// Suite configuration (YAML + environment)
pub mod config;

/// Logging setup
pub mod logging;

/// The playwright.dev main page registry
pub mod main_page;

/// In-memory page driver for tests
pub mod mock;

/// Test reporting
pub mod report;

/// Main page scenarios
pub mod scenarios;

/// Baseline screenshots
pub mod snapshot;

/// Theme controller
pub mod theme;

pub use assertion::{
    expect, AssertionCheckResult, AssertionSummary, CheckOutcome, Expect, ExpectConfig,
    SoftAssertionError, SoftAssertions, DEFAULT_EXPECT_TIMEOUT, DEFAULT_POLL_INTERVAL,
};
pub use driver::{BrowserInfo, PageDriver};
pub use element::{BoundElement, ElementDescriptor, ExpectedAttribute};
pub use locator::{AriaRole, Locator, Selector};
pub use page_object::{attribute_step, text_step, visibility_step, PageObject};
pub use registry::{ElementRegistry, RegistryBuilder};
pub use result::{SiteCheckError, SiteCheckResult};
pub use snapshot::{SnapshotConfig, SnapshotOutcome, SnapshotStore};
pub use theme::{Theme, ThemeController, ThemeSettings, ThemeState, ThemeTransition};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::config::SuiteConfig;
    pub use super::mock::{ClickAction, MockElement, MockPage};
    pub use super::report::{TestInfo, TestReport};
    pub use super::scenarios::MainPageContext;
    pub use super::*;
}
