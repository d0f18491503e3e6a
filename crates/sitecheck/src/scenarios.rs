//! Main page scenarios.
//!
//! Each scenario runs against an already opened page and reports into a
//! [`TestInfo`]. Soft checks are collected for the whole scenario and turned into
//! one [`crate::SiteCheckError::SoftAssertionsFailed`] at the end. A hard failure
//! skips the remaining steps and is returned instead, but the soft outcomes
//! recorded before it still reach the report.
//!
//! ```ignore
//! let ctx = MainPageContext::open(&page, &SuiteConfig::default()).await?;
//! let mut info = TestInfo::new(scenarios::DARK_MODE_THEME);
//! scenarios::dark_mode_theme(&ctx, &mut info).await?;
//! ```

use crate::assertion::SoftAssertions;
use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::main_page;
use crate::page_object::PageObject;
use crate::report::TestInfo;
use crate::result::{SiteCheckError, SiteCheckResult};
use crate::snapshot::SnapshotStore;
use crate::theme::{Theme, ThemeController, HTML_TAG, SWITCH_THEME_BUTTON, THEME_ATTRIBUTE};

/// Title of [`page_elements_displaying`]
pub const PAGE_ELEMENTS_DISPLAYING: &str = "Check page elements displaying";
/// Title of [`page_elements_names`]
pub const PAGE_ELEMENTS_NAMES: &str = "Check page elements names";
/// Title of [`elements_href_attributes`]
pub const ELEMENTS_HREF_ATTRIBUTES: &str = "Check elements href attributes values";
/// Title of [`light_mode_theme`]
pub const LIGHT_MODE_THEME: &str = "Check light mode theme";
/// Title of [`dark_mode_theme`]
pub const DARK_MODE_THEME: &str = "Check dark mode theme";
/// Title of [`active_theme_styles`]
pub const ACTIVE_THEME_STYLES: &str = "Check styles of active theme mode";
/// Title of [`theme_switcher_header`]
pub const THEME_SWITCHER_HEADER: &str = "Check header nav element - theme switcher";

const CHECK_DATA_THEME_STEP: &str = "Checking data-theme attribute of html tag";

/// Everything a scenario needs for one page
#[derive(Debug)]
pub struct MainPageContext<'p, P: ?Sized> {
    /// Registry façade
    pub main: PageObject<'p, P>,
    /// Theme controller over the same registry
    pub theme: ThemeController<'p, P>,
    /// Baselines
    pub snapshots: SnapshotStore,
}

impl<'p, P: PageDriver + ?Sized> MainPageContext<'p, P> {
    /// Build the context from the main page registry
    ///
    /// # Errors
    ///
    /// Returns a registry error if the theme elements are missing
    pub fn new(page: &'p P, config: &SuiteConfig) -> SiteCheckResult<Self> {
        let registry = main_page::registry()?;
        let theme = ThemeController::from_registry(page, &registry)?
            .with_settings(config.theme_settings());
        let main = PageObject::new(page, config.base_url.clone(), registry)
            .with_expect_config(config.expect_config());
        Ok(Self {
            main,
            theme,
            snapshots: SnapshotStore::from_config(config.snapshots.clone()),
        })
    }

    /// Build the context and open the page
    ///
    /// # Errors
    ///
    /// Returns a registry or navigation error
    pub async fn open(page: &'p P, config: &SuiteConfig) -> SiteCheckResult<Self> {
        let ctx = Self::new(page, config)?;
        ctx.main.open().await?;
        Ok(ctx)
    }
}

/// Annotate the browser, then soft-check that every element is visible
///
/// # Errors
///
/// Returns the browser identity error or the collected soft failures
pub async fn page_elements_displaying<P: PageDriver + ?Sized>(
    ctx: &MainPageContext<'_, P>,
    info: &mut TestInfo,
) -> SiteCheckResult<()> {
    let browser = ctx.main.page().browser_info().await?;
    info.annotate_browser(&browser);

    let mut soft = SoftAssertions::new();
    ctx.main.check_all_visible(&mut soft).await;
    info.finish(&mut soft)
}

/// Soft-check the text of every element that declares one
///
/// # Errors
///
/// Returns the collected soft failures
pub async fn page_elements_names<P: PageDriver + ?Sized>(
    ctx: &MainPageContext<'_, P>,
    info: &mut TestInfo,
) -> SiteCheckResult<()> {
    let mut soft = SoftAssertions::new();
    ctx.main.check_all_text(&mut soft).await;
    info.finish(&mut soft)
}

/// Soft-check every link target
///
/// # Errors
///
/// Returns the collected soft failures
pub async fn elements_href_attributes<P: PageDriver + ?Sized>(
    ctx: &MainPageContext<'_, P>,
    info: &mut TestInfo,
) -> SiteCheckResult<()> {
    let mut soft = SoftAssertions::new();
    ctx.main.check_all_attributes(&mut soft, "href").await;
    info.finish(&mut soft)
}

/// The page opens in light mode and matches the light baseline
///
/// # Errors
///
/// Returns a precondition or visual error, or the collected soft failures
pub async fn light_mode_theme<P: PageDriver + ?Sized>(
    ctx: &MainPageContext<'_, P>,
    info: &mut TestInfo,
) -> SiteCheckResult<()> {
    let mut soft = SoftAssertions::new();
    let outcome = async {
        info.step(CHECK_DATA_THEME_STEP, async {
            ctx.main
                .check_one_attribute(&mut soft, HTML_TAG, THEME_ATTRIBUTE, Theme::Light.as_str())
                .await
        })
        .await?;
        info.step("Checking styles of light mode with screenshot", async {
            ctx.theme
                .capture_screenshot(Theme::Light, &ctx.snapshots)
                .await
                .map(drop)
        })
        .await
    }
    .await;
    info.finish_with(&mut soft, outcome)
}

/// Switch to dark mode and match the dark baseline
///
/// # Errors
///
/// Returns a convergence, precondition or visual error, or the collected soft failures
pub async fn dark_mode_theme<P: PageDriver + ?Sized>(
    ctx: &MainPageContext<'_, P>,
    info: &mut TestInfo,
) -> SiteCheckResult<()> {
    let mut soft = SoftAssertions::new();
    let outcome = async {
        info.step("Setting dark mode theme", async {
            ctx.theme.ensure_state(Theme::Dark).await.map(drop)
        })
        .await?;
        info.step(CHECK_DATA_THEME_STEP, async {
            ctx.main
                .check_one_attribute(&mut soft, HTML_TAG, THEME_ATTRIBUTE, Theme::Dark.as_str())
                .await
        })
        .await?;
        info.step("Checking styles of dark mode with screenshot", async {
            ctx.theme
                .capture_screenshot(Theme::Dark, &ctx.snapshots)
                .await
                .map(drop)
        })
        .await
    }
    .await;
    info.finish_with(&mut soft, outcome)
}

/// For light then dark: switch, verify the attribute, match the baseline
///
/// # Errors
///
/// Returns the first hard failure
pub async fn active_theme_styles<P: PageDriver + ?Sized>(
    ctx: &MainPageContext<'_, P>,
    info: &mut TestInfo,
) -> SiteCheckResult<()> {
    let mut soft = SoftAssertions::new();
    let outcome = async {
        for theme in Theme::ALL {
            info.step(format!("Check styles of active {theme} theme mode"), async {
                ctx.main.expect_visible(SWITCH_THEME_BUTTON).await?;
                let _ = ctx.theme.ensure_state(theme).await?;
                ctx.main
                    .expect_attribute(HTML_TAG, THEME_ATTRIBUTE, theme.as_str())
                    .await?;
                ctx.theme
                    .capture_screenshot(theme, &ctx.snapshots)
                    .await
                    .map(drop)
            })
            .await?;
        }
        Ok::<_, SiteCheckError>(())
    }
    .await;
    info.finish_with(&mut soft, outcome)
}

/// Click the theme switch in the header and soft-check the resulting theme
///
/// # Errors
///
/// Returns a click error or the collected soft failures
pub async fn theme_switcher_header<P: PageDriver + ?Sized>(
    ctx: &MainPageContext<'_, P>,
    info: &mut TestInfo,
    expected: Theme,
) -> SiteCheckResult<()> {
    let mut soft = SoftAssertions::new();
    let outcome = async {
        ctx.main.click(&mut soft, SWITCH_THEME_BUTTON).await?;
        ctx.main
            .check_one_attribute(&mut soft, HTML_TAG, THEME_ATTRIBUTE, expected.as_str())
            .await
    }
    .await;
    info.finish_with(&mut soft, outcome)
}
