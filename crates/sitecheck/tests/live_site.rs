//! Scenarios against the live site through chromium.
//!
//! Run with `cargo test -p sitecheck --features browser -- --ignored`.
//! `CHROMIUM_PATH`, `SITECHECK_HEADED` and `SITECHECK_UPDATE_SNAPSHOTS` apply.

use sitecheck::browser::{ChromiumBrowser, ChromiumPage};
use sitecheck::prelude::*;
use sitecheck::scenarios;

async fn launch() -> (ChromiumBrowser, ChromiumPage, SuiteConfig) {
    sitecheck::logging::init_for_tests();
    let config = SuiteConfig::default().with_env_overrides().unwrap();
    let browser = ChromiumBrowser::launch(&config.browser).await.unwrap();
    let page = browser.new_page().await.unwrap();
    (browser, page, config)
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn live_page_elements_displaying() {
    let (browser, page, config) = launch().await;
    let ctx = MainPageContext::open(&page, &config).await.unwrap();
    let mut info = TestInfo::new(scenarios::PAGE_ELEMENTS_DISPLAYING);

    scenarios::page_elements_displaying(&ctx, &mut info)
        .await
        .unwrap();
    assert!(info.annotations()[0].description.starts_with("chromium "));
    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn live_page_elements_names() {
    let (browser, page, config) = launch().await;
    let ctx = MainPageContext::open(&page, &config).await.unwrap();
    let mut info = TestInfo::new(scenarios::PAGE_ELEMENTS_NAMES);

    scenarios::page_elements_names(&ctx, &mut info).await.unwrap();
    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn live_elements_href_attributes() {
    let (browser, page, config) = launch().await;
    let ctx = MainPageContext::open(&page, &config).await.unwrap();
    let mut info = TestInfo::new(scenarios::ELEMENTS_HREF_ATTRIBUTES);

    scenarios::elements_href_attributes(&ctx, &mut info)
        .await
        .unwrap();
    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires chromium, network access and recorded baselines"]
async fn live_active_theme_styles() {
    let (browser, page, config) = launch().await;
    let ctx = MainPageContext::open(&page, &config).await.unwrap();
    let mut info = TestInfo::new(scenarios::ACTIVE_THEME_STYLES);

    scenarios::active_theme_styles(&ctx, &mut info)
        .await
        .unwrap();
    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires chromium, network access and recorded baselines"]
async fn live_light_mode_theme() {
    let (browser, page, config) = launch().await;
    let ctx = MainPageContext::open(&page, &config).await.unwrap();
    let mut info = TestInfo::new(scenarios::LIGHT_MODE_THEME);

    scenarios::light_mode_theme(&ctx, &mut info).await.unwrap();
    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires chromium, network access and recorded baselines"]
async fn live_dark_mode_theme() {
    let (browser, page, config) = launch().await;
    let ctx = MainPageContext::open(&page, &config).await.unwrap();
    let mut info = TestInfo::new(scenarios::DARK_MODE_THEME);

    scenarios::dark_mode_theme(&ctx, &mut info).await.unwrap();
    assert_eq!(ctx.theme.read_state().await.unwrap(), ThemeState::Dark);
    browser.close().await.unwrap();
}

// The site starts in "system" mode, so one header click lands on light.
#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn live_theme_switcher_header() {
    let (browser, page, config) = launch().await;
    let ctx = MainPageContext::open(&page, &config).await.unwrap();
    let mut info = TestInfo::new(scenarios::THEME_SWITCHER_HEADER);

    scenarios::theme_switcher_header(&ctx, &mut info, Theme::Light)
        .await
        .unwrap();
    assert_eq!(info.checks().len(), 2);
    browser.close().await.unwrap();
}
