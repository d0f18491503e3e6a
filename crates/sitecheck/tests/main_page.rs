//! Main page scenarios against the in-memory page.

mod common;

use common::{config, html_selector, main_page, main_page_with_cycle, switch_selector, updating_config};
use sitecheck::prelude::*;
use sitecheck::scenarios;
use sitecheck::theme::{HTML_TAG, SWITCH_THEME_BUTTON};

fn steps_for<'a>(info: &'a TestInfo, name: &str) -> Vec<&'a CheckOutcome> {
    info.checks().iter().filter(|c| c.step.contains(name)).collect()
}

mod element_scenarios {
    use super::*;

    #[tokio::test]
    async fn test_page_elements_displaying() {
        sitecheck::logging::init_for_tests();
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut info = TestInfo::new(scenarios::PAGE_ELEMENTS_DISPLAYING);

        scenarios::page_elements_displaying(&ctx, &mut info)
            .await
            .unwrap();

        assert_eq!(page.current_url(), "https://playwright.dev/");
        assert_eq!(info.annotations()[0].kind, "browser");
        assert_eq!(
            info.annotations()[0].description,
            format!("mock {}", env!("CARGO_PKG_VERSION"))
        );

        let expected: Vec<String> = ctx
            .main
            .registry()
            .names()
            .into_iter()
            .map(visibility_step)
            .collect();
        let actual: Vec<String> = info.checks().iter().map(|c| c.step.clone()).collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_missing_element_does_not_hide_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        page.remove_element(&Selector::role_named(AriaRole::Link, "API"));
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut info = TestInfo::new(scenarios::PAGE_ELEMENTS_DISPLAYING);

        let err = scenarios::page_elements_displaying(&ctx, &mut info)
            .await
            .unwrap_err();

        match err {
            SiteCheckError::SoftAssertionsFailed(soft) => {
                assert_eq!(soft.count, 1);
                assert!(soft.failures[0].starts_with("Check API menu item element visibility"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(info.checks().len(), 12);
        assert!(!info.report().passed);
    }

    #[tokio::test]
    async fn test_page_elements_names() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut info = TestInfo::new(scenarios::PAGE_ELEMENTS_NAMES);

        scenarios::page_elements_names(&ctx, &mut info).await.unwrap();

        assert_eq!(info.checks().len(), 7);
        let get_started = steps_for(&info, "Get started button");
        assert_eq!(get_started.len(), 1);
        assert!(get_started[0].passed);
        assert_eq!(get_started[0].step, "Check Get started button element name");
    }

    #[tokio::test]
    async fn test_elements_href_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut info = TestInfo::new(scenarios::ELEMENTS_HREF_ATTRIBUTES);

        scenarios::elements_href_attributes(&ctx, &mut info)
            .await
            .unwrap();

        assert_eq!(info.checks().len(), 7);
        let get_started = steps_for(&info, "Get started button");
        assert_eq!(get_started.len(), 1);
        assert!(get_started[0].passed);
        assert_eq!(
            get_started[0].step,
            "Check Get started button element href attribute value"
        );
    }

    #[tokio::test]
    async fn test_wrong_href_is_reported_softly() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        page.set_attribute(
            &Selector::role_named(AriaRole::Link, "Community"),
            "href",
            "/community/old",
        );
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut info = TestInfo::new(scenarios::ELEMENTS_HREF_ATTRIBUTES);

        let err = scenarios::elements_href_attributes(&ctx, &mut info)
            .await
            .unwrap_err();
        assert!(matches!(err, SiteCheckError::SoftAssertionsFailed(ref e) if e.count == 1));
        assert_eq!(info.report().summary.passed, 6);
    }

    #[tokio::test]
    async fn test_click_unregistered_element() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut soft = SoftAssertions::new();

        assert!(ctx.main.registry().find("nonexistent").is_none());
        let err = ctx.main.click(&mut soft, "nonexistent").await.unwrap_err();
        assert!(matches!(err, SiteCheckError::ElementNotFound { ref name } if name == "nonexistent"));
    }
}

mod theme_scenarios {
    use super::*;

    #[tokio::test]
    async fn test_light_mode_first_run_writes_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut info = TestInfo::new(scenarios::LIGHT_MODE_THEME);

        let err = scenarios::light_mode_theme(&ctx, &mut info)
            .await
            .unwrap_err();
        assert!(matches!(err, SiteCheckError::MissingBaseline { .. }));
        assert!(dir.path().join("mock").join("page_with_light_mode.png").exists());

        let steps = info.steps();
        assert_eq!(steps[0].title, "Checking data-theme attribute of html tag");
        assert_eq!(steps[0].status, sitecheck::report::StepStatus::Passed);
        assert_eq!(steps[1].status, sitecheck::report::StepStatus::Failed);

        let mut info = TestInfo::new(scenarios::LIGHT_MODE_THEME);
        scenarios::light_mode_theme(&ctx, &mut info).await.unwrap();
    }

    #[tokio::test]
    async fn test_dark_mode_theme() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        let ctx = MainPageContext::open(&page, &updating_config(dir.path()))
            .await
            .unwrap();
        let mut info = TestInfo::new(scenarios::DARK_MODE_THEME);

        scenarios::dark_mode_theme(&ctx, &mut info).await.unwrap();

        let titles: Vec<_> = info.steps().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Setting dark mode theme",
                "Checking data-theme attribute of html tag",
                "Checking styles of dark mode with screenshot",
            ]
        );
        assert_eq!(page.click_count(&switch_selector()), 1);
        assert_eq!(ctx.theme.read_state().await.unwrap(), ThemeState::Dark);
        assert!(dir.path().join("mock").join("page_with_dark_mode.png").exists());
    }

    #[tokio::test]
    async fn test_dark_mode_survives_one_dropped_click() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        page.drop_next_clicks(1);
        let ctx = MainPageContext::open(&page, &updating_config(dir.path()))
            .await
            .unwrap();
        let mut info = TestInfo::new(scenarios::DARK_MODE_THEME);

        scenarios::dark_mode_theme(&ctx, &mut info).await.unwrap();
        assert_eq!(page.click_count(&switch_selector()), 2);
    }

    #[tokio::test]
    async fn test_dark_mode_unresponsive_switch() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        page.drop_next_clicks(10);
        let ctx = MainPageContext::open(&page, &updating_config(dir.path()))
            .await
            .unwrap();
        let mut info = TestInfo::new(scenarios::DARK_MODE_THEME);

        let err = scenarios::dark_mode_theme(&ctx, &mut info)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SiteCheckError::ThemeConvergenceFailed { attempts: 2, .. }
        ));
        assert_eq!(info.steps().len(), 1);
        assert!(!page.was_called("screenshot"));
    }

    #[tokio::test]
    async fn test_active_theme_styles_three_state_switch() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page_with_cycle(&["system", "light", "dark"]);
        let ctx = MainPageContext::open(&page, &updating_config(dir.path()))
            .await
            .unwrap();
        let mut info = TestInfo::new(scenarios::ACTIVE_THEME_STYLES);

        scenarios::active_theme_styles(&ctx, &mut info)
            .await
            .unwrap();

        let titles: Vec<_> = info.steps().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Check styles of active light theme mode",
                "Check styles of active dark theme mode",
            ]
        );
        assert_eq!(page.click_count(&switch_selector()), 1);
        assert!(dir.path().join("mock").join("page_with_light_mode.png").exists());
        assert!(dir.path().join("mock").join("page_with_dark_mode.png").exists());
    }

    #[tokio::test]
    async fn test_theme_switcher_header() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut info = TestInfo::new(scenarios::THEME_SWITCHER_HEADER);

        scenarios::theme_switcher_header(&ctx, &mut info, Theme::Dark)
            .await
            .unwrap();
        assert_eq!(
            info.checks()[0].step,
            format!("Check {SWITCH_THEME_BUTTON} element visibility")
        );
        assert_eq!(
            info.checks()[1].step,
            format!("Check {HTML_TAG} element data-theme attribute value")
        );
    }

    #[tokio::test]
    async fn test_ensure_light_on_light_page_does_not_click() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();

        let transition = ctx.theme.ensure_state(Theme::Light).await.unwrap();
        assert_eq!(transition.clicks, 0);
        assert_eq!(page.click_count(&switch_selector()), 0);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();

        let before = ctx.theme.read_state().await.unwrap();
        ctx.theme.toggle().await.unwrap();
        ctx.theme.toggle().await.unwrap();
        assert_eq!(ctx.theme.read_state().await.unwrap(), before);
    }
}

mod visual_scenarios {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    #[tokio::test]
    async fn test_changed_styles_are_a_visual_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let baseline = dir.path().join("mock").join("page_with_light_mode.png");
        std::fs::create_dir_all(baseline.parent().unwrap()).unwrap();
        let mut png = Cursor::new(Vec::new());
        ImageBuffer::from_pixel(16, 16, Rgba([200u8, 0, 0, 255]))
            .write_to(&mut png, ImageFormat::Png)
            .unwrap();
        std::fs::write(&baseline, png.into_inner()).unwrap();

        let page = main_page();
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut info = TestInfo::new(scenarios::LIGHT_MODE_THEME);

        let err = scenarios::light_mode_theme(&ctx, &mut info)
            .await
            .unwrap_err();
        assert!(matches!(err, SiteCheckError::VisualMismatch { ref name, .. } if name == "page_with_light_mode.png"));
        assert!(dir.path().join("mock").join("page_with_light_mode-actual.png").exists());
    }

    #[tokio::test]
    async fn test_screenshot_refused_in_wrong_theme() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        page.set_attribute(&html_selector(), "data-theme", "dark");
        let ctx = MainPageContext::open(&page, &updating_config(dir.path()))
            .await
            .unwrap();
        let mut info = TestInfo::new(scenarios::LIGHT_MODE_THEME);

        let err = scenarios::light_mode_theme(&ctx, &mut info)
            .await
            .unwrap_err();
        assert!(matches!(err, SiteCheckError::ThemePreconditionFailed { .. }));
        assert!(!page.was_called("screenshot"));

        let checks = steps_for(&info, HTML_TAG);
        assert_eq!(checks.len(), 1);
        assert_eq!(
            checks[0].step,
            format!("Check {HTML_TAG} element data-theme attribute value")
        );
        assert!(!checks[0].passed);
        let summary = info.report().summary;
        assert_eq!((summary.total, summary.failed), (1, 1));
    }

    #[tokio::test]
    async fn test_soft_outcomes_kept_when_click_fails() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        page.remove_element(&switch_selector());
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut info = TestInfo::new(scenarios::THEME_SWITCHER_HEADER);

        let err = scenarios::theme_switcher_header(&ctx, &mut info, Theme::Dark)
            .await
            .unwrap_err();
        assert!(matches!(err, SiteCheckError::NoMatch { .. }));

        let checks = steps_for(&info, SWITCH_THEME_BUTTON);
        assert_eq!(checks.len(), 1);
        assert!(!checks[0].passed);
        assert!(!info.report().passed);
    }
}

mod report_scenarios {
    use super::*;

    #[tokio::test]
    async fn test_report_written_after_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let page = main_page();
        let ctx = MainPageContext::open(&page, &config(dir.path())).await.unwrap();
        let mut info = TestInfo::new(scenarios::PAGE_ELEMENTS_NAMES);
        scenarios::page_elements_names(&ctx, &mut info).await.unwrap();

        let path = dir.path().join("report.json");
        info.report().write_json(&path).unwrap();
        let report: TestReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(report.title, "Check page elements names");
        assert_eq!(report.summary.total, 7);
        assert!(report.passed);
    }

    #[test]
    fn test_registry_is_shareable_across_tests() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let registry = sitecheck::main_page::registry().unwrap();
        assert_send_sync(&registry);
        let shared = std::sync::Arc::clone(&registry);
        assert_eq!(shared.names(), registry.names());
    }
}
