//! Shared fixtures: an in-memory copy of the playwright.dev main page.

#![allow(dead_code)]

use sitecheck::prelude::*;
use std::path::Path;

/// Mock page answering every main page locator with the registered text and
/// attributes. The theme switch cycles `values` on the html tag.
pub fn main_page_with_cycle(values: &[&str]) -> MockPage {
    let registry = sitecheck::main_page::registry().unwrap();
    let root = registry
        .get(sitecheck::theme::HTML_TAG)
        .unwrap()
        .locator()
        .selector()
        .clone();

    let page = MockPage::new();
    for descriptor in registry.iter() {
        let mut element = MockElement::new(descriptor.locator().selector().clone());
        if let Some(text) = descriptor.expected_text() {
            element = element.with_text(text);
        }
        if let Some(attribute) = descriptor.expected_attribute() {
            element = element.with_attribute(&attribute.name, &attribute.value);
        }
        if descriptor.name() == sitecheck::theme::SWITCH_THEME_BUTTON {
            element = element.on_click(ClickAction::CycleAttribute {
                target: root.clone(),
                attribute: sitecheck::theme::THEME_ATTRIBUTE.to_string(),
                values: values.iter().map(ToString::to_string).collect(),
            });
        }
        page.add_element(element);
    }
    page
}

/// Main page with a two-state theme switch, opened in light mode
pub fn main_page() -> MockPage {
    main_page_with_cycle(&["light", "dark"])
}

/// Config reading once per check, without settle delay, storing baselines in `dir`
pub fn config(dir: &Path) -> SuiteConfig {
    let mut config = SuiteConfig::default();
    config.expect.timeout_ms = 0;
    config.expect.poll_interval_ms = 0;
    config.theme.settle_ms = 0;
    config.snapshots.dir = dir.to_path_buf();
    config
}

/// Same as [`config`] with baseline updates enabled
pub fn updating_config(dir: &Path) -> SuiteConfig {
    let mut config = config(dir);
    config.snapshots.update = true;
    config
}

/// Selector of the theme switch
pub fn switch_selector() -> Selector {
    Selector::role_named(AriaRole::Button, "Switch between dark and light")
}

/// Selector of the html tag
pub fn html_selector() -> Selector {
    Selector::css("html")
}
