//! playwright.dev main page.
//!
//! The one table of where the main page's elements are and what they contain.
//! Every scenario reads it; none redefines it.

use crate::element::ElementDescriptor;
use crate::locator::{AriaRole, Locator};
use crate::registry::ElementRegistry;
use crate::result::SiteCheckResult;
use crate::theme::{HTML_TAG, SWITCH_THEME_BUTTON, THEME_ATTRIBUTE};
use std::sync::Arc;

/// Main page URL
pub const MAIN_PAGE_URL: &str = "https://playwright.dev/";

/// Build the main page registry
///
/// # Errors
///
/// Returns [`crate::SiteCheckError::DuplicateElement`] if two entries share a name
pub fn registry() -> SiteCheckResult<Arc<ElementRegistry>> {
    let registry = ElementRegistry::builder()
        .element(
            ElementDescriptor::new(
                "Playwright logo menu item",
                Locator::by_role(AriaRole::Link, "Playwright logo Playwright"),
            )
            .with_text("Playwright")
            .with_href("/"),
        )
        .element(
            ElementDescriptor::new("Docs menu item", Locator::by_role(AriaRole::Link, "Docs"))
                .with_text("Docs")
                .with_href("/docs/intro"),
        )
        .element(
            ElementDescriptor::new("API menu item", Locator::by_role(AriaRole::Link, "API"))
                .with_text("API")
                .with_href("/docs/api/class-playwright"),
        )
        .element(
            ElementDescriptor::new(
                "Node.js (language list) menu item",
                Locator::by_role(AriaRole::Button, "Node.js"),
            )
            .with_text("Node.js"),
        )
        .element(
            ElementDescriptor::new(
                "Community menu item",
                Locator::by_role(AriaRole::Link, "Community"),
            )
            .with_text("Community")
            .with_href("/community/welcome"),
        )
        .element(
            ElementDescriptor::new(
                "GitHub menu item",
                Locator::by_role(AriaRole::Link, "GitHub repository"),
            )
            .with_href("https://github.com/microsoft/playwright"),
        )
        .element(
            ElementDescriptor::new(
                "Discord menu item",
                Locator::by_role(AriaRole::Link, "Discord server"),
            )
            .with_href("https://aka.ms/playwright/discord"),
        )
        .element(ElementDescriptor::new(
            SWITCH_THEME_BUTTON,
            Locator::by_role(AriaRole::Button, "Switch between dark and light"),
        ))
        .element(
            ElementDescriptor::new(HTML_TAG, Locator::css("html"))
                .with_attribute(THEME_ATTRIBUTE, "light"),
        )
        .element(ElementDescriptor::new(
            "Search field",
            Locator::by_role(AriaRole::Button, "Search (Ctrl+K)"),
        ))
        .element(
            ElementDescriptor::new(
                "Playwright content heading text",
                Locator::by_role(AriaRole::Heading, "Playwright enables reliable"),
            )
            .with_text("Playwright enables reliable end-to-end testing for modern web apps."),
        )
        .element(
            ElementDescriptor::new(
                "Get started button",
                Locator::by_role(AriaRole::Link, "Get started"),
            )
            .with_text("Get started")
            .with_href("/docs/intro"),
        )
        .build()?;
    Ok(Arc::new(registry))
}
