//! Mock page for unit testing.
//!
//! [`MockPage`] keeps a flat list of elements keyed by selector. Locators match
//! an element when their selectors are equal, which is enough to exercise the
//! registry, the assertion façade and the theme controller deterministically.
//! Clicks can rotate an attribute on another element (a theme switch) and can be
//! made to drop a number of clicks to reproduce an unresponsive UI.

use crate::driver::{BrowserInfo, PageDriver};
use crate::locator::{Locator, Selector};
use crate::result::{SiteCheckError, SiteCheckResult};
use async_trait::async_trait;
use image::{ImageBuffer, ImageFormat, Rgba};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Side effect of clicking a mock element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClickAction {
    /// Nothing happens
    #[default]
    None,
    /// Move `attribute` of the element matched by `target` to the next value in
    /// `values`, wrapping around. An unlisted current value moves to the first.
    CycleAttribute {
        /// Element whose attribute changes
        target: Selector,
        /// Attribute to rotate
        attribute: String,
        /// Values in click order
        values: Vec<String>,
    },
}

/// An element on a [`MockPage`]
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Selector this element answers to
    pub selector: Selector,
    /// Whether the element is rendered
    pub visible: bool,
    /// Text content
    pub text: Option<String>,
    /// Attributes
    pub attributes: HashMap<String, String>,
    /// Click side effect
    pub on_click: ClickAction,
}

impl MockElement {
    /// Create a visible element without text or attributes
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            visible: true,
            text: None,
            attributes: HashMap::new(),
            on_click: ClickAction::None,
        }
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mark the element as not rendered
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Set the click side effect
    #[must_use]
    pub fn on_click(mut self, action: ClickAction) -> Self {
        self.on_click = action;
        self
    }
}

#[derive(Debug)]
struct MockState {
    url: String,
    elements: Vec<MockElement>,
    history: Vec<String>,
    dropped_clicks: usize,
}

/// In-memory page implementing [`PageDriver`]
#[derive(Debug)]
pub struct MockPage {
    state: Mutex<MockState>,
    browser: BrowserInfo,
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPage {
    /// Create an empty page at `about:blank`
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                url: String::from("about:blank"),
                elements: Vec::new(),
                history: Vec::new(),
                dropped_clicks: 0,
            }),
            browser: BrowserInfo::new("mock", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Report a different browser identity
    #[must_use]
    pub fn with_browser(mut self, info: BrowserInfo) -> Self {
        self.browser = info;
        self
    }

    /// Add an element
    #[must_use]
    pub fn with_element(self, element: MockElement) -> Self {
        self.add_element(element);
        self
    }

    /// Add an element to a shared page
    pub fn add_element(&self, element: MockElement) {
        self.state().elements.push(element);
    }

    /// Remove every element answering to `selector`
    pub fn remove_element(&self, selector: &Selector) {
        self.state().elements.retain(|e| &e.selector != selector);
    }

    /// Set an attribute on every element answering to `selector`
    pub fn set_attribute(&self, selector: &Selector, name: &str, value: &str) {
        for element in self
            .state()
            .elements
            .iter_mut()
            .filter(|e| &e.selector == selector)
        {
            let _ = element
                .attributes
                .insert(name.to_string(), value.to_string());
        }
    }

    /// Ignore the next `count` clicks (they are recorded but have no effect)
    pub fn drop_next_clicks(&self, count: usize) {
        self.state().dropped_clicks = count;
    }

    /// Current URL
    #[must_use]
    pub fn current_url(&self) -> String {
        self.state().url.clone()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().history.iter().any(|c| c.starts_with(method))
    }

    /// Number of clicks (effective or dropped) on elements answering to `selector`
    #[must_use]
    pub fn click_count(&self, selector: &Selector) -> usize {
        let effective = format!("click:{selector}");
        let dropped = format!("click-dropped:{selector}");
        self.state()
            .history
            .iter()
            .filter(|c| **c == effective || **c == dropped)
            .count()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve<'s>(state: &'s MockState, locator: &Locator) -> SiteCheckResult<Option<&'s MockElement>> {
        let mut matches = state
            .elements
            .iter()
            .filter(|e| &e.selector == locator.selector());
        let first = matches.next();
        let rest = matches.count();
        if rest > 0 && locator.is_strict() {
            return Err(SiteCheckError::StrictModeViolation {
                selector: locator.to_string(),
                count: rest + 1,
            });
        }
        Ok(first)
    }

    fn resolve_one<'s>(state: &'s MockState, locator: &Locator) -> SiteCheckResult<&'s MockElement> {
        Self::resolve(state, locator)?.ok_or_else(|| SiteCheckError::NoMatch {
            selector: locator.to_string(),
        })
    }

    fn apply(state: &mut MockState, action: &ClickAction) {
        if let ClickAction::CycleAttribute {
            target,
            attribute,
            values,
        } = action
        {
            if values.is_empty() {
                return;
            }
            for element in state.elements.iter_mut().filter(|e| &e.selector == target) {
                let next = element
                    .attributes
                    .get(attribute)
                    .and_then(|current| values.iter().position(|v| v == current))
                    .map_or(0, |i| (i + 1) % values.len());
                let _ = element
                    .attributes
                    .insert(attribute.clone(), values[next].clone());
            }
        }
    }

    fn render(state: &MockState) -> SiteCheckResult<Vec<u8>> {
        let theme = state
            .elements
            .iter()
            .find(|e| e.selector == Selector::css("html"))
            .and_then(|e| e.attributes.get("data-theme"))
            .map(String::as_str);
        let fill: Rgba<u8> = match theme {
            Some("light") => Rgba([255, 255, 255, 255]),
            Some("dark") => Rgba([27, 27, 29, 255]),
            _ => Rgba([128, 128, 128, 255]),
        };
        let img = ImageBuffer::from_pixel(16, 16, fill);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)
            .map_err(|e| SiteCheckError::ScreenshotError {
                message: e.to_string(),
            })?;
        Ok(out.into_inner())
    }
}

#[async_trait]
impl PageDriver for MockPage {
    async fn navigate(&self, url: &str) -> SiteCheckResult<()> {
        let mut state = self.state();
        state.history.push(format!("navigate:{url}"));
        state.url = url.to_string();
        Ok(())
    }

    async fn is_visible(&self, locator: &Locator) -> SiteCheckResult<bool> {
        let state = self.state();
        Ok(Self::resolve(&state, locator)?.is_some_and(|e| e.visible))
    }

    async fn text_content(&self, locator: &Locator) -> SiteCheckResult<Option<String>> {
        let state = self.state();
        Ok(Self::resolve_one(&state, locator)?.text.clone())
    }

    async fn get_attribute(
        &self,
        locator: &Locator,
        name: &str,
    ) -> SiteCheckResult<Option<String>> {
        let state = self.state();
        Ok(Self::resolve_one(&state, locator)?
            .attributes
            .get(name)
            .cloned())
    }

    async fn click(&self, locator: &Locator) -> SiteCheckResult<()> {
        let mut state = self.state();
        let element = Self::resolve_one(&state, locator)?;
        if !element.visible {
            return Err(SiteCheckError::PageError {
                message: format!("{locator} is not visible and cannot be clicked"),
            });
        }
        let action = element.on_click.clone();
        if state.dropped_clicks > 0 {
            state.dropped_clicks -= 1;
            state.history.push(format!("click-dropped:{locator}"));
            return Ok(());
        }
        state.history.push(format!("click:{locator}"));
        Self::apply(&mut state, &action);
        Ok(())
    }

    async fn screenshot(&self) -> SiteCheckResult<Vec<u8>> {
        let mut state = self.state();
        state.history.push("screenshot".to_string());
        Self::render(&state)
    }

    async fn browser_info(&self) -> SiteCheckResult<BrowserInfo> {
        Ok(self.browser.clone())
    }
}
