//! Page Object façade.
//!
//! A [`PageObject`] pairs one page with an [`ElementRegistry`] and turns the
//! registry entries into checks. Bulk operations record one soft outcome per
//! matching descriptor, in registration order, so one missing element never hides
//! the state of the others. Single-target operations look the descriptor up by
//! name and fail with [`crate::SiteCheckError::ElementNotFound`] when it is absent.
//!
//! ```ignore
//! let page = MockPage::new();
//! let main = PageObject::new(&page, MAIN_PAGE_URL, main_page::registry()?);
//! main.open().await?;
//!
//! let mut soft = SoftAssertions::new();
//! main.check_all_visible(&mut soft).await;
//! main.click(&mut soft, "Switch theme button").await?;
//! soft.verify()?;
//! ```

use crate::assertion::{expect, AssertionCheckResult, ExpectConfig, SoftAssertions};
use crate::driver::PageDriver;
use crate::element::{BoundElement, ElementDescriptor};
use crate::registry::ElementRegistry;
use crate::result::SiteCheckResult;
use std::sync::Arc;
use tracing::debug;

/// Step title of a visibility check
#[must_use]
pub fn visibility_step(name: &str) -> String {
    format!("Check {name} element visibility")
}

/// Step title of a text check
#[must_use]
pub fn text_step(name: &str) -> String {
    format!("Check {name} element name")
}

/// Step title of an attribute check
#[must_use]
pub fn attribute_step(name: &str, attribute: &str) -> String {
    format!("Check {name} element {attribute} attribute value")
}

/// Registry-driven checks against one page
#[derive(Debug)]
pub struct PageObject<'p, P: ?Sized> {
    page: &'p P,
    url: String,
    registry: Arc<ElementRegistry>,
    expect: ExpectConfig,
}

impl<P: ?Sized> Clone for PageObject<'_, P> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            url: self.url.clone(),
            registry: Arc::clone(&self.registry),
            expect: self.expect,
        }
    }
}

impl<'p, P: PageDriver + ?Sized> PageObject<'p, P> {
    /// Create a page object
    #[must_use]
    pub fn new(page: &'p P, url: impl Into<String>, registry: Arc<ElementRegistry>) -> Self {
        Self {
            page,
            url: url.into(),
            registry,
            expect: ExpectConfig::default(),
        }
    }

    /// Use a specific expectation timeout for every check
    #[must_use]
    pub const fn with_expect_config(mut self, config: ExpectConfig) -> Self {
        self.expect = config;
        self
    }

    /// Underlying page
    #[must_use]
    pub const fn page(&self) -> &'p P {
        self.page
    }

    /// URL opened by [`PageObject::open`]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Element registry
    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Expectation timing
    #[must_use]
    pub const fn expect_config(&self) -> ExpectConfig {
        self.expect
    }

    /// Navigate to the page URL
    ///
    /// # Errors
    ///
    /// Returns the driver's navigation error
    pub async fn open(&self) -> SiteCheckResult<()> {
        tracing::info!(url = %self.url, "opening page");
        self.page.navigate(&self.url).await
    }

    /// Look up a descriptor by name
    ///
    /// # Errors
    ///
    /// Returns [`crate::SiteCheckError::ElementNotFound`]
    pub fn descriptor(&self, name: &str) -> SiteCheckResult<&ElementDescriptor> {
        self.registry.get(name)
    }

    /// Bind a named element to the page
    ///
    /// # Errors
    ///
    /// Returns [`crate::SiteCheckError::ElementNotFound`]
    pub fn element(&self, name: &str) -> SiteCheckResult<BoundElement<'_, P>> {
        Ok(self.descriptor(name)?.resolve(self.page))
    }

    /// Soft-check that every registered element is visible
    pub async fn check_all_visible(&self, soft: &mut SoftAssertions) {
        for descriptor in self.registry.iter() {
            let result = self.visible(descriptor).await;
            soft.record(visibility_step(descriptor.name()), result);
        }
    }

    /// Soft-check the text of every element that declares one
    pub async fn check_all_text(&self, soft: &mut SoftAssertions) {
        for descriptor in self.registry.with_text() {
            let Some(text) = descriptor.expected_text() else {
                continue;
            };
            debug!(element = descriptor.name(), %text, "checking text");
            let result = expect(descriptor.resolve(self.page))
                .with_config(self.expect)
                .to_contain_text(text)
                .await;
            soft.record(text_step(descriptor.name()), result);
        }
    }

    /// Soft-check every element whose expected attribute is named `attribute`
    pub async fn check_all_attributes(&self, soft: &mut SoftAssertions, attribute: &str) {
        for descriptor in self.registry.with_attribute(attribute) {
            let Some(expected) = descriptor.expected_attribute() else {
                continue;
            };
            let result = self
                .attribute(descriptor, &expected.name, &expected.value)
                .await;
            soft.record(attribute_step(descriptor.name(), attribute), result);
        }
    }

    /// Soft-check one attribute of a named element
    ///
    /// # Errors
    ///
    /// Returns [`crate::SiteCheckError::ElementNotFound`] if `name` is not registered
    pub async fn check_one_attribute(
        &self,
        soft: &mut SoftAssertions,
        name: &str,
        attribute: &str,
        expected: &str,
    ) -> SiteCheckResult<()> {
        let descriptor = self.descriptor(name)?;
        let result = self.attribute(descriptor, attribute, expected).await;
        soft.record(attribute_step(name, attribute), result);
        Ok(())
    }

    /// Soft-check that a named element is visible, then click it
    ///
    /// # Errors
    ///
    /// Returns [`crate::SiteCheckError::ElementNotFound`] if `name` is not registered,
    /// or the driver's error if the click itself fails
    pub async fn click(&self, soft: &mut SoftAssertions, name: &str) -> SiteCheckResult<()> {
        let descriptor = self.descriptor(name)?;
        let result = self.visible(descriptor).await;
        soft.record(visibility_step(name), result);
        debug!(element = name, "click");
        descriptor.resolve(self.page).click().await
    }

    /// Hard-check that a named element is visible
    ///
    /// # Errors
    ///
    /// Returns [`crate::SiteCheckError::ElementNotFound`] or [`crate::SiteCheckError::AssertionFailed`]
    pub async fn expect_visible(&self, name: &str) -> SiteCheckResult<()> {
        let descriptor = self.descriptor(name)?;
        self.visible(descriptor).await.into_hard()
    }

    /// Hard-check one attribute of a named element
    ///
    /// # Errors
    ///
    /// Returns [`crate::SiteCheckError::ElementNotFound`] or [`crate::SiteCheckError::AssertionFailed`]
    pub async fn expect_attribute(
        &self,
        name: &str,
        attribute: &str,
        expected: &str,
    ) -> SiteCheckResult<()> {
        let descriptor = self.descriptor(name)?;
        self.attribute(descriptor, attribute, expected)
            .await
            .into_hard()
    }

    async fn visible(&self, descriptor: &ElementDescriptor) -> AssertionCheckResult {
        debug!(element = descriptor.name(), "checking visibility");
        expect(descriptor.resolve(self.page))
            .with_config(self.expect)
            .to_be_visible()
            .await
    }

    async fn attribute(
        &self,
        descriptor: &ElementDescriptor,
        attribute: &str,
        expected: &str,
    ) -> AssertionCheckResult {
        debug!(element = descriptor.name(), attribute, expected, "checking attribute");
        expect(descriptor.resolve(self.page))
            .with_config(self.expect)
            .to_have_attribute(attribute, expected)
            .await
    }
}
