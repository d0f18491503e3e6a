//! Element descriptors: a human-readable name bound to a locator and the
//! properties the element is expected to have.

use crate::driver::PageDriver;
use crate::locator::Locator;
use crate::result::SiteCheckResult;

/// Attribute name/value pair an element must expose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedAttribute {
    /// Attribute name (e.g., "href", "data-theme")
    pub name: String,
    /// Expected value
    pub value: String,
}

impl ExpectedAttribute {
    /// Create an expected attribute
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named UI element.
///
/// Descriptors are immutable once built. The locator is a description, so
/// [`ElementDescriptor::resolve`] is pure and yields an equivalent handle on
/// every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDescriptor {
    name: String,
    locator: Locator,
    expected_text: Option<String>,
    expected_attribute: Option<ExpectedAttribute>,
}

impl ElementDescriptor {
    /// Create a descriptor with no expectations
    #[must_use]
    pub fn new(name: impl Into<String>, locator: impl Into<Locator>) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            expected_text: None,
            expected_attribute: None,
        }
    }

    /// Expect the rendered text to contain `text`
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.expected_text = Some(text.into());
        self
    }

    /// Expect the element to expose `name="value"`
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.expected_attribute = Some(ExpectedAttribute::new(name, value));
        self
    }

    /// Shorthand for `with_attribute("href", value)`
    #[must_use]
    pub fn with_href(self, value: impl Into<String>) -> Self {
        self.with_attribute("href", value)
    }

    /// Descriptor name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locator used to find the element
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Expected text, if any
    #[must_use]
    pub fn expected_text(&self) -> Option<&str> {
        self.expected_text.as_deref()
    }

    /// Expected attribute, if any
    #[must_use]
    pub const fn expected_attribute(&self) -> Option<&ExpectedAttribute> {
        self.expected_attribute.as_ref()
    }

    /// Whether the expected attribute is named `attribute`
    #[must_use]
    pub fn expects_attribute(&self, attribute: &str) -> bool {
        self.expected_attribute
            .as_ref()
            .is_some_and(|a| a.name == attribute)
    }

    /// Whether the descriptor expects an `href`
    #[must_use]
    pub fn is_navigable(&self) -> bool {
        self.expects_attribute("href")
    }

    /// Bind the descriptor to a page
    #[must_use]
    pub fn resolve<'a, P: PageDriver + ?Sized>(&'a self, page: &'a P) -> BoundElement<'a, P> {
        BoundElement {
            page,
            locator: &self.locator,
        }
    }
}

/// A locator bound to a page. Every call goes back to the page.
#[derive(Debug)]
pub struct BoundElement<'a, P: ?Sized> {
    page: &'a P,
    locator: &'a Locator,
}

impl<P: ?Sized> Clone for BoundElement<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: ?Sized> Copy for BoundElement<'_, P> {}

impl<'a, P: PageDriver + ?Sized> BoundElement<'a, P> {
    /// Locator this handle resolves
    #[must_use]
    pub const fn locator(&self) -> &'a Locator {
        self.locator
    }

    /// Whether the element is visible now
    pub async fn is_visible(&self) -> SiteCheckResult<bool> {
        self.page.is_visible(self.locator).await
    }

    /// Rendered text content
    pub async fn text_content(&self) -> SiteCheckResult<Option<String>> {
        self.page.text_content(self.locator).await
    }

    /// Attribute value
    pub async fn get_attribute(&self, name: &str) -> SiteCheckResult<Option<String>> {
        self.page.get_attribute(self.locator, name).await
    }

    /// Click the element
    pub async fn click(&self) -> SiteCheckResult<()> {
        self.page.click(self.locator).await
    }
}
