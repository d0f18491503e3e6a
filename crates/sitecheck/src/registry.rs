//! Element registry: the single source of truth for where a page's elements are
//! and what they should contain.
//!
//! Registration order is preserved and drives step order in reports. Names are
//! unique; a collision is rejected when the registry is built.

use crate::element::ElementDescriptor;
use crate::result::{SiteCheckError, SiteCheckResult};
use std::collections::HashMap;

/// Ordered, name-unique list of element descriptors
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    descriptors: Vec<ElementDescriptor>,
    index: HashMap<String, usize>,
}

impl ElementRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Append a descriptor
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::DuplicateElement`] if the name is taken
    pub fn register(&mut self, descriptor: ElementDescriptor) -> SiteCheckResult<()> {
        if self.index.contains_key(descriptor.name()) {
            return Err(SiteCheckError::DuplicateElement {
                name: descriptor.name().to_string(),
            });
        }
        let _ = self
            .index
            .insert(descriptor.name().to_string(), self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Look up a descriptor by name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ElementDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// Look up a descriptor by name, failing loudly when it is absent
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::ElementNotFound`]
    pub fn get(&self, name: &str) -> SiteCheckResult<&ElementDescriptor> {
        self.find(name).ok_or_else(|| SiteCheckError::ElementNotFound {
            name: name.to_string(),
        })
    }

    /// All descriptors in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, ElementDescriptor> {
        self.descriptors.iter()
    }

    /// Alias of [`ElementRegistry::iter`]
    pub fn all(&self) -> std::slice::Iter<'_, ElementDescriptor> {
        self.iter()
    }

    /// Descriptors with expected text
    pub fn with_text(&self) -> impl Iterator<Item = &ElementDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.expected_text().is_some())
    }

    /// Descriptors whose expected attribute is named `attribute`
    pub fn with_attribute<'a>(
        &'a self,
        attribute: &'a str,
    ) -> impl Iterator<Item = &'a ElementDescriptor> + 'a {
        self.descriptors
            .iter()
            .filter(move |d| d.expects_attribute(attribute))
    }

    /// Names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(ElementDescriptor::name).collect()
    }

    /// Number of descriptors
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<'a> IntoIterator for &'a ElementRegistry {
    type Item = &'a ElementDescriptor;
    type IntoIter = std::slice::Iter<'a, ElementDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder collecting descriptors; name collisions surface from [`RegistryBuilder::build`]
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<ElementDescriptor>,
}

impl RegistryBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor
    #[must_use]
    pub fn element(mut self, descriptor: ElementDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Build the registry
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::DuplicateElement`] for the first repeated name
    pub fn build(self) -> SiteCheckResult<ElementRegistry> {
        let mut registry = ElementRegistry::new();
        for descriptor in self.descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }
}
