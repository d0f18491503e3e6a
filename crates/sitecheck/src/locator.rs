//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a description of how to find an element, not a handle to one.
//! Drivers resolve it against the live DOM every time it is used, so the same
//! locator reflects whatever the page currently shows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ARIA roles understood by role selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaRole {
    /// `<a href>` or `role="link"`
    Link,
    /// `<button>`, `<input type=button|submit|reset>` or `role="button"`
    Button,
    /// `<h1>`..`<h6>` or `role="heading"`
    Heading,
}

impl AriaRole {
    /// Role name as written in `role="..."`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Button => "button",
            Self::Heading => "heading",
        }
    }
}

impl fmt::Display for AriaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Accessible role with optional accessible name
    Role {
        /// ARIA role
        role: AriaRole,
        /// Accessible name to match
        name: Option<String>,
        /// Require the whole name to match (case-sensitive) instead of a
        /// case-insensitive substring
        exact: bool,
    },
    /// CSS selector (e.g., "html", "nav a.navbar__brand")
    Css(String),
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

// Shared helpers injected in front of role queries.
const ACCESSIBILITY_HELPERS: &str = r#"
const __norm = s => (s || '').replace(/\s+/g, ' ').trim();
const __hidden = el => !!el.closest('[aria-hidden="true"],[hidden]') || (() => {
  const st = getComputedStyle(el);
  return st.display === 'none' || st.visibility === 'hidden';
})();
const __implicitRole = el => {
  const tag = el.tagName.toLowerCase();
  if (tag === 'a' || tag === 'area') return el.hasAttribute('href') ? 'link' : null;
  if (tag === 'button') return 'button';
  if (tag === 'input') {
    const t = (el.getAttribute('type') || 'text').toLowerCase();
    if (['button', 'submit', 'reset', 'image'].includes(t)) return 'button';
    if (['text', 'search', 'email', 'url', 'tel'].includes(t)) return 'textbox';
    return null;
  }
  if (tag === 'textarea') return 'textbox';
  if (/^h[1-6]$/.test(tag)) return 'heading';
  if (tag === 'nav') return 'navigation';
  if (tag === 'img') return el.getAttribute('alt') === '' ? null : 'img';
  return null;
};
const __role = el => (el.getAttribute('role') || '').split(' ')[0] || __implicitRole(el);
const __textOf = node => {
  if (node.nodeType === Node.TEXT_NODE) return node.textContent;
  if (node.nodeType !== Node.ELEMENT_NODE) return '';
  if (node.getAttribute('aria-hidden') === 'true') return '';
  if (node.hasAttribute('aria-label')) return node.getAttribute('aria-label');
  if (node.tagName.toLowerCase() === 'img') return node.getAttribute('alt') || '';
  return Array.from(node.childNodes).map(__textOf).join(' ');
};
const __name = el => {
  const labelledBy = el.getAttribute('aria-labelledby');
  if (labelledBy) {
    return __norm(labelledBy.split(/\s+/).map(id => {
      const ref = document.getElementById(id);
      return ref ? __textOf(ref) : '';
    }).join(' '));
  }
  if (el.hasAttribute('aria-label')) return __norm(el.getAttribute('aria-label'));
  if (el.tagName.toLowerCase() === 'img') return __norm(el.getAttribute('alt'));
  if (el.labels && el.labels.length) return __norm(Array.from(el.labels).map(__textOf).join(' '));
  const text = __norm(__textOf(el));
  return text || __norm(el.getAttribute('title'));
};
const __matches = (actual, expected, exact) => expected === null
  || (exact ? actual === expected : actual.toLowerCase().includes(expected.toLowerCase()));
"#;

impl Selector {
    /// Create a role selector without a name filter
    #[must_use]
    pub const fn role(role: AriaRole) -> Self {
        Self::Role {
            role,
            name: None,
            exact: false,
        }
    }

    /// Create a role selector filtered by accessible name (substring, case-insensitive)
    #[must_use]
    pub fn role_named(role: AriaRole, name: impl Into<String>) -> Self {
        Self::Role {
            role,
            name: Some(name.into()),
            exact: false,
        }
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Require an exact accessible-name match. No effect on non-role selectors.
    #[must_use]
    pub fn exact(self) -> Self {
        match self {
            Self::Role { role, name, .. } => Self::Role {
                role,
                name,
                exact: true,
            },
            other => other,
        }
    }

    /// JavaScript expression evaluating to the array of matching elements
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({}))", js_string(s)),
            Self::Role { role, name, exact } => {
                let name = name.as_deref().map_or_else(|| "null".to_string(), js_string);
                format!(
                    "(() => {{ {ACCESSIBILITY_HELPERS} \
                     return Array.from(document.querySelectorAll('*')).filter(el => \
                     __role(el) === {role} && !__hidden(el) && __matches(__name(el), {name}, {exact})); }})()",
                    role = js_string(role.as_str()),
                )
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role {
                role,
                name: Some(name),
                exact,
            } => {
                let suffix = if *exact { "s" } else { "i" };
                write!(f, "role={role}[name=\"{name}\"{suffix}]")
            }
            Self::Role { role, name: None, .. } => write!(f, "role={role}"),
            Self::Css(s) => write!(f, "css={s}"),
        }
    }
}

/// A locator for finding elements.
///
/// Strict locators (the default) refuse to act when several elements match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    selector: Selector,
    strict: bool,
}

impl Locator {
    /// Create a locator from a selector
    #[must_use]
    pub const fn new(selector: Selector) -> Self {
        Self {
            selector,
            strict: true,
        }
    }

    /// Shorthand for a role locator with an accessible name
    #[must_use]
    pub fn by_role(role: AriaRole, name: impl Into<String>) -> Self {
        Self::new(Selector::role_named(role, name))
    }

    /// Shorthand for a CSS locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Selector::css(selector))
    }

    /// Allow several matches (the first one is used)
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Whether the locator is strict
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }
}

impl From<Selector> for Locator {
    fn from(selector: Selector) -> Self {
        Self::new(selector)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.selector.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_role_display() {
            let sel = Selector::role_named(AriaRole::Link, "Docs");
            assert_eq!(sel.to_string(), "role=link[name=\"Docs\"i]");
            assert_eq!(sel.exact().to_string(), "role=link[name=\"Docs\"s]");
            assert_eq!(Selector::role(AriaRole::Heading).to_string(), "role=heading");
        }

        #[test]
        fn test_exact_ignored_for_css() {
            assert_eq!(Selector::css("html").exact(), Selector::css("html"));
        }

        #[test]
        fn test_css_query() {
            let query = Selector::css("html").to_query();
            assert_eq!(query, "Array.from(document.querySelectorAll(\"html\"))");
        }

        #[test]
        fn test_role_query_embeds_escaped_name() {
            let query = Selector::role_named(AriaRole::Button, "Search \"quoted\"").to_query();
            assert!(query.contains("__role(el) === \"button\""));
            assert!(query.contains("\"Search \\\"quoted\\\"\""));
            assert!(query.contains(", false)"));
        }

        #[test]
        fn test_role_query_without_name_passes_null() {
            let query = Selector::role(AriaRole::Heading).to_query();
            assert!(query.contains("__matches(__name(el), null, false)"));
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_strict_by_default() {
            let locator = Locator::css("a");
            assert!(locator.is_strict());
            assert!(!locator.with_strict(false).is_strict());
        }

        #[test]
        fn test_by_role() {
            let locator = Locator::by_role(AriaRole::Link, "Get started");
            assert_eq!(
                locator.selector(),
                &Selector::role_named(AriaRole::Link, "Get started")
            );
            assert_eq!(locator.to_string(), "role=link[name=\"Get started\"i]");
        }

        #[test]
        fn test_locators_compare_by_value() {
            assert_eq!(Locator::css("html"), Locator::css("html"));
            assert_ne!(
                Locator::css("html"),
                Locator::by_role(AriaRole::Heading, "html")
            );
        }
    }
}
