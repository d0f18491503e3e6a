//! Polling expectations on bound elements.
//!
//! An expectation re-reads the page until it holds or `ExpectConfig::timeout`
//! elapses. It never repeats an action; it only waits for the page to settle
//! into the expected state. The outcome is an [`AssertionCheckResult`] which the
//! caller either records softly ([`SoftAssertions::record`]) or turns into a hard
//! failure ([`AssertionCheckResult::into_hard`]).

mod soft;

pub use soft::{AssertionSummary, CheckOutcome, SoftAssertionError, SoftAssertions};

use crate::driver::PageDriver;
use crate::element::BoundElement;
use crate::result::{SiteCheckError, SiteCheckResult};
use std::time::{Duration, Instant};

/// Default timeout for expectations (5 seconds)
pub const DEFAULT_EXPECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default polling interval for expectations (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of an expectation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionCheckResult {
    /// Assertion passed
    Pass,
    /// Assertion failed with message
    Fail(String),
}

impl AssertionCheckResult {
    /// Check if the result is a pass
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Check if the result is a fail
    #[must_use]
    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }

    /// Turn a failure into [`SiteCheckError::AssertionFailed`]
    ///
    /// # Errors
    ///
    /// Returns the failure message as a hard error
    pub fn into_hard(self) -> SiteCheckResult<()> {
        match self {
            Self::Pass => Ok(()),
            Self::Fail(message) => Err(SiteCheckError::AssertionFailed { message }),
        }
    }
}

/// Timing of expectation polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectConfig {
    /// Total time an expectation may wait
    pub timeout: Duration,
    /// Interval between reads
    pub poll_interval: Duration,
}

impl Default for ExpectConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_EXPECT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ExpectConfig {
    /// Create a config with timeout
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Read once, never wait
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            timeout: Duration::ZERO,
            poll_interval: Duration::ZERO,
        }
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Creates an expectation for a bound element
pub fn expect<'a, P: PageDriver + ?Sized>(element: BoundElement<'a, P>) -> Expect<'a, P> {
    Expect {
        element,
        config: ExpectConfig::default(),
    }
}

/// Expectation wrapping a bound element
#[derive(Debug)]
pub struct Expect<'a, P: ?Sized> {
    element: BoundElement<'a, P>,
    config: ExpectConfig,
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[allow(clippy::wrong_self_convention)]
impl<'a, P: PageDriver + ?Sized> Expect<'a, P> {
    /// Use a specific polling config
    #[must_use]
    pub const fn with_config(mut self, config: ExpectConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Asserts that the element is visible
    pub async fn to_be_visible(self) -> AssertionCheckResult {
        let locator = self.element.locator();
        self.poll(|| async {
            self.element.is_visible().await.map(|visible| {
                if visible {
                    None
                } else {
                    Some(format!("expected {locator} to be visible"))
                }
            })
        })
        .await
    }

    /// Asserts that the element's text contains `expected` (whitespace-normalized)
    pub async fn to_contain_text(self, expected: &str) -> AssertionCheckResult {
        let locator = self.element.locator();
        let needle = normalize_whitespace(expected);
        self.poll(|| async {
            self.element.text_content().await.map(|text| {
                let actual = normalize_whitespace(text.as_deref().unwrap_or_default());
                if actual.contains(&needle) {
                    None
                } else {
                    Some(format!(
                        "expected {locator} to contain text '{needle}', got '{actual}'"
                    ))
                }
            })
        })
        .await
    }

    /// Asserts that the element exposes `name="value"`
    pub async fn to_have_attribute(self, name: &str, value: &str) -> AssertionCheckResult {
        let locator = self.element.locator();
        self.poll(|| async {
            self.element.get_attribute(name).await.map(|actual| {
                if actual.as_deref() == Some(value) {
                    None
                } else {
                    Some(format!(
                        "expected {locator} to have {name}=\"{value}\", got {actual:?}"
                    ))
                }
            })
        })
        .await
    }

    /// Read until `probe` reports no mismatch. Transient driver errors (nothing
    /// matched yet) are polled through; any other driver error fails at once.
    async fn poll<F, Fut>(&self, probe: F) -> AssertionCheckResult
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = SiteCheckResult<Option<String>>>,
    {
        let start = Instant::now();
        loop {
            let failure = match probe().await {
                Ok(None) => return AssertionCheckResult::Pass,
                Ok(Some(mismatch)) => mismatch,
                Err(err) if err.is_transient() => err.to_string(),
                Err(err) => return AssertionCheckResult::Fail(err.to_string()),
            };

            if start.elapsed() >= self.config.timeout {
                tracing::debug!(locator = %self.element.locator(), %failure, "expectation timed out");
                return AssertionCheckResult::Fail(failure);
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}
