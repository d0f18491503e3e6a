//! Soft Assertions
//!
//! Record every check of a test, pass or fail, without stopping execution.
//! Failures are reported together, in call order, when the test finishes.

use super::AssertionCheckResult;
use serde::{Deserialize, Serialize};

/// One recorded check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Step title the check was reported under
    pub step: String,
    /// Whether the check passed
    pub passed: bool,
    /// Failure message
    pub message: Option<String>,
    /// Index of this check in the sequence
    pub index: usize,
}

/// Soft assertions collector
///
/// ```ignore
/// let mut soft = SoftAssertions::new();
/// page.check_all_visible(&mut soft).await;
/// page.check_all_text(&mut soft).await;
/// soft.verify()?; // every failure from both passes, in order
/// ```
#[derive(Debug, Default, Clone)]
pub struct SoftAssertions {
    outcomes: Vec<CheckOutcome>,
}

impl SoftAssertions {
    /// Create a new soft assertions collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of a check under `step`
    pub fn record(&mut self, step: impl Into<String>, result: AssertionCheckResult) {
        let step = step.into();
        let (passed, message) = match result {
            AssertionCheckResult::Pass => (true, None),
            AssertionCheckResult::Fail(message) => {
                tracing::warn!(%step, %message, "soft assertion failed");
                (false, Some(message))
            }
        };
        self.outcomes.push(CheckOutcome {
            step,
            passed,
            message,
            index: self.outcomes.len(),
        });
    }

    /// Record a custom failure
    pub fn fail(&mut self, step: impl Into<String>, message: impl Into<String>) {
        self.record(step, AssertionCheckResult::Fail(message.into()));
    }

    /// Every recorded check, in call order
    #[must_use]
    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    /// Failed checks, in call order
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    /// Get the number of failures
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Get the total number of assertions checked
    #[must_use]
    pub fn assertion_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if all assertions passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Verify all assertions passed, returning error if any failed
    ///
    /// # Errors
    ///
    /// Returns error containing all failure messages if any assertions failed
    pub fn verify(&self) -> Result<(), SoftAssertionError> {
        if self.all_passed() {
            Ok(())
        } else {
            Err(SoftAssertionError::new(self.failures()))
        }
    }

    /// Drain the recorded outcomes
    pub fn take(&mut self) -> Vec<CheckOutcome> {
        std::mem::take(&mut self.outcomes)
    }

    /// Get a summary of the assertions
    #[must_use]
    pub fn summary(&self) -> AssertionSummary {
        let failed = self.failure_count();
        AssertionSummary {
            total: self.outcomes.len(),
            passed: self.outcomes.len() - failed,
            failed,
        }
    }
}

/// Summary of assertion results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionSummary {
    /// Total assertions checked
    pub total: usize,
    /// Assertions that passed
    pub passed: usize,
    /// Assertions that failed
    pub failed: usize,
}

/// Error type for soft assertion failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftAssertionError {
    /// `step: message` for every failure
    pub failures: Vec<String>,
    /// Number of failed assertions
    pub count: usize,
}

impl SoftAssertionError {
    /// Create a new error from failures
    pub fn new<'a>(failures: impl IntoIterator<Item = &'a CheckOutcome>) -> Self {
        let failures: Vec<String> = failures
            .into_iter()
            .map(|f| {
                format!(
                    "{}: {}",
                    f.step,
                    f.message.as_deref().unwrap_or("assertion failed")
                )
            })
            .collect();
        Self {
            count: failures.len(),
            failures,
        }
    }
}

impl std::fmt::Display for SoftAssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} soft assertion(s) failed:", self.count)?;
        for (i, failure) in self.failures.iter().enumerate() {
            writeln!(f, "  {}. {failure}", i + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for SoftAssertionError {}

#[cfg(test)]
mod tests {
    use super::*;

    mod soft_assertions_basic {
        use super::*;

        #[test]
        fn test_new_creates_empty() {
            let soft = SoftAssertions::new();
            assert!(soft.all_passed());
            assert_eq!(soft.failure_count(), 0);
            assert_eq!(soft.assertion_count(), 0);
            assert!(soft.verify().is_ok());
        }

        #[test]
        fn test_record_pass_and_fail() {
            let mut soft = SoftAssertions::new();
            soft.record("Check Docs element visibility", AssertionCheckResult::Pass);
            soft.record(
                "Check API element visibility",
                AssertionCheckResult::Fail("expected role=link to be visible".into()),
            );

            assert_eq!(soft.assertion_count(), 2);
            assert_eq!(soft.failure_count(), 1);
            assert_eq!(soft.outcomes()[1].index, 1);
            assert!(!soft.outcomes()[1].passed);
        }
    }

    mod verify_tests {
        use super::*;

        #[test]
        fn test_failures_keep_call_order() {
            let mut soft = SoftAssertions::new();
            soft.fail("first", "a");
            soft.record("second", AssertionCheckResult::Pass);
            soft.fail("third", "c");

            let err = soft.verify().unwrap_err();
            assert_eq!(err.count, 2);
            assert_eq!(err.failures, vec!["first: a", "third: c"]);
        }

        #[test]
        fn test_error_display() {
            let mut soft = SoftAssertions::new();
            soft.fail("Check html tag", "expected light");
            let msg = soft.verify().unwrap_err().to_string();
            assert!(msg.starts_with("1 soft assertion(s) failed:"));
            assert!(msg.contains("1. Check html tag: expected light"));
        }

        #[test]
        fn test_summary_and_take() {
            let mut soft = SoftAssertions::new();
            soft.record("a", AssertionCheckResult::Pass);
            soft.fail("b", "x");
            assert_eq!(
                soft.summary(),
                AssertionSummary {
                    total: 2,
                    passed: 1,
                    failed: 1
                }
            );
            assert_eq!(soft.take().len(), 2);
            assert!(soft.all_passed());
        }
    }
}
