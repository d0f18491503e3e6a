//! Test reporting: named steps, annotations and the per-test JSON report.

use crate::assertion::{AssertionSummary, CheckOutcome, SoftAssertions};
use crate::driver::BrowserInfo;
use crate::result::{SiteCheckError, SiteCheckResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Key/value annotation attached to a test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation type (e.g., "browser")
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form description
    pub description: String,
}

/// Step status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step body returned `Ok`
    Passed,
    /// Step body returned an error
    Failed,
}

/// One executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step title
    pub title: String,
    /// Outcome
    pub status: StepStatus,
    /// Error message of a failed step
    pub error: Option<String>,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Per-test reporting context
#[derive(Debug, Clone)]
pub struct TestInfo {
    title: String,
    started_at: DateTime<Utc>,
    annotations: Vec<Annotation>,
    steps: Vec<StepRecord>,
    checks: Vec<CheckOutcome>,
}

impl TestInfo {
    /// Start reporting for test `title`
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            started_at: Utc::now(),
            annotations: Vec::new(),
            steps: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Test title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Add an annotation
    pub fn annotate(&mut self, kind: impl Into<String>, description: impl Into<String>) {
        let annotation = Annotation {
            kind: kind.into(),
            description: description.into(),
        };
        info!(test = %self.title, kind = %annotation.kind, description = %annotation.description, "annotation");
        self.annotations.push(annotation);
    }

    /// Annotate the test with the browser engine and version
    pub fn annotate_browser(&mut self, browser: &BrowserInfo) {
        self.annotate("browser", browser.to_string());
    }

    /// Run `body` as a named step. The step is recorded whether it passes or not;
    /// its error is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error of `body`
    pub async fn step<T, F>(&mut self, title: impl Into<String>, body: F) -> SiteCheckResult<T>
    where
        F: Future<Output = SiteCheckResult<T>>,
    {
        let title = title.into();
        let started_at = Utc::now();
        let start = Instant::now();
        info!(test = %self.title, step = %title, "step started");

        let result = body.await;

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let (status, error) = match &result {
            Ok(_) => (StepStatus::Passed, None),
            Err(err) => {
                warn!(test = %self.title, step = %title, error = %err, "step failed");
                (StepStatus::Failed, Some(err.to_string()))
            }
        };
        self.steps.push(StepRecord {
            title,
            status,
            error,
            started_at,
            duration_ms,
        });
        result
    }

    /// Annotations in insertion order
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Steps in execution order
    #[must_use]
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Soft checks collected by [`TestInfo::finish`]
    #[must_use]
    pub fn checks(&self) -> &[CheckOutcome] {
        &self.checks
    }

    /// End of test: move the soft outcomes into the report and fail if any of
    /// them failed
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::SoftAssertionsFailed`] listing every soft
    /// failure in call order
    pub fn finish(&mut self, soft: &mut SoftAssertions) -> SiteCheckResult<()> {
        let verdict = soft.verify();
        self.checks.extend(soft.take());
        info!(test = %self.title, checks = self.checks.len(), passed = verdict.is_ok(), "test finished");
        verdict.map_err(SiteCheckError::from)
    }

    /// Like [`finish`](Self::finish), for a body that may have stopped on a
    /// hard failure. The soft outcomes are always kept; the hard error wins
    /// over the soft verdict.
    ///
    /// # Errors
    ///
    /// Returns `outcome`'s error, otherwise the soft verdict
    pub fn finish_with(
        &mut self,
        soft: &mut SoftAssertions,
        outcome: SiteCheckResult<()>,
    ) -> SiteCheckResult<()> {
        let verdict = self.finish(soft);
        outcome.and(verdict)
    }

    /// Snapshot of the report
    #[must_use]
    pub fn report(&self) -> TestReport {
        let failed = self.checks.iter().filter(|c| !c.passed).count();
        let summary = AssertionSummary {
            total: self.checks.len(),
            passed: self.checks.len() - failed,
            failed,
        };
        let passed = failed == 0 && self.steps.iter().all(|s| s.status == StepStatus::Passed);
        TestReport {
            title: self.title.clone(),
            started_at: self.started_at,
            finished_at: Utc::now(),
            passed,
            annotations: self.annotations.clone(),
            steps: self.steps.clone(),
            checks: self.checks.clone(),
            summary,
        }
    }
}

/// Serializable per-test report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Test title
    pub title: String,
    /// Start time
    pub started_at: DateTime<Utc>,
    /// Time the report was produced
    pub finished_at: DateTime<Utc>,
    /// No failed step and no failed check
    pub passed: bool,
    /// Annotations
    pub annotations: Vec<Annotation>,
    /// Steps
    pub steps: Vec<StepRecord>,
    /// Soft checks
    pub checks: Vec<CheckOutcome>,
    /// Check counts
    pub summary: AssertionSummary,
}

impl TestReport {
    /// Pretty JSON
    ///
    /// # Errors
    ///
    /// Returns a serialization error
    pub fn to_json(&self) -> SiteCheckResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an I/O or serialization error
    pub fn write_json(&self, path: impl AsRef<Path>) -> SiteCheckResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
