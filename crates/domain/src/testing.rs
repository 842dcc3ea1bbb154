//! Verification steps and run reports.
//!
//! Each step of a run produces one [`StepReport`]; the ordered reports plus a
//! [`RunVerdict`] form the [`RunReport`] that drives output and exit status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named step of the verification sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Backend liveness gate.
    Connectivity,
    /// Session bootstrap gate.
    Authentication,
    /// Insert the test record.
    Create,
    /// Read the test record back.
    Read,
    /// Patch the test record.
    Update,
    /// Delete the test record and confirm it is gone.
    Delete,
    /// Read-only check of the protected collection.
    Access,
    /// Revoke the session.
    Teardown,
}

impl Step {
    /// Label used in the step trace.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connectivity => "Connection",
            Self::Authentication => "Authentication",
            Self::Create => "Create",
            Self::Read => "Read",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Access => "Access",
            Self::Teardown => "Sign out",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of running a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// The step that was run.
    pub step: Step,
    /// Whether the step passed.
    pub passed: bool,
    /// Advisory steps are reported but never fail the run.
    #[serde(default)]
    pub advisory: bool,
    /// Observed value (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
    /// Wall time of the step in milliseconds.
    pub duration_ms: u64,
}

impl StepReport {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(step: Step) -> Self {
        Self {
            step,
            passed: true,
            advisory: false,
            actual: None,
            error: None,
            duration_ms: 0,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(step: Step, actual: impl Into<String>) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::pass(step)
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(step: Step, error: impl Into<String>) -> Self {
        Self {
            passed: false,
            error: Some(error.into()),
            ..Self::pass(step)
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(step: Step, actual: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::fail(step, error)
        }
    }

    /// Marks the step as advisory.
    #[must_use]
    pub const fn advisory(mut self) -> Self {
        self.advisory = true;
        self
    }

    /// Records how long the step took.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// True if this step fails the run.
    #[must_use]
    pub const fn is_blocking_failure(&self) -> bool {
        !self.passed && !self.advisory
    }
}

/// Why a CRUD sequence stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyFailure {
    /// The created row was missing or carried another id.
    #[error("create failed")]
    CreateFailed,
    /// The read-back name did not match what was written.
    #[error("read failed")]
    ReadFailed,
    /// The patched row did not reflect the new name.
    #[error("update failed")]
    UpdateFailed,
    /// The row was still readable after deletion.
    #[error("delete failed")]
    DeleteFailed,
}

impl VerifyFailure {
    /// The step this failure belongs to.
    #[must_use]
    pub const fn step(self) -> Step {
        match self {
            Self::CreateFailed => Step::Create,
            Self::ReadFailed => Step::Read,
            Self::UpdateFailed => Step::Update,
            Self::DeleteFailed => Step::Delete,
        }
    }
}

/// Why a run stopped before the stateful steps.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbortReason {
    /// The connectivity gate failed.
    #[error("no connection")]
    NoConnection,
    /// Signup succeeded but the account awaits out-of-band confirmation.
    #[error("confirmation required for user {subject_id}")]
    ConfirmationRequired {
        /// Id of the unconfirmed user.
        subject_id: String,
    },
    /// No authentication path yielded a session.
    #[error("auth failed")]
    AuthFailed,
}

/// Overall result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum RunVerdict {
    /// Every blocking step passed.
    #[default]
    Passed,
    /// At least one blocking step failed.
    Failed,
    /// A gate failed; stateful steps did not run.
    Aborted {
        /// Why the run stopped.
        reason: AbortReason,
    },
}

impl RunVerdict {
    /// True only for [`RunVerdict::Passed`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Ordered step results of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Backend base URL.
    pub target: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Step results in execution order.
    pub steps: Vec<StepReport>,
    /// Final verdict.
    pub verdict: RunVerdict,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Starts an empty report.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            started_at: Utc::now(),
            steps: Vec::new(),
            verdict: RunVerdict::Passed,
            duration_ms: 0,
        }
    }

    /// Appends a step result.
    pub fn record(&mut self, report: StepReport) {
        self.steps.push(report);
    }

    /// Appends several step results.
    pub fn extend(&mut self, reports: impl IntoIterator<Item = StepReport>) {
        self.steps.extend(reports);
    }

    /// Closes the report as aborted.
    #[must_use]
    pub fn abort(mut self, reason: AbortReason, duration_ms: u64) -> Self {
        self.verdict = RunVerdict::Aborted { reason };
        self.duration_ms = duration_ms;
        self
    }

    /// Closes the report with a verdict derived from the recorded steps.
    #[must_use]
    pub fn conclude(mut self, duration_ms: u64) -> Self {
        self.verdict = if self.steps.iter().any(StepReport::is_blocking_failure) {
            RunVerdict::Failed
        } else {
            RunVerdict::Passed
        };
        self.duration_ms = duration_ms;
        self
    }

    /// Number of passed steps.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.steps.iter().filter(|s| s.passed).count()
    }

    /// Number of failed steps, advisory ones included.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.steps.len() - self.passed()
    }

    /// Looks up the report of a step.
    #[must_use]
    pub fn step(&self, step: Step) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.step == step)
    }
}
