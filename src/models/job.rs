//! Job data model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Filesystem action used to place an item at its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Copy the source, leaving it in place.
    Copy,
    /// Create a hard link to the source.
    Link,
    /// Relocate the source.
    Move,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Copy => write!(f, "copy"),
            Action::Link => write!(f, "link"),
            Action::Move => write!(f, "move"),
        }
    }
}

/// A single planned relocation.
///
/// `source` and `target` are rewritten together when an archive source is
/// materialized into the media file it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Action to perform.
    pub action: Action,
    /// Current source path.
    pub source: PathBuf,
    /// Destination path.
    pub target: PathBuf,
}

impl Job {
    /// Create a new job.
    pub fn new(action: Action, source: PathBuf, target: PathBuf) -> Self {
        Self {
            action,
            source,
            target,
        }
    }

    /// Directory the target is placed in.
    pub fn target_dir(&self) -> PathBuf {
        self.target
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default()
    }
}

/// Result of executing one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The item now exists at the target.
    Placed,
    /// Nothing to do for this job.
    Skipped { reason: String },
    /// The job failed; nothing else was affected.
    Failed { error: String },
}

/// A job paired with its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutcome {
    /// The job as it was executed (after any archive materialization).
    pub job: Job,
    /// What happened.
    pub status: OutcomeStatus,
}

impl JobOutcome {
    pub fn placed(job: Job) -> Self {
        Self {
            job,
            status: OutcomeStatus::Placed,
        }
    }

    pub fn skipped<S: Into<String>>(job: Job, reason: S) -> Self {
        Self {
            job,
            status: OutcomeStatus::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn failed<S: Into<String>>(job: Job, error: S) -> Self {
        Self {
            job,
            status: OutcomeStatus::Failed {
                error: error.into(),
            },
        }
    }

    /// Whether the job placed its item.
    pub fn is_placed(&self) -> bool {
        self.status == OutcomeStatus::Placed
    }
}

/// A failed job and its error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub job: Job,
    pub error: String,
}

/// A job that ended with nothing to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub job: Job,
    pub reason: String,
}

/// Failure log written after a run with failed jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureReport {
    /// Report timestamp (RFC 3339).
    pub generated_at: String,
    /// Failed jobs.
    pub failures: Vec<FailureRecord>,
}
