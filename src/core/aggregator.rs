//! Result aggregation.
//!
//! Collects job outcomes into per-directory counts, failure records and
//! skipped records. Fed from a single consumer loop.

use crate::models::job::{FailureRecord, FailureReport, JobOutcome, OutcomeStatus, SkippedRecord};
use crate::Result;
use chrono::Utc;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Final result of a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Items placed per target directory.
    pub directory_counts: BTreeMap<PathBuf, usize>,
    /// Failed jobs, in arrival order.
    pub failures: Vec<FailureRecord>,
    /// Jobs that had nothing to do.
    pub skipped: Vec<SkippedRecord>,
}

impl RunSummary {
    /// Total number of items placed.
    pub fn total_placed(&self) -> usize {
        self.directory_counts.values().sum()
    }

    /// Total number of outcomes recorded.
    pub fn processed(&self) -> usize {
        self.total_placed() + self.failures.len() + self.skipped.len()
    }
}

/// Order-insensitive outcome accumulator.
#[derive(Debug, Default)]
pub struct Aggregator {
    summary: RunSummary,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome.
    pub fn record(&mut self, outcome: JobOutcome) {
        let JobOutcome { job, status } = outcome;
        match status {
            OutcomeStatus::Placed => {
                *self
                    .summary
                    .directory_counts
                    .entry(job.target_dir())
                    .or_insert(0) += 1;
            }
            OutcomeStatus::Skipped { reason } => {
                self.summary.skipped.push(SkippedRecord { job, reason });
            }
            OutcomeStatus::Failed { error } => {
                self.summary.failures.push(FailureRecord { job, error });
            }
        }
    }

    /// Number of outcomes recorded so far.
    pub fn processed(&self) -> usize {
        self.summary.processed()
    }

    pub fn finish(self) -> RunSummary {
        self.summary
    }
}

/// Write failed jobs to a JSON failure log.
pub fn save_failures(failures: &[FailureRecord], path: &Path) -> Result<()> {
    let report = FailureReport {
        generated_at: Utc::now().to_rfc3339(),
        failures: failures.to_vec(),
    };
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    tracing::info!("Failure log saved to {:?}", path);
    Ok(())
}
