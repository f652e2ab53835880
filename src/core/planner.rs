//! Job planning module.
//!
//! Pairs discovered media items with their derived target paths and the
//! configured action, and persists job lists as JSON.

use crate::core::parser::EpisodeParser;
use crate::models::job::{Action, Job};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// An item whose episode could not be determined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresolvedItem {
    /// Source path.
    pub source: PathBuf,
    /// Reason for failure.
    pub reason: String,
}

/// Jobs built from a set of discovered items.
#[derive(Debug, Clone, Default)]
pub struct JobPlan {
    /// Jobs in discovery order.
    pub jobs: Vec<Job>,
    /// Items skipped because no episode could be parsed.
    pub unresolved: Vec<UnresolvedItem>,
}

/// Build one job per item that resolves to a target path.
///
/// Items whose episode cannot be parsed are collected in
/// [`JobPlan::unresolved`] and planning continues. A season mismatch with a
/// season-like `target_root` aborts planning.
pub fn build_jobs(
    items: &[PathBuf],
    target_root: &Path,
    action: Action,
    parser: &EpisodeParser,
) -> Result<JobPlan> {
    let mut plan = JobPlan::default();

    for source in items {
        match parser.derive_target_path(source, target_root) {
            Ok(target) => {
                tracing::debug!("Planned {} {:?} -> {:?}", action, source, target);
                plan.jobs.push(Job::new(action, source.clone(), target));
            }
            Err(e @ crate::Error::EpisodeParse(_)) => {
                tracing::warn!("{}", e);
                plan.unresolved.push(UnresolvedItem {
                    source: source.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Planned {} jobs ({} unresolved items)",
        plan.jobs.len(),
        plan.unresolved.len()
    );

    Ok(plan)
}

/// Save a job list to a JSON file.
pub fn save_jobs(jobs: &[Job], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(jobs)?;

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    tracing::info!("Job list saved to {:?}", path);
    Ok(())
}

/// Load a job list from a JSON file.
pub fn load_jobs(path: &Path) -> Result<Vec<Job>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| crate::Error::InvalidJobFile(format!("{}: {}", path.display(), e)))
}
