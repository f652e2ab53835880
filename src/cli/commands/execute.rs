//! Execute command implementation.
//!
//! Runs a job list (freshly planned or loaded from a file), shows progress,
//! prints the per-directory summary and writes the failure log.

use crate::cli::args::RunArgs;
use crate::core::aggregator::{self, RunSummary};
use crate::core::executor::{ExecutionMode, Executor, ExecutorConfig};
use crate::core::parser::EpisodeParser;
use crate::core::planner;
use crate::models::config::Config;
use crate::models::job::Job;
use crate::utils::fs::file_name;
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Execute a saved job list.
pub async fn execute_jobs_file(config: &Config, jobs_file: &Path, run: &RunArgs) -> Result<()> {
    println!("{}", "[EXEC] Loading job list...".bold().cyan());
    if !jobs_file.exists() {
        return Err(crate::Error::PathNotFound(jobs_file.display().to_string()));
    }

    let jobs = planner::load_jobs(jobs_file)?;
    println!("  {} {}", "Jobs:".bold(), jobs.len());

    let parser = EpisodeParser::new(&config.media)?;
    run_jobs(config, &parser, jobs, run).await
}

/// Run jobs and report the result.
///
/// Returns [`crate::Error::JobsFailed`] after writing the failure log when
/// any job failed.
pub async fn run_jobs(
    config: &Config,
    parser: &EpisodeParser,
    jobs: Vec<Job>,
    run: &RunArgs,
) -> Result<()> {
    if jobs.is_empty() {
        println!("Nothing to organize.");
        return Ok(());
    }

    let mut executor_config = ExecutorConfig::from(config.executor.clone());
    if let Some(workers) = run.workers {
        executor_config.max_workers = workers;
    }
    let executor = Executor::with_config(parser.clone(), executor_config);
    let mode = if run.serial {
        ExecutionMode::Serial
    } else {
        ExecutionMode::Parallel
    };

    println!();
    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} Organizing [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let summary = executor
        .run(jobs, mode, |outcome| {
            pb.set_message(file_name(&outcome.job.target));
            pb.inc(1);
        })
        .await?;

    pb.finish_with_message("Done!");
    println!();

    print_summary(&summary);

    if !summary.failures.is_empty() {
        let path = run
            .failed
            .clone()
            .unwrap_or_else(|| config.failure_log_path());
        aggregator::save_failures(&summary.failures, &path)?;
        return Err(crate::Error::JobsFailed {
            count: summary.failures.len(),
            path: path.display().to_string(),
        });
    }

    Ok(())
}

/// Print the directory table, skipped jobs and failure count.
fn print_summary(summary: &RunSummary) {
    if summary.directory_counts.is_empty() {
        println!("{}", "No media items added".yellow());
    } else {
        let header = format!("Added {} media items", summary.total_placed());
        println!("{}", header.bold().green());

        let width = summary
            .directory_counts
            .keys()
            .map(|d| d.display().to_string().len())
            .max()
            .unwrap_or(0)
            .max("Directory".len());

        println!("  {:<width$}  {}", "Directory".bold(), "Items Added".bold(), width = width);
        for (dir, count) in &summary.directory_counts {
            println!("  {:<width$}  {:>11}", dir.display(), count, width = width);
        }
    }

    if !summary.skipped.is_empty() {
        println!();
        println!("{}", "[Skipped]".bold().yellow());
        for skipped in &summary.skipped {
            println!("  {} - {}", skipped.job.source.display(), skipped.reason);
        }
    }

    if !summary.failures.is_empty() {
        println!();
        println!(
            "{} {}",
            "[FAILED]".bold().red(),
            format!("{} jobs failed", summary.failures.len()).red()
        );
    }
}
