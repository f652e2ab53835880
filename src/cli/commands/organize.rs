//! Organize command implementation.
//!
//! Collects media from the sources, plans one job per episode and runs the
//! jobs (or prints them on a dry run).

use crate::cli::args::RunArgs;
use crate::cli::commands::execute;
use crate::core::parser::EpisodeParser;
use crate::core::planner;
use crate::core::scanner::MediaScanner;
use crate::models::config::Config;
use crate::models::job::{Action, Job};
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options of a single organize run.
#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    pub sources: Vec<PathBuf>,
    pub target: PathBuf,
    pub action: Action,
    pub dry_run: bool,
    pub output: Option<PathBuf>,
    pub run: RunArgs,
}

/// Execute the organize command.
pub async fn organize(config: &Config, options: &OrganizeOptions) -> Result<()> {
    let parser = EpisodeParser::new(&config.media)?;
    let scanner = MediaScanner::new(parser.classifier().clone());

    let roots = options
        .sources
        .iter()
        .map(std::path::absolute)
        .collect::<std::io::Result<Vec<_>>>()?;
    let target = std::path::absolute(&options.target)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Collecting media...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let items = scanner.discover_all(&roots);

    spinner.finish_and_clear();

    if items.is_empty() {
        return Err(crate::Error::NoMediaFound(
            options
                .sources
                .iter()
                .map(|s| s.display().to_string())
                .collect(),
        ));
    }

    // Keep stdout clean for the JSON job list on a dry run
    if !options.dry_run {
        println!("  {} {}", "Media found:".bold(), items.len());
        println!("  {} {}", "Target:".bold(), target.display());
        println!("  {} {}", "Mode:".bold(), options.action);
    }

    let plan = planner::build_jobs(&items, &target, options.action, &parser)?;

    for item in &plan.unresolved {
        eprintln!("  {} {}", "[SKIP]".yellow(), item.reason);
    }

    if let Some(output) = options.output.as_deref() {
        save_plan(&plan.jobs, output)?;
    }

    if options.dry_run {
        println!("{}", serde_json::to_string_pretty(&plan.jobs)?);
        return Ok(());
    }

    execute::run_jobs(config, &parser, plan.jobs, &options.run).await
}

fn save_plan(jobs: &[Job], output: &Path) -> Result<()> {
    planner::save_jobs(jobs, output)?;
    eprintln!(
        "{} {}",
        "[OK] Job list saved to:".bold().green(),
        output.display()
    );
    eprintln!(
        "  To run it later: {}",
        format!("episode-organizer execute {}", output.display()).cyan()
    );
    Ok(())
}
