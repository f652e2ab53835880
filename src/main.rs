//! Episode Organizer CLI
//!
//! Sorts episodic video files into `season NN/sNNeNN.ext` directories.

use anyhow::Context;
use clap::Parser;
use episode_organizer::cli::{
    args::{Cli, Commands},
    commands::{execute, organize},
};
use episode_organizer::models::config;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = match cli.config.as_deref() {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => config::load_config(),
    };

    // Run the appropriate command
    match cli.command {
        Commands::Organize {
            sources,
            target,
            mode,
            dry_run,
            output,
            run,
        } => {
            let options = organize::OrganizeOptions {
                sources,
                target,
                action: mode.into(),
                dry_run,
                output,
                run,
            };
            organize::organize(&config, &options).await?;
        }

        Commands::Execute { jobs_file, run } => {
            execute::execute_jobs_file(&config, &jobs_file, &run).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
///
/// The console only shows warnings unless `--verbose` is given; a log file
/// records every placement.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("episode_organizer=debug")
    } else if log_file.is_some() {
        EnvFilter::new("episode_organizer=info")
    } else {
        EnvFilter::new("episode_organizer=warn")
    };

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(std::sync::Mutex::new(file)))
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .without_time()
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    }

    Ok(())
}
