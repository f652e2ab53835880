//! Command line argument definitions.

use crate::models::job::Action;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Episode Organizer - sort episodes into season directories
#[derive(Parser, Debug)]
#[command(name = "episode-organizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: <config dir>/episode_organizer/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan sources and organize episodes into the target
    Organize {
        /// Directory to collect episodes from (repeatable)
        #[arg(short, long = "source", value_name = "DIR", required = true)]
        sources: Vec<PathBuf>,

        /// Show directory (or season directory) to organize into
        #[arg(short, long, value_name = "DIR")]
        target: PathBuf,

        /// How items are placed at the target
        #[arg(short, long, value_enum, default_value_t = Mode::Move)]
        mode: Mode,

        /// Dry run - print the planned jobs without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Save the planned jobs to this file before executing
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Execute a saved job list
    Execute {
        /// Path to a job list written with `organize --output`
        #[arg(value_name = "JOBS_FILE")]
        jobs_file: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },
}

/// Options controlling job execution.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Run jobs one at a time
    #[arg(long)]
    pub serial: bool,

    /// Maximum number of parallel workers
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Where to write failed jobs (default: failed.json)
    #[arg(long, value_name = "FILE")]
    pub failed: Option<PathBuf>,
}

/// Placement mode.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Copy,
    Link,
    Move,
}

impl From<Mode> for Action {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Copy => Action::Copy,
            Mode::Link => Action::Link,
            Mode::Move => Action::Move,
        }
    }
}
