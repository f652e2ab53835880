//! Error types for the episode organizer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the episode organizer.
#[derive(Error, Debug)]
pub enum Error {
    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("File already exists: {0}")]
    FileAlreadyExists(String),

    #[error("Cannot hard link across devices: {from} -> {to}")]
    CrossDeviceLink { from: String, to: String },

    #[error("Checksum mismatch after copying: {0}")]
    ChecksumMismatch(String),

    // Parse errors
    #[error("could not parse episode: {0}")]
    EpisodeParse(String),

    #[error("Not a season directory: {0}")]
    NotASeason(String),

    #[error("Target {target} is season {target_season} but {source_path} is season {season}")]
    SeasonMismatch {
        source_path: String,
        target: String,
        target_season: u32,
        season: u32,
    },

    // Archive errors
    #[error("Failed to read archive {path}: {source}")]
    ArchiveRead {
        path: String,
        #[source]
        source: unrar::error::UnrarError,
    },

    // Configuration errors
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // Plan/Execute errors
    #[error("Invalid job file: {0}")]
    InvalidJobFile(String),

    #[error("no media found in {0:?}")]
    NoMediaFound(Vec<String>),

    #[error("{count} jobs failed; see {path} for details")]
    JobsFailed { count: usize, path: String },

    #[error("Execute operation failed: {0}")]
    Execute(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an unrar error raised while reading `path`.
    pub fn archive_read(path: &std::path::Path, source: unrar::error::UnrarError) -> Self {
        Error::ArchiveRead {
            path: path.display().to_string(),
            source,
        }
    }
}
