//! Configuration model.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Recognized media and naming rules.
    pub media: MediaConfig,
    /// Job executor settings.
    pub executor: ExecutorSettings,
    /// Where failed jobs are written after a run.
    pub failure_log: PathBuf,
}

/// Media recognition configuration.
///
/// Extensions are given without the leading dot and compared
/// case-insensitively. Episode patterns must capture the season in group 1
/// and the episode in group 2; season patterns capture the season number in
/// group 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Video file extensions.
    pub media_extensions: Vec<String>,
    /// Extension of the archive format peeked into during discovery.
    pub archive_extension: String,
    /// Episode patterns, tried in order against the file name.
    pub episode_patterns: Vec<String>,
    /// Season directory patterns, tried in order against the directory name.
    pub season_patterns: Vec<String>,
}

/// Executor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Upper bound on parallel workers.
    pub max_workers: usize,
    /// Verify checksums when a move falls back to copy + delete.
    pub verify_checksum: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            media: MediaConfig::default(),
            executor: ExecutorSettings::default(),
            failure_log: PathBuf::from(DEFAULT_FAILURE_LOG),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            media_extensions: vec!["avi".to_string(), "mkv".to_string()],
            archive_extension: "rar".to_string(),
            episode_patterns: vec![
                r"(?i)s(\d+)e(\d+)".to_string(),
                r"(?i)(\d+)x(\d+)".to_string(),
            ],
            season_patterns: vec![
                r"(?i)^season\s*(\d+)$".to_string(),
                r"(?i)^s(\d+)$".to_string(),
            ],
        }
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            max_workers: 64,
            verify_checksum: true,
        }
    }
}

/// Default failure log location, relative to the working directory.
pub const DEFAULT_FAILURE_LOG: &str = "failed.json";

impl Config {
    /// Failure log path, falling back to `failed.json` when unset.
    pub fn failure_log_path(&self) -> PathBuf {
        if self.failure_log.as_os_str().is_empty() {
            PathBuf::from(DEFAULT_FAILURE_LOG)
        } else {
            self.failure_log.clone()
        }
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("episode_organizer")
}

/// Load configuration from the user config directory.
///
/// A missing or unreadable file yields the defaults.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    if config_path.exists() {
        match load_config_from(&config_path) {
            Ok(config) => return config,
            Err(e) => {
                tracing::warn!("Ignoring config {:?}: {}", config_path, e);
            }
        }
    }

    Config::default()
}

/// Load configuration from an explicit TOML file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}
