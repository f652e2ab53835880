//! Path classification.
//!
//! Decides whether a directory is a season directory and whether a file is
//! a media item or an archive, purely from names and extensions.

use crate::models::config::MediaConfig;
use crate::utils::fs::get_extension;
use crate::Result;
use regex::Regex;
use std::path::Path;

/// Classification of a directory by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// Season directory with its season number.
    Season(u32),
    /// Any other directory.
    Plain,
}

impl DirectoryKind {
    pub fn is_season(&self) -> bool {
        matches!(self, DirectoryKind::Season(_))
    }
}

/// Name-based classifier built from the media configuration.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    media_extensions: Vec<String>,
    archive_extension: String,
    season_patterns: Vec<Regex>,
}

impl PathClassifier {
    /// Compile a classifier from configuration.
    pub fn new(config: &MediaConfig) -> Result<Self> {
        let season_patterns = config
            .season_patterns
            .iter()
            .map(|p| compile_pattern(p, 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            media_extensions: config
                .media_extensions
                .iter()
                .map(|e| normalize_extension(e))
                .collect(),
            archive_extension: normalize_extension(&config.archive_extension),
            season_patterns,
        })
    }

    /// Classify a directory by its base name.
    pub fn classify_directory(&self, path: &Path) -> DirectoryKind {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        match self.season_number(&name) {
            Some(season) => DirectoryKind::Season(season),
            None => DirectoryKind::Plain,
        }
    }

    /// Season number encoded in a directory name, first matching pattern wins.
    pub fn season_number(&self, name: &str) -> Option<u32> {
        self.season_patterns.iter().find_map(|re| {
            re.captures(name)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
    }

    /// Check if a file has a recognized video extension.
    pub fn is_media_file(&self, path: &Path) -> bool {
        get_extension(path)
            .map(|ext| self.media_extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// Check if a file carries the archive extension.
    pub fn is_archive(&self, path: &Path) -> bool {
        get_extension(path)
            .map(|ext| ext == self.archive_extension)
            .unwrap_or(false)
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Compile a pattern that must expose at least `groups` capture groups.
pub(crate) fn compile_pattern(pattern: &str, groups: usize) -> Result<Regex> {
    let re = Regex::new(pattern).map_err(|e| crate::Error::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    // captures_len counts the implicit whole-match group
    if re.captures_len() <= groups {
        return Err(crate::Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: format!("expected {} capture group(s)", groups),
        });
    }

    Ok(re)
}
