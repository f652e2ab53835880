//! Episode and season parsing.
//!
//! Extracts season/episode numbers from file names and derives the
//! canonical `season NN/sNNeNN.ext` target path for an item.

use crate::core::classifier::{compile_pattern, DirectoryKind, PathClassifier};
use crate::models::config::MediaConfig;
use crate::Result;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Season and episode numbers parsed from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonEpisode {
    pub season: u32,
    pub episode: u32,
}

impl std::fmt::Display for SeasonEpisode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{:02}e{:02}", self.season, self.episode)
    }
}

/// Pattern-based episode parser.
#[derive(Debug, Clone)]
pub struct EpisodeParser {
    classifier: PathClassifier,
    episode_patterns: Vec<Regex>,
}

impl EpisodeParser {
    /// Compile a parser from configuration.
    pub fn new(config: &MediaConfig) -> Result<Self> {
        Ok(Self {
            classifier: PathClassifier::new(config)?,
            episode_patterns: config
                .episode_patterns
                .iter()
                .map(|p| compile_pattern(p, 2))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    /// Parse season and episode from a file's base name.
    ///
    /// Patterns are tried in order; the first match wins. Episode 0 is a
    /// valid episode (specials, pilots).
    pub fn parse_episode(&self, path: &Path) -> Result<SeasonEpisode> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let unparsed = || crate::Error::EpisodeParse(path.display().to_string());

        let caps = self
            .episode_patterns
            .iter()
            .find_map(|re| re.captures(&name))
            .ok_or_else(unparsed)?;

        let number = |group: usize| -> Result<u32> {
            caps.get(group)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(unparsed)
        };

        Ok(SeasonEpisode {
            season: number(1)?,
            episode: number(2)?,
        })
    }

    /// Parse the season number from a season directory name.
    pub fn parse_season_number(&self, name: &str) -> Result<u32> {
        self.classifier
            .season_number(name)
            .ok_or_else(|| crate::Error::NotASeason(name.to_string()))
    }

    /// Derive the target path of `source` under `target_root`.
    ///
    /// A season-like target root is used as-is and must carry the parsed
    /// season; any other root gets a `season NN` directory appended.
    pub fn derive_target_path(&self, source: &Path, target_root: &Path) -> Result<PathBuf> {
        let parsed = self.parse_episode(source)?;

        let season_dir = match self.classifier.classify_directory(target_root) {
            DirectoryKind::Season(target_season) => {
                if target_season != parsed.season {
                    return Err(crate::Error::SeasonMismatch {
                        source_path: source.display().to_string(),
                        target: target_root.display().to_string(),
                        target_season,
                        season: parsed.season,
                    });
                }
                target_root.to_path_buf()
            }
            DirectoryKind::Plain => target_root.join(season_dir_name(parsed.season)),
        };

        let ext = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Ok(season_dir.join(format!("{}{}", parsed, ext)))
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }
}

/// Canonical season directory name (`season 01`).
pub fn season_dir_name(season: u32) -> String {
    format!("season {:02}", season)
}
