//! Directory scanner module.
//!
//! Walks source directories for media items: video files directly, and
//! archives that are the first volume of their set and hold a video file.
//! Only season directories are descended into.

use crate::core::archive::ArchiveInspector;
use crate::core::classifier::PathClassifier;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Recursive media discoverer.
#[derive(Debug, Clone)]
pub struct MediaScanner {
    inspector: ArchiveInspector,
}

impl MediaScanner {
    pub fn new(classifier: PathClassifier) -> Self {
        Self {
            inspector: ArchiveInspector::new(classifier),
        }
    }

    fn classifier(&self) -> &PathClassifier {
        self.inspector.classifier()
    }

    /// Discover media items under `root`, depth-first in listing order.
    ///
    /// The root itself is always scanned; below it only season directories
    /// are entered. A missing or non-directory root yields no items.
    pub fn discover(&self, root: &Path) -> Vec<PathBuf> {
        if !root.is_dir() {
            tracing::debug!("Not a directory, nothing to scan: {:?}", root);
            return Vec::new();
        }

        let mut files_scanned = 0usize;
        let mut items = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_enter(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            files_scanned += 1;

            if self.is_media_item(entry.path()) {
                items.push(entry.into_path());
            }
        }

        tracing::info!(
            "Scanned {} files under {:?}: {} media items",
            files_scanned,
            root,
            items.len()
        );

        items
    }

    /// Discover media items under each root in turn.
    pub fn discover_all<P: AsRef<Path>>(&self, roots: &[P]) -> Vec<PathBuf> {
        roots
            .iter()
            .flat_map(|root| self.discover(root.as_ref()))
            .collect()
    }

    /// Directories below the root are only entered when season-like.
    fn should_enter(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        let season = self.classifier().classify_directory(entry.path()).is_season();
        if !season {
            tracing::debug!("Skipping non-season directory: {:?}", entry.path());
        }
        season
    }

    /// Check if a regular file is an organizable media item.
    fn is_media_item(&self, path: &Path) -> bool {
        if self.classifier().is_media_file(path) {
            return true;
        }
        if !self.classifier().is_archive(path) {
            return false;
        }

        match self.inspector.qualifies(path) {
            Ok(qualifies) => {
                if !qualifies {
                    tracing::debug!("Archive is not a first volume with media: {:?}", path);
                }
                qualifies
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable archive {:?}: {}", path, e);
                false
            }
        }
    }
}
