//! Archive inspection.
//!
//! Peeks into RAR archives without extracting them: whether an archive is
//! the first volume of a split set, and whether it holds a media file.

use crate::core::classifier::PathClassifier;
use crate::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};
use unrar::Archive;

/// Inspects archives found during discovery.
#[derive(Debug, Clone)]
pub struct ArchiveInspector {
    classifier: PathClassifier,
}

impl ArchiveInspector {
    pub fn new(classifier: PathClassifier) -> Self {
        Self { classifier }
    }

    /// Check if an archive is the first volume among its siblings.
    ///
    /// With several archives in the directory, the one with the smallest
    /// trailing number in its stem is first; archives without a trailing
    /// number never are. A lone archive is always first.
    pub fn is_first_volume(&self, path: &Path) -> Result<bool> {
        let Some(dir) = path.parent() else {
            return Ok(false);
        };
        let Some(name) = path.file_name() else {
            return Ok(false);
        };

        let mut archive_count = 0usize;
        let mut volumes = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let sibling = entry.path();
            if !self.classifier.is_archive(&sibling) {
                continue;
            }
            archive_count += 1;

            let stem = sibling
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            if let Some(number) = trailing_number(&stem) {
                volumes.push((number, entry.file_name()));
            }
        }

        let first = match archive_count {
            0 => false,
            1 => true,
            _ => volumes
                .iter()
                .min()
                .is_some_and(|(_, first_name)| first_name.as_os_str() == name),
        };

        tracing::debug!(
            "Archive {:?}: {} archive siblings, first volume: {}",
            path,
            archive_count,
            first
        );
        Ok(first)
    }

    /// Name of the first media entry listed in an archive, if any.
    ///
    /// Only headers are read; nothing is decompressed.
    pub fn first_media_entry(&self, path: &Path) -> Result<Option<PathBuf>> {
        let listing = Archive::new(path)
            .open_for_listing()
            .map_err(|e| crate::Error::archive_read(path, e))?;

        for header in listing {
            let header = header.map_err(|e| crate::Error::archive_read(path, e))?;
            if self.is_media_entry(&header) {
                return Ok(Some(header.filename));
            }
        }
        Ok(None)
    }

    /// Check if an archive's table of contents lists a media file.
    pub fn contains_media(&self, path: &Path) -> Result<bool> {
        Ok(self.first_media_entry(path)?.is_some())
    }

    /// Whether an archive entry is a regular file with a media extension.
    pub fn is_media_entry(&self, header: &unrar::FileHeader) -> bool {
        !header.is_directory() && self.classifier.is_media_file(&header.filename)
    }

    /// Check if an archive should be organized as a media item.
    pub fn qualifies(&self, path: &Path) -> Result<bool> {
        if !self.is_first_volume(path)? {
            return Ok(false);
        }
        self.contains_media(path)
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }
}

/// Relative path of an archive entry, or `None` when it would leave the
/// extraction directory.
pub fn enclosed_path(name: &Path) -> Option<PathBuf> {
    let mut enclosed = PathBuf::new();
    for component in name.components() {
        match component {
            Component::Normal(part) => enclosed.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!enclosed.as_os_str().is_empty()).then_some(enclosed)
}

/// Trailing decimal number of a file stem (`show.part03` -> 3).
fn trailing_number(stem: &str) -> Option<u64> {
    let prefix_len = stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    stem[prefix_len..].parse().ok()
}
