//! Archive materialization.
//!
//! Extracts the media file out of an archive job's source at execution
//! time and points the job at the extracted file.

use crate::core::archive::{enclosed_path, ArchiveInspector};
use crate::core::parser::EpisodeParser;
use crate::models::job::Job;
use crate::utils::fs::create_dir_all;
use crate::Result;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use unrar::error::UnrarError;
use unrar::Archive;

/// Extracts archive jobs into their media file.
#[derive(Debug, Clone)]
pub struct Materializer {
    inspector: ArchiveInspector,
    parser: EpisodeParser,
}

impl Materializer {
    pub fn new(parser: EpisodeParser) -> Self {
        Self {
            inspector: ArchiveInspector::new(parser.classifier().clone()),
            parser,
        }
    }

    /// Check if a job still points at an archive.
    pub fn needs_materialize(&self, job: &Job) -> bool {
        self.inspector.classifier().is_archive(&job.target)
    }

    /// Extract the first media entry of `job.source` next to the archive.
    ///
    /// Returns `false` without touching the disk when the archive holds no
    /// media. On success `job.source` is the extracted file and
    /// `job.target` is re-derived for it inside the original target
    /// directory. When the extracted name carries no episode marker the
    /// archive's identity is kept and only the extension changes.
    ///
    /// An existing file at the extraction path is never replaced; the job
    /// fails with [`crate::Error::FileAlreadyExists`] instead.
    pub fn materialize(&self, job: &mut Job) -> Result<bool> {
        let archive_path = job.source.clone();
        let archive_dir = archive_path.parent().unwrap_or_else(|| Path::new("."));
        let read_error = |e: UnrarError| crate::Error::archive_read(&archive_path, e);

        let mut archive = Archive::new(&archive_path)
            .open_for_processing()
            .map_err(read_error)?;

        let extract_path = loop {
            let Some(header) = archive.read_header().map_err(read_error)? else {
                tracing::warn!("No media in archive: {:?}", archive_path);
                return Ok(false);
            };

            if !self.inspector.is_media_entry(header.entry()) {
                archive = header.skip().map_err(read_error)?;
                continue;
            }

            let relative = enclosed_path(&header.entry().filename).ok_or_else(|| {
                crate::Error::Execute(format!(
                    "Archive entry escapes its directory: {} in {}",
                    header.entry().filename.display(),
                    archive_path.display()
                ))
            })?;
            let extract_path = archive_dir.join(relative);

            tracing::info!("extract {:?} -> {:?}", archive_path, extract_path);
            if let Some(parent) = extract_path.parent() {
                create_dir_all(parent)?;
            }
            reserve(&extract_path)?;

            if let Err(e) = header.extract_to(&extract_path) {
                // Drop the reserved placeholder
                let _ = fs::remove_file(&extract_path);
                return Err(read_error(e));
            }
            break extract_path;
        };

        let target_dir = job.target_dir();
        let target = match self.parser.derive_target_path(&extract_path, &target_dir) {
            Ok(target) => target,
            Err(crate::Error::EpisodeParse(_)) => match extract_path.extension() {
                Some(ext) => job.target.with_extension(ext),
                None => job.target.with_extension(""),
            },
            Err(e) => return Err(e),
        };

        job.source = extract_path;
        job.target = target;
        Ok(true)
    }
}

/// Create an empty file at `path`, failing if anything already exists there.
fn reserve(path: &Path) -> Result<()> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(crate::Error::FileAlreadyExists(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
