//! File system utilities.

use crate::utils::hash;
use crate::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Create a directory and all parent directories.
///
/// Safe to race: a directory created concurrently by another worker is not
/// an error.
pub fn create_dir_all(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Copy a file, overwriting the target.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)?;
    Ok(())
}

/// Create a hard link at `to` pointing at `from`.
pub fn link_file(from: &Path, to: &Path) -> Result<()> {
    match fs::hard_link(from, to) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => Err(crate::Error::CrossDeviceLink {
            from: from.display().to_string(),
            to: to.display().to_string(),
        }),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(crate::Error::FileAlreadyExists(to.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Move a file from one location to another.
///
/// Refuses to replace an existing target. Falls back to copy + delete when
/// the rename crosses filesystems, verifying the copy when `verify` is set.
pub fn move_file(from: &Path, to: &Path, verify: bool) -> Result<()> {
    if to.exists() {
        return Err(crate::Error::FileAlreadyExists(to.display().to_string()));
    }

    // Try rename first (fast, same filesystem)
    match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) if is_cross_device(&e) => {
            tracing::debug!("Cross-filesystem move detected, using copy+delete");
        }
        Err(e) => return Err(e.into()),
    }

    let checksum = if verify {
        Some(hash::sha256_file(from)?)
    } else {
        None
    };

    fs::copy(from, to)?;

    if let Some(original) = checksum {
        let copied = hash::sha256_file(to)?;
        if original != copied {
            // Remove incomplete copy
            let _ = fs::remove_file(to);
            return Err(crate::Error::ChecksumMismatch(to.display().to_string()));
        }
    }

    fs::remove_file(from)?;
    Ok(())
}

/// Whether an IO error is the EXDEV "crosses devices" failure.
fn is_cross_device(e: &std::io::Error) -> bool {
    // EXDEV is 18 on Linux and macOS
    e.kind() == ErrorKind::CrossesDevices || e.raw_os_error() == Some(18)
}

/// Get file extension in lowercase.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Get the file name of a path as a string.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_get_extension() {
        assert_eq!(get_extension(&PathBuf::from("a/Show.S01E01.MKV")), Some("mkv".to_string()));
        assert_eq!(get_extension(&PathBuf::from("a/README")), None);
    }

    #[test]
    fn test_create_dir_all_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("show").join("season 01");

        create_dir_all(&dir).unwrap();
        create_dir_all(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_create_dir_all_under_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        assert!(create_dir_all(&blocker.join("season 01")).is_err());
    }

    #[test]
    fn test_move_file_refuses_existing_target() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.mkv");
        let to = temp_dir.path().join("b.mkv");
        fs::write(&from, "a").unwrap();
        fs::write(&to, "b").unwrap();

        let err = move_file(&from, &to, true).unwrap_err();
        assert!(matches!(err, crate::Error::FileAlreadyExists(_)));
        assert!(from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "b");
    }

    #[test]
    fn test_link_file_existing_target() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.mkv");
        let to = temp_dir.path().join("b.mkv");
        fs::write(&from, "a").unwrap();
        fs::write(&to, "b").unwrap();

        let err = link_file(&from, &to).unwrap_err();
        assert!(matches!(err, crate::Error::FileAlreadyExists(_)));
    }
}
