//! Writing generated sources without touching unchanged files.

use std::path::Path;

use super::error::Result;

/// What [`write_if_changed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or its content replaced.
    Written,
    /// The file already held identical content.
    Unchanged,
}

/// Whether `path` already holds exactly `contents`.
///
/// A missing file is not up to date.
pub fn is_up_to_date(path: &Path, contents: &str) -> Result<bool> {
    match std::fs::read(path) {
        Ok(existing) => Ok(existing == contents.as_bytes()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Write `contents` to `path` unless it is already there.
///
/// Leaving the file alone keeps its mtime, so build systems that track it do
/// not rebuild dependents.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<WriteOutcome> {
    if is_up_to_date(path, contents)? {
        tracing::debug!(path = %path.display(), "output unchanged");
        return Ok(WriteOutcome::Unchanged);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;

    tracing::info!(path = %path.display(), "wrote version info");
    Ok(WriteOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_new_file_with_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("include").join("foo").join("version_info.h");

        assert_eq!(write_if_changed(&path, "abc").unwrap(), WriteOutcome::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abc");
    }

    #[test]
    fn identical_content_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.h");
        std::fs::write(&path, "abc").unwrap();

        assert!(is_up_to_date(&path, "abc").unwrap());
        assert_eq!(write_if_changed(&path, "abc").unwrap(), WriteOutcome::Unchanged);
    }

    #[test]
    fn different_content_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.h");
        std::fs::write(&path, "old").unwrap();

        assert!(!is_up_to_date(&path, "new").unwrap());
        assert_eq!(write_if_changed(&path, "new").unwrap(), WriteOutcome::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn missing_file_is_stale() {
        let dir = TempDir::new().unwrap();
        assert!(!is_up_to_date(&dir.path().join("missing.h"), "").unwrap());
    }
}
