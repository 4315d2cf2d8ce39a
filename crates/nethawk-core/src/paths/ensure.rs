//! Directory creation and verification utilities.
//!
//! Provides strategies for creating directories and verifying they are
//! writable. The `DirectoryCreationStrategy` enum does NOT include
//! interactive/prompt variants; adapter code should handle user interaction
//! separately.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::PathError;

/// Strategy for how to handle missing directories when ensuring they exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryCreationStrategy {
    /// Create directories automatically if they are missing.
    #[default]
    AutoCreate,
    /// Do not create directories; return an error if missing.
    Disallow,
}

/// Ensure the provided directory exists according to the chosen strategy.
///
/// If the directory exists, verifies it's actually a directory.
/// If the directory doesn't exist, behavior depends on `strategy`:
/// - `AutoCreate`: Creates the directory (and parents)
/// - `Disallow`: Returns an error
///
/// Idempotent for existing directories, and returns the path unchanged so
/// calls can be chained into a `join`.
pub fn ensure_directory(
    path: &Path,
    strategy: DirectoryCreationStrategy,
) -> Result<&Path, PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
    } else {
        match strategy {
            DirectoryCreationStrategy::AutoCreate => {
                fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            }
            DirectoryCreationStrategy::Disallow => {
                return Err(PathError::DirectoryNotFound(path.to_path_buf()));
            }
        }
    }

    Ok(path)
}

/// Verify a directory is writable by performing a scratch write-then-delete.
pub fn verify_writable(path: &Path) -> Result<(), PathError> {
    let test_file = path.join(".nethawk_write_test");
    let result = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&test_file);

    match result {
        Ok(mut file) => {
            file.write_all(b"test")
                .map_err(|e| PathError::NotWritable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            drop(file);
            let _ = fs::remove_file(&test_file);
            Ok(())
        }
        Err(err) => Err(PathError::NotWritable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn ensure_creates_missing_directory_with_parents() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("a/b/c");

        let returned = ensure_directory(&target, DirectoryCreationStrategy::AutoCreate).unwrap();
        assert_eq!(returned, target.as_path());
        assert!(target.is_dir());

        // Second call is a no-op, not an error
        ensure_directory(&target, DirectoryCreationStrategy::AutoCreate).unwrap();
    }

    #[test]
    fn ensure_disallow_errors_on_missing_directory() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("missing");

        let err = ensure_directory(&target, DirectoryCreationStrategy::Disallow).unwrap_err();
        assert!(matches!(err, PathError::DirectoryNotFound(_)));
    }

    #[test]
    fn ensure_rejects_non_directory() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("plain_file");
        std::fs::write(&file, b"x").unwrap();

        let err = ensure_directory(&file, DirectoryCreationStrategy::AutoCreate).unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
    }

    #[test]
    fn verify_writable_passes_on_temp_dir() {
        let temp = tempdir().unwrap();
        verify_writable(temp.path()).unwrap();
        // The scratch file must be cleaned up
        assert!(!temp.path().join(".nethawk_write_test").exists());
    }
}
