//! Directory primitives
//!
//! Thin wrappers over `std::fs` that turn io failures into tagged
//! `UndoxError`s carrying the path and an `FsFailure`.

use std::fs;
use std::path::Path;

use crate::errors::{Result, UndoxError};

/// Whether anything exists at `path` (symlinks are followed)
pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Create a single directory; the parent must already exist
///
/// # Errors
///
/// Returns `CreateDirFailed` with the failure classified from the io error.
pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path).map_err(|e| UndoxError::create_dir(path, &e))
}

/// Remove a single empty directory
///
/// # Errors
///
/// Returns `RemoveDirFailed` with the failure classified from the io error.
pub fn remove_dir(path: &Path) -> Result<()> {
    fs::remove_dir(path).map_err(|e| UndoxError::remove_dir(path, &e))
}
