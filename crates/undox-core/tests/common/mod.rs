use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Fresh scratch directory for one test
#[allow(dead_code)]
pub fn scratch() -> TempDir {
    TempDir::new().unwrap()
}

/// Join each name onto the scratch directory, preserving order
#[allow(dead_code)]
pub fn targets(dir: &TempDir, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|name| dir.path().join(name)).collect()
}

/// Create a directory ahead of the command so it counts as pre-existing
#[allow(dead_code)]
pub fn precreate(path: &Path) {
    fs::create_dir(path).unwrap();
}

/// Paths in `paths` that currently exist
#[allow(dead_code)]
pub fn existing(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths.iter().filter(|p| p.exists()).cloned().collect()
}
