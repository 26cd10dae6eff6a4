//! # Storage Backends
//!
//! [`StorageBackend`] is the only place the store touches the outside world. A resource
//! locator is an opaque string (a file path, a blob name); the backend decides what it
//! means. The store needs four things from it: a stat-like existence probe, a full read,
//! a full overwrite, and an absolute rendering of the locator for receipts.
//!
//! [`FsBackend`] is the local-disk implementation. Test code uses
//! [`MemoryBackend`](crate::mock::MemoryBackend) instead.

use crate::error::StoreError;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Async I/O seam for JSON resources.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Succeeds if the resource exists, fails with the backend's error otherwise.
    async fn probe(&self, locator: &str) -> Result<(), StoreError>;

    /// Reads the whole resource as UTF-8 text.
    async fn read(&self, locator: &str) -> Result<String, StoreError>;

    /// Replaces the whole resource with `contents`, creating it if needed.
    async fn write(&self, locator: &str, contents: &str) -> Result<(), StoreError>;

    /// Absolute form of the locator, used for reporting only.
    fn display_path(&self, locator: &str) -> String;
}

/// Local filesystem backend built on `tokio::fs`.
///
/// Relative locators resolve against `root` when one is set, and against the
/// process working directory otherwise.
#[derive(Debug, Clone, Default)]
pub struct FsBackend {
    root: Option<PathBuf>,
}

impl FsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that resolves relative locators under `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn resolve(&self, locator: &str) -> PathBuf {
        let path = Path::new(locator);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl StorageBackend for FsBackend {
    async fn probe(&self, locator: &str) -> Result<(), StoreError> {
        tokio::fs::metadata(self.resolve(locator))
            .await
            .map(|_| ())
            .map_err(|e| StoreError::io(locator, e))
    }

    async fn read(&self, locator: &str) -> Result<String, StoreError> {
        tokio::fs::read_to_string(self.resolve(locator))
            .await
            .map_err(|e| StoreError::io(locator, e))
    }

    async fn write(&self, locator: &str, contents: &str) -> Result<(), StoreError> {
        tokio::fs::write(self.resolve(locator), contents)
            .await
            .map_err(|e| StoreError::io(locator, e))
    }

    fn display_path(&self, locator: &str) -> String {
        let path = self.resolve(locator);
        let absolute = if path.is_absolute() {
            path
        } else {
            match std::env::current_dir() {
                Ok(cwd) => cwd.join(path),
                Err(_) => path,
            }
        };
        normalize(&absolute).display().to_string()
    }
}

/// Resolves `.` and `..` components without touching the filesystem, so every
/// spelling of a path yields the same key. Symlinks are not followed.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_backend_resolves_relative_locators() {
        let backend = FsBackend::rooted("/srv/data");
        assert_eq!(backend.resolve("reps.json"), PathBuf::from("/srv/data/reps.json"));
        assert_eq!(backend.resolve("/tmp/reps.json"), PathBuf::from("/tmp/reps.json"));
    }

    #[test]
    fn display_path_is_absolute() {
        let backend = FsBackend::new();
        assert!(Path::new(&backend.display_path("reps.json")).is_absolute());
    }

    #[test]
    fn display_path_collapses_dot_components() {
        let backend = FsBackend::rooted("/srv/data");
        let expected = "/srv/data/reps.json";
        assert_eq!(backend.display_path("reps.json"), expected);
        assert_eq!(backend.display_path("./reps.json"), expected);
        assert_eq!(backend.display_path("archive/../reps.json"), expected);
        assert_eq!(backend.display_path("/srv/data/./x/../reps.json"), expected);
    }

    #[tokio::test]
    async fn missing_file_probe_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::rooted(dir.path());
        let err = backend.probe("missing.json").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
