// src/domain/artifacts.rs
use std::fs;
use std::path::{Path, PathBuf};

/// Rendered chart file owned by the caller.
///
/// The file is removed when the handle is dropped unless [`ChartHandle::keep`]
/// was called first.
#[derive(Debug)]
pub struct ChartHandle {
    path: PathBuf,
    keep: bool,
}

impl ChartHandle {
    pub fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release ownership of the file and leave it on disk
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        self.path.clone()
    }
}

impl PartialEq for ChartHandle {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Drop for ChartHandle {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove chart {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        fs::write(&path, "<svg/>").unwrap();

        drop(ChartHandle::new(path.clone()));
        assert!(!path.exists());
    }

    #[test]
    fn keep_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        fs::write(&path, "<svg/>").unwrap();

        assert_eq!(ChartHandle::new(path.clone()).keep(), path);
        assert!(path.exists());
    }

    #[test]
    fn missing_file_is_ignored_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        drop(ChartHandle::new(dir.path().join("never-written.svg")));
    }
}
