//! File system abstraction
//!
//! The sync engine only touches files through this trait, so the merge and
//! diff logic can be tested against an in-memory mock and so apply-mode
//! writes stay atomic (tempfile + rename in the target directory).

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::SyncResult;

/// Abstract file system interface
pub trait FileSystem: Sync {
    /// Read file content
    fn read_to_string(&self, path: &Path) -> SyncResult<String>;

    /// Write file content atomically
    fn write_atomic(&self, path: &Path, content: &str) -> SyncResult<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;
}

/// Local file system implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn read_to_string(&self, path: &Path) -> SyncResult<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write_atomic(&self, path: &Path, content: &str) -> SyncResult<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Mock file system for testing
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockFileSystem {
    pub files: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<PathBuf, String>>>,
    pub dirs: std::sync::Arc<std::sync::Mutex<std::collections::HashSet<PathBuf>>>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.into());
    }

    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        self.dirs.lock().unwrap().insert(path.into());
    }

    pub fn content(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> SyncResult<String> {
        self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
            crate::error::SyncError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            ))
        })
    }

    fn write_atomic(&self, path: &Path, content: &str) -> SyncResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }
}
