//! FileRecord - an immutable snapshot of one file

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Metadata of a single file as observed during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    size: u64,
    modified: SystemTime,
    is_symlink: bool,
    extension: String,
}

impl FileRecord {
    pub fn new(path: PathBuf, size: u64, modified: SystemTime, is_symlink: bool) -> Self {
        let extension = extension_of(&path);
        Self {
            path,
            size,
            modified,
            is_symlink,
            extension,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apparent size in bytes, or allocated size in disk-usage mode.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Modification time as whole seconds since the Unix epoch.
    /// Times before the epoch are negative.
    pub fn modified_secs(&self) -> i64 {
        match self.modified.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        }
    }

    pub fn is_symlink(&self) -> bool {
        self.is_symlink
    }

    /// Lowercase extension without the dot, empty if none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
