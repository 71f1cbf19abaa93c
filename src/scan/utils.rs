//! Shared helpers for walking and filtering

use std::ffi::OsStr;
use std::fs::Metadata;
use std::io;
use std::path::{Component, Path};
use std::time::SystemTime;

/// Names starting with `.` are hidden. `.` and `..` are not names.
pub fn is_hidden_name(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    bytes.first() == Some(&b'.') && name != "." && name != ".."
}

/// Check whether any segment of `path` below `root` is hidden.
/// The root itself never counts, so scanning inside `~/.config` works.
pub fn has_hidden_segment(path: &Path, root: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(rel) => rel.components().any(|c| match c {
            Component::Normal(name) => is_hidden_name(name),
            _ => false,
        }),
        Err(_) => path.file_name().is_some_and(is_hidden_name),
    }
}

/// Check if a modification time passes the optional lower bound.
pub fn passes_time_filter(modified: SystemTime, earliest: Option<SystemTime>) -> bool {
    earliest.is_none_or(|t| modified >= t)
}

/// Size to rank a file by: apparent length, or allocated bytes on disk.
pub fn file_size(path: &Path, meta: &Metadata, disk_usage: bool) -> io::Result<u64> {
    if disk_usage {
        filesize::file_real_size_fast(path, meta)
    } else {
        Ok(meta.len())
    }
}
