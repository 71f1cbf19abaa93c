//! Error types for configuration, scanning, and per-entry diagnostics

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A scan that could not begin. Raised before any record is produced.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot access '{}': {source}", path.display())]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Invalid search configuration, rejected before traversal starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("top-N count must be at least 1")]
    ZeroTopN,

    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid exclude regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid size '{input}': {reason}")]
    InvalidSize { input: String, reason: String },

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },
}

/// Classification of a recoverable per-entry failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    PermissionDenied,
    /// Entry vanished between enumeration and inspection.
    NotFound,
    BrokenSymlink,
    Io(io::ErrorKind),
}

impl DiagnosticKind {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => DiagnosticKind::PermissionDenied,
            io::ErrorKind::NotFound => DiagnosticKind::NotFound,
            other => DiagnosticKind::Io(other),
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::PermissionDenied => write!(f, "permission denied"),
            DiagnosticKind::NotFound => write!(f, "entry vanished"),
            DiagnosticKind::BrokenSymlink => write!(f, "broken symbolic link"),
            DiagnosticKind::Io(kind) => write!(f, "I/O error ({kind})"),
        }
    }
}
