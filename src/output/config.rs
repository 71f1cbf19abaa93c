//! Output configuration types

use std::path::{Path, PathBuf};

/// Rendering target for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Configuration for output formatting.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub use_color: bool,
    /// Show paths relative to the scan root.
    pub relative: bool,
}

impl OutputConfig {
    /// Path as it should be displayed for a given scan root.
    pub fn display_path(&self, path: &Path, root: &Path) -> PathBuf {
        if self.relative {
            if let Ok(rel) = path.strip_prefix(root) {
                return rel.to_path_buf();
            }
        }
        path.to_path_buf()
    }
}
