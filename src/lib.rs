//! Hefty - find the largest files in a directory tree
//!
//! A scan walks the tree lazily, filters each file, and keeps only the N
//! largest matches in a bounded heap, so memory stays proportional to N and
//! the current directory depth.
//!
//! ```no_run
//! use hefty::scan::{Finder, SearchOptions};
//!
//! let options = SearchOptions::builder().top_n(10).build()?;
//! let outcome = Finder::new(options).find(std::path::Path::new("."))?;
//! for record in &outcome.results {
//!     println!("{} {}", record.size(), record.path().display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod output;
pub mod scan;
pub mod size;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{ConfigError, DiagnosticKind, ScanError};
pub use output::{OutputConfig, OutputFormat, print_outcome};
pub use scan::{
    CancelFlag, DiagnosticSink, FileRecord, Finder, Group, GroupBy, GroupScope, ScanOutcome,
    ScanResults, SearchOptions, TopNTracker, Walker,
};
pub use size::{format_size, parse_size};
