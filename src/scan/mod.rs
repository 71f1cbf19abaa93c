//! Directory scanning and ranking
//!
//! A scan pulls records from a [`Walker`], gates each one through a
//! [`Filter`], and offers the survivors to a [`TopNTracker`]. Grouped scans
//! hand the records to a [`Grouper`] instead.
//!
//! - `Walker`: lazy depth-first traversal, O(depth) memory
//! - `TopNTracker`: bounded min-heap, O(log N) per offer
//! - `Finder`: wires the pieces together for one scan

mod config;
mod diagnostics;
mod filter;
mod finder;
mod grouper;
mod record;
mod tracker;
mod utils;
mod walker;

pub use config::{ExcludePattern, GroupBy, GroupScope, SearchOptions, SearchOptionsBuilder};
pub use diagnostics::{CancelFlag, DiagnosticSink, TracingSink};
pub use filter::Filter;
pub use finder::{Finder, ScanOutcome, ScanResults, ScanStats};
pub use grouper::{Group, GroupAccumulator, Grouper, NO_EXTENSION};
pub use record::FileRecord;
pub use tracker::TopNTracker;
pub use walker::{WalkStats, Walker};
