//! Finder - runs one scan: walk, filter, rank, and optionally group

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::info;

use crate::error::{DiagnosticKind, ScanError};

use super::config::{GroupBy, GroupScope, SearchOptions};
use super::diagnostics::{CancelFlag, DiagnosticSink};
use super::filter::Filter;
use super::grouper::{Group, Grouper};
use super::record::FileRecord;
use super::tracker::TopNTracker;
use super::walker::{WalkStats, Walker};

/// Counters for a finished (or cancelled) scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub dirs_visited: u64,
    pub files_seen: u64,
    /// Records that passed the filter.
    pub accepted: u64,
    pub errors: u64,
    pub cycles_skipped: u64,
    pub elapsed: Duration,
}

impl ScanStats {
    fn new(walk: WalkStats, accepted: u64, elapsed: Duration) -> Self {
        Self {
            dirs_visited: walk.dirs_visited,
            files_seen: walk.files_seen,
            accepted,
            errors: walk.errors,
            cycles_skipped: walk.cycles_skipped,
            elapsed,
        }
    }
}

/// Result of one scan. `cancelled` scans carry the best partial results.
#[derive(Debug, Clone)]
pub struct ScanOutcome<T> {
    /// Absolute root that was scanned.
    pub root: PathBuf,
    pub results: T,
    pub stats: ScanStats,
    pub cancelled: bool,
}

/// Flat or grouped results, depending on the options' `group_by`.
#[derive(Debug, Clone)]
pub enum ScanResults {
    Ranked(Vec<FileRecord>),
    Grouped(Vec<Group>),
}

/// Forwards to a sink owned by the finder, so the finder can be reused.
struct Forward<'b, 's>(&'b mut (dyn DiagnosticSink + 's));

impl DiagnosticSink for Forward<'_, '_> {
    fn report(&mut self, path: &Path, kind: DiagnosticKind) {
        self.0.report(path, kind)
    }
}

/// Finds the largest files under a directory.
///
/// Every call builds its own walker and tracker; nothing carries over
/// between scans except the configuration, cancel flag, and sink.
pub struct Finder<'s> {
    options: SearchOptions,
    cancel: Option<CancelFlag>,
    sink: Option<Box<dyn DiagnosticSink + 's>>,
}

impl<'s> Finder<'s> {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            cancel: None,
            sink: None,
        }
    }

    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 's) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Scan according to the options: ranked list, or groups if `group_by` is set.
    pub fn run(&mut self, root: &Path) -> Result<ScanOutcome<ScanResults>, ScanError> {
        match self.options.group_by() {
            Some(group_by) => {
                let outcome = self.find_grouped(root, group_by)?;
                Ok(map_results(outcome, ScanResults::Grouped))
            }
            None => {
                let outcome = self.find(root)?;
                Ok(map_results(outcome, ScanResults::Ranked))
            }
        }
    }

    /// The N largest accepted files, largest first.
    pub fn find(&mut self, root: &Path) -> Result<ScanOutcome<Vec<FileRecord>>, ScanError> {
        let mut tracker = TopNTracker::new(self.options.top_n());
        let (root, stats, cancelled) = self.scan(root, |record| {
            tracker.offer(record);
        })?;

        Ok(ScanOutcome {
            root,
            results: tracker.into_results(),
            stats,
            cancelled,
        })
    }

    /// Accepted files partitioned by `group_by`, groups largest total first.
    ///
    /// With [`GroupScope::TopN`] the global top N is grouped; with
    /// [`GroupScope::AllMatches`] every accepted file is grouped and each
    /// group keeps its own top N.
    pub fn find_grouped(
        &mut self,
        root: &Path,
        group_by: GroupBy,
    ) -> Result<ScanOutcome<Vec<Group>>, ScanError> {
        let grouper = Grouper::new(group_by);
        let top_n = self.options.top_n();

        match self.options.group_scope() {
            GroupScope::TopN => {
                let outcome = self.find(root)?;
                Ok(map_results(outcome, |records| grouper.group(records)))
            }
            GroupScope::AllMatches => {
                let mut acc = grouper.accumulator(top_n);
                let (root, stats, cancelled) = self.scan(root, |record| acc.offer(record))?;
                Ok(ScanOutcome {
                    root,
                    results: acc.finish(),
                    stats,
                    cancelled,
                })
            }
        }
    }

    /// Walk `root`, handing every accepted record to `consume`.
    fn scan(
        &mut self,
        root: &Path,
        mut consume: impl FnMut(FileRecord),
    ) -> Result<(PathBuf, ScanStats, bool), ScanError> {
        let start = Instant::now();

        let mut walker = Walker::new(root, &self.options)?;
        if let Some(flag) = &self.cancel {
            walker = walker.with_cancel_flag(flag.clone());
        }
        if let Some(sink) = self.sink.as_deref_mut() {
            walker = walker.with_diagnostics(Forward(sink));
        }

        let root = walker.root().to_path_buf();
        info!(root = %root.display(), top_n = self.options.top_n(), "scan started");

        let filter = Filter::new(&self.options, &root);
        let mut accepted = 0u64;
        for record in walker.by_ref() {
            if filter.accept(&record) {
                accepted += 1;
                consume(record);
            }
        }

        let cancelled = walker.was_cancelled();
        let stats = ScanStats::new(walker.stats(), accepted, start.elapsed());
        info!(
            files = stats.files_seen,
            dirs = stats.dirs_visited,
            accepted = stats.accepted,
            errors = stats.errors,
            cancelled,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "scan finished"
        );

        Ok((root, stats, cancelled))
    }
}

fn map_results<T, U>(outcome: ScanOutcome<T>, f: impl FnOnce(T) -> U) -> ScanOutcome<U> {
    ScanOutcome {
        root: outcome.root,
        results: f(outcome.results),
        stats: outcome.stats,
        cancelled: outcome.cancelled,
    }
}
