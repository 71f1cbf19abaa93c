//! Walker - lazy depth-first traversal yielding one record per file
//!
//! The walker is an explicit stack machine: one frame per open directory.
//! Memory is O(depth) regardless of how many entries the tree holds.

use std::collections::HashSet;
use std::fs::{self, DirEntry, Metadata, ReadDir};
use std::io;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{DiagnosticKind, ScanError};

use super::config::SearchOptions;
use super::diagnostics::{CancelFlag, DiagnosticSink};
use super::filter::Filter;
use super::record::FileRecord;
use super::utils::{file_size, is_hidden_name};

/// Counters collected while walking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories opened, including the root.
    pub dirs_visited: u64,
    /// File records produced.
    pub files_seen: u64,
    /// Entries skipped because of an error.
    pub errors: u64,
    /// Symlinked directories refused because they lead back onto the current path.
    pub cycles_skipped: u64,
}

/// One open directory on the descent path.
struct DirFrame {
    path: PathBuf,
    entries: ReadDir,
    depth: usize,
    /// Canonical path, tracked only when following symlinks.
    identity: Option<PathBuf>,
}

/// Lazy, one-shot iterator over the files below a root directory.
pub struct Walker<'a> {
    root: PathBuf,
    options: &'a SearchOptions,
    filter: Filter<'a>,
    stack: Vec<DirFrame>,
    on_path: HashSet<PathBuf>,
    sink: Option<Box<dyn DiagnosticSink + 'a>>,
    cancel: Option<CancelFlag>,
    cancelled: bool,
    stats: WalkStats,
}

impl<'a> Walker<'a> {
    /// Open the root directory. Fails if the scan cannot begin at all.
    pub fn new(root: &Path, options: &'a SearchOptions) -> Result<Self, ScanError> {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

        let meta = fs::metadata(&root).map_err(|err| root_error(&root, err))?;
        if !meta.is_dir() {
            return Err(ScanError::NotADirectory(root));
        }

        let entries = fs::read_dir(&root).map_err(|err| root_error(&root, err))?;

        let mut on_path = HashSet::new();
        let identity = if options.follow_symlinks() {
            let canonical = fs::canonicalize(&root).map_err(|err| root_error(&root, err))?;
            on_path.insert(canonical.clone());
            Some(canonical)
        } else {
            None
        };

        let filter = Filter::new(options, &root);
        let stack = vec![DirFrame {
            path: root.clone(),
            entries,
            depth: 0,
            identity,
        }];

        Ok(Self {
            root,
            options,
            filter,
            stack,
            on_path,
            sink: None,
            cancel: None,
            cancelled: false,
            stats: WalkStats {
                dirs_visited: 1,
                ..WalkStats::default()
            },
        })
    }

    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'a) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The absolute root being walked.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// True if the walk ended because the cancel flag was raised.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    fn visit(&mut self, entry: &DirEntry, depth: usize) -> Option<FileRecord> {
        let path = entry.path();

        if !self.options.include_hidden() && is_hidden_name(&entry.file_name()) {
            trace!(path = %path.display(), "hidden, skipped");
            return None;
        }

        if self.filter.is_excluded(&path) {
            trace!(path = %path.display(), "excluded");
            return None;
        }

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(err) => {
                self.report(&path, DiagnosticKind::from_io(&err));
                return None;
            }
        };

        if file_type.is_symlink() {
            if !self.options.follow_symlinks() {
                // DirEntry::metadata does not traverse the link
                return match entry.metadata() {
                    Ok(meta) => self.record(path, &meta, true),
                    Err(err) => {
                        self.report(&path, DiagnosticKind::from_io(&err));
                        None
                    }
                };
            }

            return match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => {
                    self.descend(path, depth + 1);
                    None
                }
                Ok(meta) if meta.is_file() => self.record(path, &meta, true),
                Ok(_) => None,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    self.report(&path, DiagnosticKind::BrokenSymlink);
                    None
                }
                Err(err) => {
                    self.report(&path, DiagnosticKind::from_io(&err));
                    None
                }
            };
        }

        if file_type.is_dir() {
            self.descend(path, depth + 1);
            return None;
        }

        if !file_type.is_file() {
            return None;
        }

        match entry.metadata() {
            Ok(meta) => self.record(path, &meta, false),
            Err(err) => {
                self.report(&path, DiagnosticKind::from_io(&err));
                None
            }
        }
    }

    fn record(&mut self, path: PathBuf, meta: &Metadata, is_symlink: bool) -> Option<FileRecord> {
        let size = match file_size(&path, meta, self.options.disk_usage()) {
            Ok(size) => size,
            Err(err) => {
                self.report(&path, DiagnosticKind::from_io(&err));
                return None;
            }
        };
        let modified = match meta.modified() {
            Ok(t) => t,
            Err(err) => {
                self.report(&path, DiagnosticKind::from_io(&err));
                return None;
            }
        };

        self.stats.files_seen += 1;
        Some(FileRecord::new(path, size, modified, is_symlink))
    }

    /// Push a directory frame unless depth, cycle, or open errors forbid it.
    fn descend(&mut self, path: PathBuf, depth: usize) {
        if self.options.max_depth().is_some_and(|max| depth > max) {
            trace!(path = %path.display(), depth, "below max depth");
            return;
        }

        let identity = if self.options.follow_symlinks() {
            match fs::canonicalize(&path) {
                Ok(canonical) if self.on_path.contains(&canonical) => {
                    trace!(path = %path.display(), "symlink cycle, not descending");
                    self.stats.cycles_skipped += 1;
                    return;
                }
                Ok(canonical) => Some(canonical),
                Err(err) => {
                    self.report(&path, DiagnosticKind::from_io(&err));
                    return;
                }
            }
        } else {
            None
        };

        match fs::read_dir(&path) {
            Ok(entries) => {
                if let Some(id) = &identity {
                    self.on_path.insert(id.clone());
                }
                self.stats.dirs_visited += 1;
                self.stack.push(DirFrame {
                    path,
                    entries,
                    depth,
                    identity,
                });
            }
            Err(err) => self.report(&path, DiagnosticKind::from_io(&err)),
        }
    }

    fn pop_dir(&mut self) {
        if let Some(frame) = self.stack.pop() {
            if let Some(id) = frame.identity {
                self.on_path.remove(&id);
            }
        }
    }

    fn report(&mut self, path: &Path, kind: DiagnosticKind) {
        self.stats.errors += 1;
        debug!(path = %path.display(), "skipping entry: {kind}");
        if let Some(sink) = self.sink.as_mut() {
            sink.report(path, kind);
        }
    }

    fn check_cancelled(&mut self) -> bool {
        if !self.cancelled && self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            debug!(root = %self.root.display(), "walk cancelled");
            self.cancelled = true;
            self.stack.clear();
            self.on_path.clear();
        }
        self.cancelled
    }
}

impl Iterator for Walker<'_> {
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        loop {
            if self.check_cancelled() {
                return None;
            }

            let (item, depth) = match self.stack.last_mut() {
                Some(frame) => (frame.entries.next(), frame.depth),
                None => return None,
            };

            match item {
                None => self.pop_dir(),
                Some(Err(err)) => {
                    let dir = self
                        .stack
                        .last()
                        .map(|frame| frame.path.clone())
                        .unwrap_or_default();
                    self.report(&dir, DiagnosticKind::from_io(&err));
                }
                Some(Ok(entry)) => {
                    if let Some(record) = self.visit(&entry, depth) {
                        return Some(record);
                    }
                }
            }
        }
    }
}

impl FusedIterator for Walker<'_> {}

fn root_error(root: &Path, err: io::Error) -> ScanError {
    if err.kind() == io::ErrorKind::NotFound {
        ScanError::RootNotFound(root.to_path_buf())
    } else {
        ScanError::RootInaccessible {
            path: root.to_path_buf(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestDir;

    fn names(walker: Walker<'_>) -> Vec<String> {
        let mut names: Vec<String> = walker.map(|r| r.name()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_walks_nested_tree() {
        let dir = TestDir::new();
        dir.add_file("a.txt", 5);
        dir.add_file("sub/b.txt", 10);
        dir.add_file("sub/deeper/c.txt", 15);

        let options = SearchOptions::default();
        let walker = Walker::new(dir.path(), &options).unwrap();
        assert_eq!(names(walker), vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_records_carry_sizes() {
        let dir = TestDir::new();
        dir.add_file("ten.bin", 10);

        let options = SearchOptions::default();
        let records: Vec<FileRecord> = Walker::new(dir.path(), &options).unwrap().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size(), 10);
        assert_eq!(records[0].extension(), "bin");
        assert!(!records[0].is_symlink());
        assert!(records[0].path().is_absolute());
    }

    #[test]
    fn test_depth_zero_is_root_only() {
        let dir = TestDir::new();
        dir.add_file("top.txt", 1);
        dir.add_file("l1/mid.txt", 1);

        let options = SearchOptions::builder().max_depth(Some(0)).build().unwrap();
        let walker = Walker::new(dir.path(), &options).unwrap();
        assert_eq!(names(walker), vec!["top.txt"]);
    }

    #[test]
    fn test_depth_one_includes_immediate_children() {
        let dir = TestDir::new();
        dir.add_file("top.txt", 1);
        dir.add_file("l1/mid.txt", 1);
        dir.add_file("l1/l2/deep.txt", 1);

        let options = SearchOptions::builder().max_depth(Some(1)).build().unwrap();
        let walker = Walker::new(dir.path(), &options).unwrap();
        assert_eq!(names(walker), vec!["mid.txt", "top.txt"]);
    }

    #[test]
    fn test_hidden_directory_not_descended() {
        let dir = TestDir::new();
        dir.add_file("visible.txt", 1);
        dir.add_file(".cache/huge.bin", 4096);
        dir.add_file(".hidden.txt", 1);

        let options = SearchOptions::default();
        let mut walker = Walker::new(dir.path(), &options).unwrap();
        let found: Vec<String> = walker.by_ref().map(|r| r.name()).collect();
        assert_eq!(found, vec!["visible.txt"]);
        // Only the root was opened
        assert_eq!(walker.stats().dirs_visited, 1);
    }

    #[test]
    fn test_hidden_included_when_requested() {
        let dir = TestDir::new();
        dir.add_file(".cache/huge.bin", 4096);
        dir.add_file(".hidden.txt", 1);

        let options = SearchOptions::builder().include_hidden(true).build().unwrap();
        let walker = Walker::new(dir.path(), &options).unwrap();
        assert_eq!(names(walker), vec![".hidden.txt", "huge.bin"]);
    }

    #[test]
    fn test_excluded_directory_pruned() {
        let dir = TestDir::new();
        dir.add_file("keep/a.txt", 1);
        dir.add_file("node_modules/pkg/index.js", 1);

        let options = SearchOptions::builder()
            .exclude(["node_modules"])
            .build()
            .unwrap();
        let mut walker = Walker::new(dir.path(), &options).unwrap();
        let found: Vec<String> = walker.by_ref().map(|r| r.name()).collect();
        assert_eq!(found, vec!["a.txt"]);
        assert_eq!(walker.stats().dirs_visited, 2);
    }

    #[test]
    fn test_root_errors() {
        let options = SearchOptions::default();
        let err = Walker::new(Path::new("/nonexistent/path/xyz123"), &options)
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::RootNotFound(_)));

        let dir = TestDir::new();
        let file = dir.add_file("plain.txt", 3);
        let err = Walker::new(&file, &options).err().unwrap();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[test]
    fn test_cancel_before_start_yields_nothing() {
        let dir = TestDir::new();
        dir.add_file("a.txt", 1);

        let options = SearchOptions::default();
        let flag = CancelFlag::new();
        flag.cancel();
        let mut walker = Walker::new(dir.path(), &options)
            .unwrap()
            .with_cancel_flag(flag);
        assert!(walker.next().is_none());
        assert!(walker.was_cancelled());
    }

    #[test]
    fn test_cancel_mid_walk_stops_after_current_entry() {
        let dir = TestDir::new();
        for i in 0..10 {
            dir.add_file(&format!("d{}/f{}.bin", i % 3, i), 10);
        }

        let options = SearchOptions::default();
        let flag = CancelFlag::new();
        let mut walker = Walker::new(dir.path(), &options)
            .unwrap()
            .with_cancel_flag(flag.clone());

        assert!(walker.next().is_some());
        flag.cancel();
        assert!(walker.next().is_none());
        assert!(walker.was_cancelled());
        assert!(walker.stats().files_seen < 10);
    }

    #[cfg(unix)]
    #[test]
    fn test_unfollowed_symlink_recorded_with_link_metadata() {
        use std::os::unix::fs::symlink;

        let dir = TestDir::new();
        let target = dir.add_file("real/data.bin", 8192);
        symlink(&target, dir.path().join("link.bin")).unwrap();
        symlink(dir.path().join("real"), dir.path().join("linkdir")).unwrap();

        let options = SearchOptions::default();
        let records: Vec<FileRecord> = Walker::new(dir.path(), &options).unwrap().collect();

        let link = records.iter().find(|r| r.name() == "link.bin").unwrap();
        assert!(link.is_symlink());
        assert_ne!(link.size(), 8192, "link size, not target size");

        // Directory link is recorded, never descended
        assert!(records.iter().any(|r| r.name() == "linkdir" && r.is_symlink()));
        assert_eq!(records.iter().filter(|r| r.name() == "data.bin").count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_followed_symlink_cycle_terminates() {
        use std::os::unix::fs::symlink;

        let dir = TestDir::new();
        dir.add_file("sub/file.txt", 3);
        symlink("..", dir.path().join("sub").join("parent")).unwrap();

        let options = SearchOptions::builder().follow_symlinks(true).build().unwrap();
        let mut walker = Walker::new(dir.path(), &options).unwrap();
        let found: Vec<String> = walker.by_ref().map(|r| r.name()).collect();
        assert_eq!(found, vec!["file.txt"]);
        assert_eq!(walker.stats().cycles_skipped, 1);
        assert_eq!(walker.stats().errors, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_followed_symlink_uses_target_metadata() {
        use std::os::unix::fs::symlink;

        let dir = TestDir::new();
        let target = dir.add_file("real/data.bin", 8192);
        symlink(&target, dir.path().join("link.bin")).unwrap();

        let options = SearchOptions::builder().follow_symlinks(true).build().unwrap();
        let records: Vec<FileRecord> = Walker::new(dir.path(), &options).unwrap().collect();
        let link = records.iter().find(|r| r.name() == "link.bin").unwrap();
        assert!(link.is_symlink());
        assert_eq!(link.size(), 8192);
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_reported_when_following() {
        use std::os::unix::fs::symlink;

        let dir = TestDir::new();
        dir.add_file("real.txt", 1);
        symlink("nonexistent.txt", dir.path().join("broken")).unwrap();

        let options = SearchOptions::builder().follow_symlinks(true).build().unwrap();
        let mut reported = Vec::new();
        let found: Vec<String> = Walker::new(dir.path(), &options)
            .unwrap()
            .with_diagnostics(|p: &Path, k: DiagnosticKind| reported.push((p.to_path_buf(), k)))
            .map(|r| r.name())
            .collect();

        assert_eq!(found, vec!["real.txt"]);
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].1, DiagnosticKind::BrokenSymlink);
    }
}
