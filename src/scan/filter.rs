//! Record filtering

use std::path::{Path, PathBuf};

use glob::MatchOptions;

use super::config::{ExcludePattern, SearchOptions};
use super::record::FileRecord;
use super::utils::{has_hidden_segment, passes_time_filter};

/// `*` crosses path separators, matching is case-sensitive.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Pure inclusion predicate for records produced under one scan root.
pub struct Filter<'a> {
    options: &'a SearchOptions,
    root: PathBuf,
}

impl<'a> Filter<'a> {
    pub fn new(options: &'a SearchOptions, root: &Path) -> Self {
        Self {
            options,
            root: root.to_path_buf(),
        }
    }

    /// Check every rule: size, extension, modification time, hidden, excludes.
    pub fn accept(&self, record: &FileRecord) -> bool {
        if record.size() < self.options.min_size() {
            return false;
        }

        let extensions = self.options.extensions();
        if !extensions.is_empty() && !extensions.contains(record.extension()) {
            return false;
        }

        if !passes_time_filter(record.modified(), self.options.earliest_modified()) {
            return false;
        }

        if !self.options.include_hidden() && has_hidden_segment(record.path(), &self.root) {
            return false;
        }

        !self.is_excluded(record.path())
    }

    /// Check a path against the exclusion patterns, first match wins.
    ///
    /// Globs are tried against the absolute path, the root-relative path and
    /// the file name. Regexes search the absolute path.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let patterns = self.options.exclude_patterns();
        if patterns.is_empty() {
            return false;
        }

        let full = path.to_string_lossy();
        let relative = path
            .strip_prefix(&self.root)
            .ok()
            .map(|p| p.to_string_lossy());
        let name = path.file_name().map(|n| n.to_string_lossy());

        patterns.iter().any(|pattern| match pattern {
            ExcludePattern::Glob(glob) => {
                glob.matches_with(&full, GLOB_OPTIONS)
                    || relative
                        .as_deref()
                        .is_some_and(|rel| glob.matches_with(rel, GLOB_OPTIONS))
                    || name
                        .as_deref()
                        .is_some_and(|n| glob.matches_with(n, GLOB_OPTIONS))
            }
            ExcludePattern::Regex(re) => re.is_match(&full),
        })
    }
}
