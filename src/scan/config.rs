//! Search configuration

use std::collections::BTreeSet;
use std::time::SystemTime;

use glob::Pattern;
use regex::Regex;

use crate::error::ConfigError;

const DEFAULT_TOP_N: usize = 20;

/// How results are partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Containing directory of each file.
    Directory,
    /// Lowercased file extension.
    Extension,
}

/// Which records a grouped scan partitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupScope {
    /// Take the global top N first, then group those records.
    TopN,
    /// Group every accepted record, keeping the top N of each group.
    /// Group totals cover all matches, not only the kept records.
    #[default]
    AllMatches,
}

/// A compiled exclusion rule.
#[derive(Debug, Clone)]
pub enum ExcludePattern {
    Glob(Pattern),
    Regex(Regex),
}

impl ExcludePattern {
    pub fn glob(pattern: &str) -> Result<Self, ConfigError> {
        Pattern::new(pattern)
            .map(ExcludePattern::Glob)
            .map_err(|source| ConfigError::InvalidGlob {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn regex(pattern: &str) -> Result<Self, ConfigError> {
        Regex::new(pattern)
            .map(ExcludePattern::Regex)
            .map_err(|source| ConfigError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExcludePattern::Glob(p) => p.as_str(),
            ExcludePattern::Regex(r) => r.as_str(),
        }
    }
}

/// Immutable, validated configuration for one scan.
///
/// Build it with [`SearchOptions::builder`]; fields are read-only afterwards.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    top_n: usize,
    min_size: u64,
    extensions: BTreeSet<String>,
    earliest_modified: Option<SystemTime>,
    exclude_patterns: Vec<ExcludePattern>,
    include_hidden: bool,
    follow_symlinks: bool,
    max_depth: Option<usize>,
    disk_usage: bool,
    group_by: Option<GroupBy>,
    group_scope: GroupScope,
}

impl SearchOptions {
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn min_size(&self) -> u64 {
        self.min_size
    }

    /// Allowed extensions, lowercase without a leading dot. Empty means any.
    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub fn earliest_modified(&self) -> Option<SystemTime> {
        self.earliest_modified
    }

    pub fn exclude_patterns(&self) -> &[ExcludePattern] {
        &self.exclude_patterns
    }

    pub fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    pub fn follow_symlinks(&self) -> bool {
        self.follow_symlinks
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn disk_usage(&self) -> bool {
        self.disk_usage
    }

    pub fn group_by(&self) -> Option<GroupBy> {
        self.group_by
    }

    pub fn group_scope(&self) -> GroupScope {
        self.group_scope
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_size: 0,
            extensions: BTreeSet::new(),
            earliest_modified: None,
            exclude_patterns: Vec::new(),
            include_hidden: false,
            follow_symlinks: false,
            max_depth: None,
            disk_usage: false,
            group_by: None,
            group_scope: GroupScope::default(),
        }
    }
}

/// Collects raw settings and validates them into [`SearchOptions`].
#[derive(Debug, Clone)]
pub struct SearchOptionsBuilder {
    top_n: usize,
    min_size: u64,
    extensions: Vec<String>,
    earliest_modified: Option<SystemTime>,
    exclude_globs: Vec<String>,
    exclude_regexes: Vec<String>,
    include_hidden: bool,
    follow_symlinks: bool,
    max_depth: Option<usize>,
    disk_usage: bool,
    group_by: Option<GroupBy>,
    group_scope: GroupScope,
}

impl Default for SearchOptionsBuilder {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_size: 0,
            extensions: Vec::new(),
            earliest_modified: None,
            exclude_globs: Vec::new(),
            exclude_regexes: Vec::new(),
            include_hidden: false,
            follow_symlinks: false,
            max_depth: None,
            disk_usage: false,
            group_by: None,
            group_scope: GroupScope::default(),
        }
    }
}

impl SearchOptionsBuilder {
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    pub fn min_size(mut self, bytes: u64) -> Self {
        self.min_size = bytes;
        self
    }

    /// Accepts "pdf", ".PDF" and similar; normalized on build.
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(exts.into_iter().map(Into::into));
        self
    }

    pub fn earliest_modified(mut self, time: Option<SystemTime>) -> Self {
        self.earliest_modified = time;
        self
    }

    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_globs.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn exclude_regex<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_regexes.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    pub fn follow_symlinks(mut self, yes: bool) -> Self {
        self.follow_symlinks = yes;
        self
    }

    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn disk_usage(mut self, yes: bool) -> Self {
        self.disk_usage = yes;
        self
    }

    pub fn group_by(mut self, group_by: Option<GroupBy>) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn group_scope(mut self, scope: GroupScope) -> Self {
        self.group_scope = scope;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// Globs are compiled before regexes; within each kind, the order given
    /// is the evaluation order.
    pub fn build(self) -> Result<SearchOptions, ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }

        let mut exclude_patterns =
            Vec::with_capacity(self.exclude_globs.len() + self.exclude_regexes.len());
        for pattern in &self.exclude_globs {
            exclude_patterns.push(ExcludePattern::glob(pattern)?);
        }
        for pattern in &self.exclude_regexes {
            exclude_patterns.push(ExcludePattern::regex(pattern)?);
        }

        let extensions = self
            .extensions
            .iter()
            .map(|e| normalize_extension(e))
            .filter(|e| !e.is_empty())
            .collect();

        Ok(SearchOptions {
            top_n: self.top_n,
            min_size: self.min_size,
            extensions,
            earliest_modified: self.earliest_modified,
            exclude_patterns,
            include_hidden: self.include_hidden,
            follow_symlinks: self.follow_symlinks,
            max_depth: self.max_depth,
            disk_usage: self.disk_usage,
            group_by: self.group_by,
            group_scope: self.group_scope,
        })
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
