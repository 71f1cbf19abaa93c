//! Grouping of ranked records by directory or extension

use std::borrow::Cow;
use std::collections::HashMap;
use std::ffi::OsString;

use super::config::GroupBy;
use super::record::FileRecord;
use super::tracker::TopNTracker;

/// Group key used for files without an extension.
pub const NO_EXTENSION: &str = "(no extension)";

/// One partition of the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Raw key. Distinct non-UTF-8 directories stay distinct groups.
    pub key: OsString,
    /// Largest first, ties in encounter order.
    pub records: Vec<FileRecord>,
    /// Sum of sizes across every member counted for this group.
    pub total_size: u64,
    /// Members counted, which may exceed `records.len()` for whole-run grouping.
    pub file_count: u64,
}

impl Group {
    /// Key as shown to the user.
    pub fn label(&self) -> Cow<'_, str> {
        self.key.to_string_lossy()
    }
}

type KeyFn = fn(&FileRecord) -> OsString;

fn directory_key(record: &FileRecord) -> OsString {
    record
        .path()
        .parent()
        .map(|p| p.as_os_str().to_os_string())
        .unwrap_or_default()
}

fn extension_key(record: &FileRecord) -> OsString {
    match record.extension() {
        "" => OsString::from(NO_EXTENSION),
        ext => OsString::from(ext),
    }
}

/// Partitions records. The key function is chosen once at construction.
#[derive(Clone, Copy)]
pub struct Grouper {
    key: KeyFn,
}

impl Grouper {
    pub fn new(group_by: GroupBy) -> Self {
        let key: KeyFn = match group_by {
            GroupBy::Directory => directory_key,
            GroupBy::Extension => extension_key,
        };
        Self { key }
    }

    pub fn key_of(&self, record: &FileRecord) -> OsString {
        (self.key)(record)
    }

    /// Group an already ranked sequence, preserving its order inside groups.
    pub fn group(&self, records: Vec<FileRecord>) -> Vec<Group> {
        let mut index: HashMap<OsString, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();

        for record in records {
            let key = self.key_of(&record);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(Group {
                    key,
                    records: Vec::new(),
                    total_size: 0,
                    file_count: 0,
                });
                groups.len() - 1
            });
            let group = &mut groups[slot];
            group.total_size += record.size();
            group.file_count += 1;
            group.records.push(record);
        }

        for group in &mut groups {
            // Stable, so equal sizes keep input order
            group.records.sort_by(|a, b| b.size().cmp(&a.size()));
        }
        sort_groups(&mut groups);
        groups
    }

    /// Start a streaming accumulator keeping the top `per_group` of each group.
    pub fn accumulator(&self, per_group: usize) -> GroupAccumulator {
        GroupAccumulator {
            grouper: *self,
            per_group,
            index: HashMap::new(),
            slots: Vec::new(),
        }
    }
}

struct Slot {
    key: OsString,
    tracker: TopNTracker,
    total_size: u64,
    file_count: u64,
}

/// Whole-run grouping: one bounded tracker per key plus full running totals.
pub struct GroupAccumulator {
    grouper: Grouper,
    per_group: usize,
    index: HashMap<OsString, usize>,
    slots: Vec<Slot>,
}

impl GroupAccumulator {
    pub fn offer(&mut self, record: FileRecord) {
        let key = self.grouper.key_of(&record);
        let slot = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.slots.push(Slot {
                    key: key.clone(),
                    tracker: TopNTracker::new(self.per_group),
                    total_size: 0,
                    file_count: 0,
                });
                self.index.insert(key, self.slots.len() - 1);
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[slot];
        slot.total_size += record.size();
        slot.file_count += 1;
        slot.tracker.offer(record);
    }

    pub fn group_count(&self) -> usize {
        self.slots.len()
    }

    pub fn finish(self) -> Vec<Group> {
        let mut groups: Vec<Group> = self
            .slots
            .into_iter()
            .map(|slot| Group {
                key: slot.key,
                records: slot.tracker.into_results(),
                total_size: slot.total_size,
                file_count: slot.file_count,
            })
            .collect();
        sort_groups(&mut groups);
        groups
    }
}

/// Largest total first; equal totals keep first-appearance order.
fn sort_groups(groups: &mut [Group]) {
    groups.sort_by(|a, b| b.total_size.cmp(&a.total_size));
}
