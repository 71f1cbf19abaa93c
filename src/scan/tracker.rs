//! Bounded top-N ranking by size
//!
//! A min-heap holds at most N records; its root is the weakest resident, so
//! each offer costs one comparison plus O(log N) on replacement.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::record::FileRecord;

/// A record with its insertion sequence number.
///
/// Ordering is by rank: larger size first, then earlier sequence.
#[derive(Debug)]
struct Ranked {
    size: u64,
    seq: u64,
    record: FileRecord,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size
            .cmp(&other.size)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.seq == other.seq
    }
}

impl Eq for Ranked {}

/// Keeps the N largest records offered so far.
///
/// Equal sizes never evict a resident, and among equal residents the latest
/// offered is the first to go, so earlier encounters win ties.
#[derive(Debug)]
pub struct TopNTracker {
    capacity: usize,
    heap: BinaryHeap<Reverse<Ranked>>,
    next_seq: u64,
}

impl TopNTracker {
    /// A capacity of 0 tracks nothing. Storage grows with the records held,
    /// not with `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Smallest size currently held, once the tracker is full.
    /// Anything not strictly larger would be discarded.
    pub fn min_size(&self) -> Option<u64> {
        if self.heap.len() < self.capacity {
            return None;
        }
        self.heap.peek().map(|Reverse(r)| r.size)
    }

    /// Consider a record. Returns true if it was kept.
    pub fn offer(&mut self, record: FileRecord) -> bool {
        if self.capacity == 0 {
            return false;
        }

        let size = record.size();
        if self.heap.len() < self.capacity {
            self.push(size, record);
            return true;
        }

        let Some(mut weakest) = self.heap.peek_mut() else {
            return false;
        };
        if size <= weakest.0.size {
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        *weakest = Reverse(Ranked { size, seq, record });
        true
    }

    fn push(&mut self, size: u64, record: FileRecord) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Ranked { size, seq, record }));
    }

    /// Held records, largest first, ties in encounter order.
    pub fn results(&self) -> Vec<FileRecord> {
        let mut ranked: Vec<&Ranked> = self.heap.iter().map(|Reverse(r)| r).collect();
        ranked.sort_unstable_by(|a, b| b.cmp(a));
        ranked.into_iter().map(|r| r.record.clone()).collect()
    }

    /// Like [`results`](Self::results), consuming the tracker.
    pub fn into_results(self) -> Vec<FileRecord> {
        // Ascending order of Reverse is descending rank
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(r)| r.record)
            .collect()
    }

    /// Fold another tracker into this one.
    ///
    /// `other`'s records are re-offered in its ranked order, after everything
    /// already held here, so ties keep favoring `self`.
    pub fn merge(&mut self, other: TopNTracker) {
        for record in other.into_results() {
            self.offer(record);
        }
    }
}
