//! Ordered pending queue.
//!
//! A binary heap keyed by [`PendingKey`]. The head is always the item that
//! must be considered next: earliest tick, then highest priority, then lowest
//! id. Entries are never reordered or removed except by popping the head.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::id::ScheduleId;
use crate::{Priority, Tick};

/// The ordering fields of a pending item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingKey {
    pub id: ScheduleId,
    pub tick: Tick,
    pub priority: Priority,
}

impl PendingKey {
    /// Returns `true` if this key should be considered before `other`.
    #[must_use]
    pub fn precedes(&self, other: &PendingKey) -> bool {
        self.cmp(other) == Ordering::Greater
    }
}

// BinaryHeap is a max-heap, so "greater" means "runs sooner".
impl Ord for PendingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .tick
            .cmp(&self.tick)
            .then_with(|| self.priority.cmp(&other.priority))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for PendingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Entry<T> {
    key: PendingKey,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Pending items in execution order. O(log n) insert and pop, O(1) peek.
#[derive(Debug)]
pub struct PendingQueue<T> {
    heap: BinaryHeap<Entry<T>>,
}

impl<T> PendingQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn insert(&mut self, key: PendingKey, payload: T) {
        self.heap.push(Entry { key, payload });
    }

    /// Key of the next item to consider, without removing it.
    #[must_use]
    pub fn peek_min(&self) -> Option<&PendingKey> {
        self.heap.peek().map(|entry| &entry.key)
    }

    /// Removes and returns the next item to consider.
    pub fn pop_min(&mut self) -> Option<(PendingKey, T)> {
        self.heap.pop().map(|entry| (entry.key, entry.payload))
    }

    /// Pops the head only if it is due at `tick`.
    pub fn pop_due(&mut self, tick: Tick) -> Option<(PendingKey, T)> {
        if self.heap.peek().is_some_and(|entry| entry.key.tick <= tick) {
            self.pop_min()
        } else {
            None
        }
    }

    /// Number of entries, tombstones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<T> Default for PendingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
