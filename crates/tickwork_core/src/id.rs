//! Schedule identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of one scheduled item, used for cancellation.
///
/// Ids are handed out by an [`IdAllocator`] and never reused by it, so a
/// stale id can never cancel a newer item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScheduleId(pub u32);

/// Id of an item on an [`EntityActionScheduler`](crate::EntityActionScheduler).
pub type ActionId = ScheduleId;

/// Id of an item on a [`TimedEventScheduler`](crate::TimedEventScheduler).
pub type EventId = ScheduleId;

impl ScheduleId {
    /// Placeholder carried by items that have not been stamped yet.
    pub const UNASSIGNED: ScheduleId = ScheduleId(0);

    /// Returns the raw `u32`.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Strictly increasing id source. Never reset, not even by `clear`.
#[derive(Debug)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Creates an allocator whose first id is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hands out the next id.
    ///
    /// # Panics
    ///
    /// Panics when the `u32` id space runs out. Wrapping around would let a
    /// stale id cancel an unrelated item.
    pub fn allocate(&mut self) -> ScheduleId {
        let id = self.next;
        self.next = match id.checked_add(1) {
            Some(next) => next,
            None => panic!("schedule id space exhausted"),
        };
        ScheduleId(id)
    }

    /// Returns how many ids have been issued.
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
