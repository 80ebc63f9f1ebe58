//! Active-set: the ids that are still going to run.
//!
//! Membership is the only source of truth for liveness. An id enters once at
//! schedule time and leaves once, through [`ActiveSet::cancel`] or
//! [`ActiveSet::consume`], whichever comes first.

use std::collections::HashSet;

use crate::id::ScheduleId;

#[derive(Debug, Default)]
pub struct ActiveSet {
    live: HashSet<ScheduleId>,
}

impl ActiveSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` live.
    pub fn register(&mut self, id: ScheduleId) {
        let fresh = self.live.insert(id);
        debug_assert!(fresh, "schedule id {id} registered twice");
    }

    /// Removes `id` if it is live. Unknown and already-terminal ids are a
    /// no-op returning `false`.
    pub fn cancel(&mut self, id: ScheduleId) -> bool {
        self.live.remove(&id)
    }

    /// Test-and-clear at the point of execution.
    pub fn consume(&mut self, id: ScheduleId) -> bool {
        self.live.remove(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ScheduleId) -> bool {
        self.live.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_idempotent() {
        let mut set = ActiveSet::new();
        set.register(ScheduleId(1));
        assert!(set.cancel(ScheduleId(1)));
        assert!(!set.cancel(ScheduleId(1)));
        assert!(!set.contains(ScheduleId(1)));
    }

    #[test]
    fn test_cancel_unknown_id() {
        let mut set = ActiveSet::new();
        assert!(!set.cancel(ScheduleId(42)));
    }

    #[test]
    fn test_consume_after_cancel_fails() {
        let mut set = ActiveSet::new();
        set.register(ScheduleId(3));
        set.cancel(ScheduleId(3));
        assert!(!set.consume(ScheduleId(3)));
    }

    #[test]
    fn test_consume_once() {
        let mut set = ActiveSet::new();
        set.register(ScheduleId(3));
        assert!(set.consume(ScheduleId(3)));
        assert!(!set.consume(ScheduleId(3)));
        assert!(set.is_empty());
    }
}
