//! The scheduling core shared by both schedulers.
//!
//! A [`Timeline`] pairs a [`PendingQueue`] ("is it due") with an
//! [`ActiveSet`] ("is it live"). Cancelling only touches the active-set; the
//! queue keeps a tombstone that [`Timeline::pop_due`] discards when it
//! surfaces.

use tracing::{trace, warn};

use crate::active::ActiveSet;
use crate::id::{IdAllocator, ScheduleId};
use crate::queue::{PendingKey, PendingQueue};
use crate::{Priority, Tick};

#[derive(Debug)]
pub struct Timeline<T> {
    ids: IdAllocator,
    queue: PendingQueue<T>,
    active: ActiveSet,
    last_tick: Option<Tick>,
}

impl<T> Timeline<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: IdAllocator::new(),
            queue: PendingQueue::new(),
            active: ActiveSet::new(),
            last_tick: None,
        }
    }

    /// Stamps a fresh id on `payload`, queues it and marks it live.
    ///
    /// `tick` may lie at or before the last advanced tick, in which case the
    /// item is due on the next drain.
    pub fn push(&mut self, tick: Tick, priority: Priority, payload: T) -> ScheduleId {
        let id = self.ids.allocate();
        self.queue.insert(PendingKey { id, tick, priority }, payload);
        self.active.register(id);
        id
    }

    pub fn cancel(&mut self, id: ScheduleId) -> bool {
        self.active.cancel(id)
    }

    /// Records the start of a drain pass at `tick`.
    ///
    /// Going backwards is a caller error. It is reported, not prevented:
    /// items already drained for later ticks are gone either way.
    pub fn begin_pass(&mut self, tick: Tick) {
        match self.last_tick {
            Some(last) if tick < last => {
                warn!(tick, last_tick = last, "advanced to an earlier tick");
            }
            _ => self.last_tick = Some(tick),
        }
    }

    /// Pops the next live item due at `tick`, consuming its id.
    ///
    /// Re-peeks the live queue on every call, so items pushed mid-pass are
    /// picked up when they are due.
    pub fn pop_due(&mut self, tick: Tick) -> Option<(PendingKey, T)> {
        while let Some((key, payload)) = self.queue.pop_due(tick) {
            if self.active.consume(key.id) {
                return Some((key, payload));
            }
            trace!(id = key.id.get(), tick = key.tick, "discarding cancelled item");
        }
        None
    }

    /// Drops every pending item without running it. Ids keep counting up.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.active.clear();
    }

    /// Number of items that are still going to run.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_pending(&self, id: ScheduleId) -> bool {
        self.active.contains(id)
    }

    /// Tick of the queue head. The head may be a cancelled item.
    #[must_use]
    pub fn next_due_tick(&self) -> Option<Tick> {
        self.queue.peek_min().map(|key| key.tick)
    }

    /// Highest tick any drain pass has run at.
    #[must_use]
    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }

    /// Queue entries including tombstones.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
