//! Free-standing timed events.
//!
//! A [`TimedEvent`] is a value: a target tick, a priority, a display name and
//! one job to run. Jobs get an [`EventContext`] whose `scheduler` field lets
//! them queue follow-up events or cancel pending ones.

use tracing::{debug, trace};

use crate::error::SchedulerError;
use crate::id::EventId;
use crate::timeline::Timeline;
use crate::{Priority, Tick};

/// Boxed event job.
pub type JobFn = Box<dyn FnOnce(&mut EventContext<'_>) -> anyhow::Result<()>>;

/// Handed to a job when its event fires.
pub struct EventContext<'a> {
    pub id: EventId,
    pub name: &'a str,
    /// Tick of the pass that fired the event.
    pub tick: Tick,
    pub scheduler: &'a mut TimedEventScheduler,
}

/// A unit of work due at a tick.
pub struct TimedEvent {
    tick: Tick,
    priority: Priority,
    name: String,
    job: JobFn,
}

impl TimedEvent {
    /// An unnamed event at `tick` with priority 0.
    pub fn new<F>(tick: Tick, job: F) -> Self
    where
        F: FnOnce(&mut EventContext<'_>) -> anyhow::Result<()> + 'static,
    {
        Self {
            tick,
            priority: 0,
            name: String::new(),
            job: Box::new(job),
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Higher priority fires first within the same tick.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for TimedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedEvent")
            .field("tick", &self.tick)
            .field("priority", &self.priority)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct TimedEventScheduler {
    timeline: Timeline<TimedEvent>,
}

impl TimedEventScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_event(&mut self, event: TimedEvent) -> EventId {
        let (tick, priority) = (event.tick(), event.priority());
        trace!(tick, priority, name = event.name(), "scheduling event");
        let id = self.timeline.push(tick, priority, event);
        id
    }

    /// Shorthand for a named, priority 0 event running `job`.
    pub fn schedule_function<F>(&mut self, tick: Tick, name: impl Into<String>, job: F) -> EventId
    where
        F: FnOnce(&mut EventContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.schedule_event(TimedEvent::new(tick, job).named(name))
    }

    /// Returns `false` for events that already fired, were already
    /// cancelled, or were never issued.
    pub fn cancel(&mut self, id: EventId) -> bool {
        let cancelled = self.timeline.cancel(id);
        if cancelled {
            trace!(id = id.get(), "event cancelled");
        }
        cancelled
    }

    /// Fire every live event due at or before `tick` and return how many
    /// fired.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::EventFailed`] for the first job that fails.
    /// Due events after it stay queued.
    pub fn advance(&mut self, tick: Tick) -> Result<usize, SchedulerError> {
        self.timeline.begin_pass(tick);
        let mut fired = 0;

        while let Some((key, event)) = self.timeline.pop_due(tick) {
            let TimedEvent { name, job, .. } = event;
            trace!(id = key.id.get(), name = %name, "firing event");

            let mut ctx = EventContext {
                id: key.id,
                name: &name,
                tick,
                scheduler: &mut *self,
            };
            if let Err(source) = job(&mut ctx) {
                return Err(SchedulerError::EventFailed {
                    id: key.id,
                    name,
                    tick,
                    source: source.into(),
                });
            }
            fired += 1;
        }

        debug!(
            tick,
            executed = fired,
            pending = self.timeline.pending_count(),
            "timed events drained"
        );
        Ok(fired)
    }

    /// Same as [`TimedEventScheduler::advance`].
    ///
    /// # Errors
    ///
    /// See [`TimedEventScheduler::advance`].
    pub fn update(&mut self, tick: Tick) -> Result<usize, SchedulerError> {
        self.advance(tick)
    }

    /// Drop every pending event without firing it.
    pub fn clear(&mut self) {
        debug!(dropped = self.timeline.pending_count(), "clearing timed events");
        self.timeline.clear();
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.timeline.pending_count()
    }

    #[must_use]
    pub fn is_pending(&self, id: EventId) -> bool {
        self.timeline.is_pending(id)
    }

    /// Tick of the queue head, which may belong to a cancelled event.
    #[must_use]
    pub fn next_due_tick(&self) -> Option<Tick> {
        self.timeline.next_due_tick()
    }

    #[must_use]
    pub fn last_tick(&self) -> Option<Tick> {
        self.timeline.last_tick()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    fn record(
        log: &Log,
        entry: &str,
    ) -> impl FnOnce(&mut EventContext<'_>) -> anyhow::Result<()> + 'static {
        let log = Rc::clone(log);
        let entry = entry.to_string();
        move |_| {
            log.borrow_mut().push(entry);
            Ok(())
        }
    }

    #[test]
    fn test_order_by_tick_then_priority() {
        let log = Log::default();
        let mut scheduler = TimedEventScheduler::new();

        scheduler.schedule_function(5, "A", record(&log, "A"));
        scheduler.schedule_function(3, "B", record(&log, "B"));
        scheduler.schedule_event(
            TimedEvent::new(5, record(&log, "C"))
                .named("C")
                .with_priority(10),
        );

        assert_eq!(scheduler.advance(5).unwrap(), 3);
        assert_eq!(*log.borrow(), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_equal_priority_keeps_schedule_order() {
        let log = Log::default();
        let mut scheduler = TimedEventScheduler::new();
        for name in ["first", "second", "third"] {
            scheduler.schedule_event(TimedEvent::new(1, record(&log, name)).with_priority(2));
        }
        scheduler.advance(1).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_order_holds_across_several_advances() {
        let log = Log::default();
        let mut scheduler = TimedEventScheduler::new();
        scheduler.schedule_function(4, "late", record(&log, "late"));
        scheduler.schedule_function(2, "early", record(&log, "early"));
        scheduler.schedule_event(TimedEvent::new(2, record(&log, "urgent")).with_priority(1));

        assert_eq!(scheduler.advance(1).unwrap(), 0);
        assert_eq!(scheduler.advance(3).unwrap(), 2);
        assert_eq!(scheduler.advance(4).unwrap(), 1);
        assert_eq!(*log.borrow(), vec!["urgent", "early", "late"]);
    }

    #[test]
    fn test_cancelled_event_never_fires() {
        let log = Log::default();
        let mut scheduler = TimedEventScheduler::new();

        let id = scheduler.schedule_function(4, "X", record(&log, "X"));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));

        assert_eq!(scheduler.advance(10).unwrap(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_job_sees_its_id_and_name() {
        let seen = Rc::new(RefCell::new(None));
        let mut scheduler = TimedEventScheduler::new();

        let sink = Rc::clone(&seen);
        let id = scheduler.schedule_function(1, "scout", move |ctx| {
            *sink.borrow_mut() = Some((ctx.id, ctx.name.to_string(), ctx.tick));
            Ok(())
        });

        scheduler.advance(3).unwrap();
        assert_eq!(*seen.borrow(), Some((id, "scout".to_string(), 3)));
    }

    #[test]
    fn test_follow_up_event_same_tick_fires_in_same_pass() {
        let log = Log::default();
        let mut scheduler = TimedEventScheduler::new();

        let inner = Rc::clone(&log);
        scheduler.schedule_function(2, "Y", move |ctx| {
            inner.borrow_mut().push("Y".into());
            ctx.scheduler.schedule_function(2, "Z", record(&inner, "Z"));
            Ok(())
        });

        assert_eq!(scheduler.advance(2).unwrap(), 2);
        assert_eq!(*log.borrow(), vec!["Y", "Z"]);
    }

    #[test]
    fn test_job_can_cancel_a_later_event() {
        let log = Log::default();
        let mut scheduler = TimedEventScheduler::new();

        let doomed = scheduler.schedule_function(5, "doomed", record(&log, "doomed"));
        scheduler.schedule_function(1, "canceller", move |ctx| {
            assert!(ctx.scheduler.cancel(doomed));
            Ok(())
        });

        assert_eq!(scheduler.advance(10).unwrap(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_failing_job_reports_name_and_keeps_rest() {
        let log = Log::default();
        let mut scheduler = TimedEventScheduler::new();

        let bad = scheduler.schedule_event(
            TimedEvent::new(1, |_| Err(anyhow::anyhow!("no mana"))).named("spell").with_priority(1),
        );
        let next = scheduler.schedule_function(1, "after", record(&log, "after"));

        match scheduler.advance(1) {
            Err(SchedulerError::EventFailed { id, name, .. }) => {
                assert_eq!(id, bad);
                assert_eq!(name, "spell");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(scheduler.is_pending(next));
        assert_eq!(scheduler.advance(1).unwrap(), 1);
        assert_eq!(*log.borrow(), vec!["after"]);
    }

    #[test]
    fn test_clear_then_advance_fires_nothing() {
        let log = Log::default();
        let mut scheduler = TimedEventScheduler::new();
        scheduler.schedule_function(1, "a", record(&log, "a"));
        scheduler.schedule_function(2, "b", record(&log, "b"));

        scheduler.clear();
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.next_due_tick(), None);
        assert_eq!(scheduler.advance(50).unwrap(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_empty_schedule_advance() {
        let mut scheduler = TimedEventScheduler::new();
        assert_eq!(scheduler.advance(100).unwrap(), 0);
    }

    #[test]
    fn test_update_runs_a_drain_pass() {
        let log = Log::default();
        let mut scheduler = TimedEventScheduler::new();
        scheduler.schedule_function(1, "dawn", record(&log, "dawn"));
        let dusk = scheduler.schedule_function(9, "dusk", record(&log, "dusk"));

        assert_eq!(scheduler.update(3).unwrap(), 1);
        assert_eq!(*log.borrow(), vec!["dawn"]);
        assert!(scheduler.is_pending(dusk));
        assert_eq!(scheduler.last_tick(), Some(3));
    }

    #[test]
    fn test_event_builder() {
        let event = TimedEvent::new(4, |_| Ok(())).named("harvest").with_priority(3);
        assert_eq!(event.tick(), 4);
        assert_eq!(event.priority(), 3);
        assert_eq!(event.name(), "harvest");
        assert_eq!(TimedEvent::new(4, |_| Ok(())).name(), "");
    }

    // -- Property tests --

    mod properties {
        use std::collections::{HashMap, HashSet};

        use proptest::prelude::*;
        use proptest::sample::Index;

        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Schedule { tick: Tick, priority: Priority },
            Cancel(Index),
            Advance(Tick),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (0..20i64, -3..=3i32)
                    .prop_map(|(tick, priority)| Op::Schedule { tick, priority }),
                1 => any::<Index>().prop_map(Op::Cancel),
                1 => (0..5i64).prop_map(Op::Advance),
            ]
        }

        /// Checks one drain pass: execution order, due-ness, and that nothing
        /// cancelled or already run fired.
        fn check_pass(
            batch: &[EventId],
            count: usize,
            now: Tick,
            keys: &HashMap<EventId, (Tick, Priority)>,
            cancelled: &HashSet<EventId>,
            ran: &mut HashSet<EventId>,
        ) -> Result<(), TestCaseError> {
            prop_assert_eq!(batch.len(), count);
            for pair in batch.windows(2) {
                let (a, b) = (keys[&pair[0]], keys[&pair[1]]);
                prop_assert!(a.0 <= b.0, "tick went backwards within a pass");
                if a.0 == b.0 {
                    prop_assert!(a.1 >= b.1, "priority rose within a tick");
                    if a.1 == b.1 {
                        prop_assert!(pair[0] < pair[1], "equal keys left schedule order");
                    }
                }
            }
            for id in batch {
                prop_assert!(keys[id].0 <= now, "fired before its tick");
                prop_assert!(!cancelled.contains(id), "cancelled event fired");
                prop_assert!(ran.insert(*id), "event fired twice");
            }
            Ok(())
        }

        proptest! {
            #[test]
            fn test_random_schedule_cancel_advance(ops in prop::collection::vec(op(), 1..80)) {
                let fired: Rc<RefCell<Vec<EventId>>> = Rc::default();
                let mut scheduler = TimedEventScheduler::new();
                let mut keys: HashMap<EventId, (Tick, Priority)> = HashMap::new();
                let mut ids = Vec::new();
                let mut cancelled = HashSet::new();
                let mut ran = HashSet::new();
                let mut executed = 0;
                let mut now = 0;

                for op in ops {
                    match op {
                        Op::Schedule { tick, priority } => {
                            let sink = Rc::clone(&fired);
                            let id = scheduler.schedule_event(
                                TimedEvent::new(tick, move |ctx| {
                                    sink.borrow_mut().push(ctx.id);
                                    Ok(())
                                })
                                .with_priority(priority),
                            );
                            keys.insert(id, (tick, priority));
                            ids.push(id);
                        }
                        Op::Cancel(index) => {
                            if ids.is_empty() {
                                continue;
                            }
                            let id = ids[index.index(ids.len())];
                            let expected = !ran.contains(&id) && !cancelled.contains(&id);
                            prop_assert_eq!(scheduler.cancel(id), expected);
                            if expected {
                                cancelled.insert(id);
                            }
                        }
                        Op::Advance(step) => {
                            now += step;
                            let count = scheduler.advance(now).unwrap();
                            executed += count;
                            let batch = std::mem::take(&mut *fired.borrow_mut());
                            check_pass(&batch, count, now, &keys, &cancelled, &mut ran)?;
                        }
                    }
                }

                now = now.max(20);
                let count = scheduler.advance(now).unwrap();
                executed += count;
                let batch = std::mem::take(&mut *fired.borrow_mut());
                check_pass(&batch, count, now, &keys, &cancelled, &mut ran)?;

                prop_assert_eq!(executed + cancelled.len(), ids.len());
                prop_assert_eq!(scheduler.pending_count(), 0);
                for id in ids {
                    prop_assert!(!scheduler.cancel(id));
                }
            }
        }
    }
}
