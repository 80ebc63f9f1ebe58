//! Entity-targeted actions.
//!
//! Each action is bound to an [`Entity`] and runs against the caller's
//! [`EntityStore`] and [`EventSink`]. The handle is checked when the action
//! comes due, not when it is scheduled: an earlier action in the same pass
//! may have destroyed it. Actions for dead entities are consumed silently.

use tickwork_entity::Entity;
use tracing::{debug, trace};

use crate::error::SchedulerError;
use crate::id::ActionId;
use crate::store::{EntityStore, EventSink};
use crate::timeline::Timeline;
use crate::{Priority, Tick};

/// Boxed action or completion callback.
pub type ActionFn<W, Q> = Box<dyn FnOnce(&mut ActionContext<'_, W, Q>) -> anyhow::Result<()>>;

/// Published through the [`EventSink`] after every action that ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCompleted {
    pub id: ActionId,
    pub entity: Entity,
    /// Tick of the pass that ran the action.
    pub tick: Tick,
}

/// Everything an action or completion callback gets to work with.
///
/// `scheduler` is the scheduler that is currently draining. Scheduling or
/// cancelling through it is allowed; work scheduled at or before `tick`
/// runs later in the same pass.
pub struct ActionContext<'a, W, Q> {
    pub id: ActionId,
    pub entity: Entity,
    pub tick: Tick,
    pub world: &'a mut W,
    pub events: &'a mut Q,
    pub scheduler: &'a mut EntityActionScheduler<W, Q>,
}

/// An action waiting to be scheduled.
pub struct ScheduledAction<W, Q> {
    tick: Tick,
    priority: Priority,
    entity: Entity,
    action: ActionFn<W, Q>,
    on_complete: Option<ActionFn<W, Q>>,
}

impl<W, Q> ScheduledAction<W, Q> {
    /// An action on `entity` due at `tick`, priority 0, no completion callback.
    pub fn new<F>(tick: Tick, entity: Entity, action: F) -> Self
    where
        F: FnOnce(&mut ActionContext<'_, W, Q>) -> anyhow::Result<()> + 'static,
    {
        Self {
            tick,
            priority: 0,
            entity,
            action: Box::new(action),
            on_complete: None,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Callback run after the action succeeds and its [`ActionCompleted`]
    /// has been published.
    #[must_use]
    pub fn on_complete<F>(mut self, on_complete: F) -> Self
    where
        F: FnOnce(&mut ActionContext<'_, W, Q>) -> anyhow::Result<()> + 'static,
    {
        self.on_complete = Some(Box::new(on_complete));
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
    pub fn entity(&self) -> Entity {
        self.entity
    }
}

impl<W, Q> std::fmt::Debug for ScheduledAction<W, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledAction")
            .field("tick", &self.tick)
            .field("priority", &self.priority)
            .field("entity", &self.entity)
            .field("on_complete", &self.on_complete.is_some())
            .finish_non_exhaustive()
    }
}

/// Schedules actions against entities of a `W` store, publishing into `Q`.
pub struct EntityActionScheduler<W, Q> {
    timeline: Timeline<ScheduledAction<W, Q>>,
}

impl<W, Q> EntityActionScheduler<W, Q> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeline: Timeline::new(),
        }
    }

    /// Queue `action` on `entity` at `tick` with priority 0.
    pub fn schedule<F>(&mut self, tick: Tick, entity: Entity, action: F) -> ActionId
    where
        F: FnOnce(&mut ActionContext<'_, W, Q>) -> anyhow::Result<()> + 'static,
    {
        self.schedule_action(ScheduledAction::new(tick, entity, action))
    }

    /// Queue `action` with a callback that runs after it.
    pub fn schedule_with_completion<F, C>(
        &mut self,
        tick: Tick,
        entity: Entity,
        action: F,
        on_complete: C,
    ) -> ActionId
    where
        F: FnOnce(&mut ActionContext<'_, W, Q>) -> anyhow::Result<()> + 'static,
        C: FnOnce(&mut ActionContext<'_, W, Q>) -> anyhow::Result<()> + 'static,
    {
        self.schedule_action(ScheduledAction::new(tick, entity, action).on_complete(on_complete))
    }

    /// Queue a fully built action and return its id.
    pub fn schedule_action(&mut self, action: ScheduledAction<W, Q>) -> ActionId {
        let (tick, priority, entity) = (action.tick(), action.priority(), action.entity());
        let id = self.timeline.push(tick, priority, action);
        trace!(id = id.get(), tick, priority, entity = %entity, "action scheduled");
        id
    }

    /// Stop `id` from running. Returns `false` if it already ran, was
    /// already cancelled, or was never issued.
    pub fn cancel(&mut self, id: ActionId) -> bool {
        let cancelled = self.timeline.cancel(id);
        if cancelled {
            trace!(id = id.get(), "action cancelled");
        }
        cancelled
    }

    /// Drop every pending action without running it or its callback.
    pub fn clear(&mut self) {
        debug!(dropped = self.timeline.pending_count(), "clearing entity actions");
        self.timeline.clear();
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.timeline.pending_count()
    }

    #[must_use]
    pub fn is_pending(&self, id: ActionId) -> bool {
        self.timeline.is_pending(id)
    }

    /// Tick of the queue head, which may belong to a cancelled action.
    #[must_use]
    pub fn next_due_tick(&self) -> Option<Tick> {
        self.timeline.next_due_tick()
    }

    #[must_use]
    pub fn last_tick(&self) -> Option<Tick> {
        self.timeline.last_tick()
    }
}

impl<W: EntityStore, Q: EventSink> EntityActionScheduler<W, Q> {
    /// Run every live action due at or before `tick`, in order, and return
    /// how many ran.
    ///
    /// For each due action: skip it if its entity is dead; otherwise run it,
    /// publish [`ActionCompleted`], then run its completion callback.
    ///
    /// Ticks are expected to be non-decreasing across calls. Going backwards
    /// is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ActionFailed`] for the first action or
    /// callback that fails. Due actions after it stay queued.
    pub fn advance(
        &mut self,
        tick: Tick,
        world: &mut W,
        events: &mut Q,
    ) -> Result<usize, SchedulerError> {
        self.timeline.begin_pass(tick);
        let mut executed = 0;

        while let Some((key, item)) = self.timeline.pop_due(tick) {
            let id = key.id;
            let ScheduledAction {
                entity,
                action,
                on_complete,
                ..
            } = item;

            if !world.is_alive(entity) {
                trace!(id = id.get(), entity = %entity, "skipping action for dead entity");
                continue;
            }

            let mut ctx = ActionContext {
                id,
                entity,
                tick,
                world: &mut *world,
                events: &mut *events,
                scheduler: &mut *self,
            };
            action(&mut ctx).map_err(|source| SchedulerError::ActionFailed {
                id,
                tick,
                source: source.into(),
            })?;
            executed += 1;

            ctx.events.publish(ActionCompleted { id, entity, tick });

            if let Some(on_complete) = on_complete {
                on_complete(&mut ctx).map_err(|source| SchedulerError::ActionFailed {
                    id,
                    tick,
                    source: source.into(),
                })?;
            }
        }

        debug!(tick, executed, pending = self.timeline.pending_count(), "entity actions drained");
        Ok(executed)
    }

    /// Same as [`EntityActionScheduler::advance`].
    ///
    /// # Errors
    ///
    /// See [`EntityActionScheduler::advance`].
    pub fn update(
        &mut self,
        tick: Tick,
        world: &mut W,
        events: &mut Q,
    ) -> Result<usize, SchedulerError> {
        self.advance(tick, world, events)
    }
}

impl<W, Q> Default for EntityActionScheduler<W, Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W, Q> std::fmt::Debug for EntityActionScheduler<W, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityActionScheduler")
            .field("pending", &self.timeline.pending_count())
            .field("last_tick", &self.timeline.last_tick())
            .finish()
    }
}
