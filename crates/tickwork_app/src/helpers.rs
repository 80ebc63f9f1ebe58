//! Scheduling helpers for common combat patterns.
//!
//! Every helper works on any [`EntityStore`] / [`EventSink`] pair and returns
//! the ids it scheduled, so callers can cancel them later.

use std::collections::VecDeque;

use tickwork_core::{
    ActionContext, ActionFn, ActionId, EntityActionScheduler, EntityStore, EventSink, Priority,
    ScheduledAction, Tick,
};
use tickwork_entity::Entity;

use crate::components::Health;
use crate::events::{DamageKind, EntityDamaged, EntityDied};

/// Evenly spaced ticks: `start`, `start + interval`, ... (`count` of them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub start: Tick,
    pub interval: Tick,
    pub count: u32,
}

impl Cadence {
    pub fn ticks(self) -> impl Iterator<Item = Tick> {
        (0..self.count).map(move |i| self.start + Tick::from(i) * self.interval)
    }
}

/// Subtract `amount` from `target`'s health and publish what happened.
///
/// Targets that are already dead or have no [`Health`] are left alone.
/// Returns `true` if damage was dealt.
pub fn deal_damage<W, Q>(
    world: &mut W,
    events: &mut Q,
    target: Entity,
    amount: i32,
    source: Option<Entity>,
    kind: DamageKind,
) -> bool
where
    W: EntityStore,
    Q: EventSink,
{
    let Some(health) = world.component_mut::<Health>(target) else {
        return false;
    };
    if health.is_dead() {
        return false;
    }

    health.current -= amount;
    let died = health.is_dead();

    events.publish(EntityDamaged {
        entity: target,
        amount,
        source,
        kind,
    });
    if died {
        events.publish(EntityDied {
            entity: target,
            killer: source,
        });
    }
    true
}

/// Damage `target` once per tick of `cadence`.
pub fn schedule_damage_over_time<W, Q>(
    scheduler: &mut EntityActionScheduler<W, Q>,
    target: Entity,
    damage: i32,
    kind: DamageKind,
    cadence: Cadence,
) -> Vec<ActionId>
where
    W: EntityStore,
    Q: EventSink,
{
    cadence
        .ticks()
        .map(|tick| {
            scheduler.schedule(tick, target, move |ctx| {
                deal_damage(ctx.world, ctx.events, ctx.entity, damage, None, kind);
                Ok(())
            })
        })
        .collect()
}

/// `attacker` hits `target` for `damage` at `tick`.
///
/// The action belongs to the attacker: it is skipped if the attacker is dead
/// by then, and does nothing if the target is.
pub fn schedule_attack<W, Q>(
    scheduler: &mut EntityActionScheduler<W, Q>,
    attacker: Entity,
    target: Entity,
    damage: i32,
    tick: Tick,
) -> ActionId
where
    W: EntityStore,
    Q: EventSink,
{
    scheduler.schedule(tick, attacker, move |ctx| {
        if ctx.world.is_alive(target) {
            deal_damage(
                ctx.world,
                ctx.events,
                target,
                damage,
                Some(ctx.entity),
                DamageKind::Physical,
            );
        }
        Ok(())
    })
}

/// Run `action` on `entity` `delay` ticks after `now`.
pub fn schedule_delayed_action<W, Q, F>(
    scheduler: &mut EntityActionScheduler<W, Q>,
    entity: Entity,
    now: Tick,
    delay: Tick,
    action: F,
) -> ActionId
where
    F: FnOnce(&mut ActionContext<'_, W, Q>) -> anyhow::Result<()> + 'static,
{
    scheduler.schedule(now + delay, entity, action)
}

/// Run a copy of `action` on `entity` at every tick of `cadence`.
pub fn schedule_recurring_action<W, Q, F>(
    scheduler: &mut EntityActionScheduler<W, Q>,
    entity: Entity,
    cadence: Cadence,
    priority: Priority,
    action: F,
) -> Vec<ActionId>
where
    F: Fn(&mut ActionContext<'_, W, Q>) -> anyhow::Result<()> + Clone + 'static,
{
    cadence
        .ticks()
        .map(|tick| {
            let action = ScheduledAction::new(tick, entity, action.clone()).with_priority(priority);
            scheduler.schedule_action(action)
        })
        .collect()
}

/// Run `steps` on `entity` one after another.
///
/// The first step runs `delay` ticks after `now`; each later step is
/// scheduled from the previous step's completion callback, `delay` ticks
/// after the tick it ran at. A step that is skipped or fails ends the chain.
///
/// Returns the id of the first step, or `None` if `steps` is empty.
pub fn schedule_action_chain<W, Q>(
    scheduler: &mut EntityActionScheduler<W, Q>,
    entity: Entity,
    now: Tick,
    steps: Vec<(Tick, ActionFn<W, Q>)>,
) -> Option<ActionId>
where
    W: 'static,
    Q: 'static,
{
    let mut steps: VecDeque<_> = steps.into();
    let (delay, first) = steps.pop_front()?;
    Some(schedule_chain_step(scheduler, entity, now + delay, first, steps))
}

fn schedule_chain_step<W, Q>(
    scheduler: &mut EntityActionScheduler<W, Q>,
    entity: Entity,
    tick: Tick,
    action: ActionFn<W, Q>,
    mut rest: VecDeque<(Tick, ActionFn<W, Q>)>,
) -> ActionId
where
    W: 'static,
    Q: 'static,
{
    scheduler.schedule_action(ScheduledAction::new(tick, entity, action).on_complete(move |ctx| {
        if let Some((delay, next)) = rest.pop_front() {
            schedule_chain_step(ctx.scheduler, ctx.entity, ctx.tick + delay, next, rest);
        }
        Ok(())
    }))
}
