//! Combat scenario: entity actions, completion callbacks and deaths.
//!
//! A player (100 HP) and an enemy (50 HP) trade blows:
//!
//! | tick | what is scheduled                                            |
//! |------|--------------------------------------------------------------|
//! | 2, 5, 8 | player regenerates 2 HP, after any same-tick damage       |
//! | 3    | player hits enemy for 15                                      |
//! | 4, 6, 8 | poison hits player for 5                                   |
//! | 5    | enemy hits player for 10                                      |
//! | 6    | a heal on the player, cancelled before the run starts         |
//! | 7    | player hits enemy for 20; if the enemy drops below 20 HP, the |
//! |      | fight is declared won and a finishing blow follows 2 ticks on |
//! | 8    | enemy winds up a heavy blow, chained to land 2 ticks later    |
//! | 10   | the heavy blow, skipped because the enemy died at tick 9      |

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use tickwork_core::{ActionContext, ActionFn, Tick};
use tickwork_entity::Entity;
use tickwork_world::{EventQueue, World};
use tracing::info;

use crate::components::Health;
use crate::config::SimConfig;
use crate::events::{CombatEnded, DamageKind, EntityDamaged};
use crate::helpers::{
    Cadence, deal_damage, schedule_action_chain, schedule_attack,
    schedule_damage_over_time, schedule_delayed_action, schedule_recurring_action,
};
use crate::sim::Simulation;

type Ctx<'a> = ActionContext<'a, World, EventQueue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatReport {
    pub ticks: Tick,
    pub player_health: Option<i32>,
    pub enemy_health: Option<i32>,
    pub winner: Option<Entity>,
    pub actions_run: usize,
    pub damage_taken: i32,
}

/// Run the combat scenario for `config.max_ticks` ticks.
///
/// # Errors
///
/// Returns an error if a scheduled action fails.
pub fn run(config: &SimConfig) -> Result<CombatReport> {
    let mut sim = Simulation::new();
    let player = sim.world.spawn();
    let enemy = sim.world.spawn();
    sim.world.insert(player, Health::full(100))?;
    sim.world.insert(enemy, Health::full(50))?;

    let winner = Rc::new(RefCell::new(None));
    let seen = Rc::clone(&winner);
    sim.events.subscribe(move |ended: &CombatEnded| {
        info!(winner = ?ended.winner, fled = ended.fled, "combat ended");
        *seen.borrow_mut() = ended.winner;
    });

    let damage_taken = Rc::new(RefCell::new(0));
    let total = Rc::clone(&damage_taken);
    sim.events.subscribe(move |hit: &EntityDamaged| {
        info!(
            entity = %hit.entity,
            amount = hit.amount,
            kind = ?hit.kind,
            source = ?hit.source,
            "damage"
        );
        *total.borrow_mut() += hit.amount;
    });

    schedule_script(&mut sim, player, enemy);

    let reports = sim.run(config.max_ticks)?;
    let health = |entity: Entity| sim.world.get::<Health>(entity).ok().map(|h| h.current);

    let report = CombatReport {
        ticks: sim.tick(),
        player_health: health(player),
        enemy_health: health(enemy),
        winner: *winner.borrow(),
        actions_run: reports.iter().map(|r| r.actions).sum(),
        damage_taken: *damage_taken.borrow(),
    };
    info!(?report, "combat scenario finished");
    Ok(report)
}

fn schedule_script(sim: &mut Simulation, player: Entity, enemy: Entity) {
    let actions = &mut sim.actions;

    schedule_recurring_action(
        actions,
        player,
        Cadence {
            start: 2,
            interval: 3,
            count: 3,
        },
        -1,
        |ctx| {
            ctx.world.get_mut::<Health>(ctx.entity)?.heal(2);
            Ok(())
        },
    );

    schedule_attack(actions, player, enemy, 15, 3);

    schedule_damage_over_time(
        actions,
        player,
        5,
        DamageKind::Poison,
        Cadence {
            start: 4,
            interval: 2,
            count: 3,
        },
    );

    schedule_attack(actions, enemy, player, 10, 5);

    let heal = schedule_delayed_action(actions, player, 0, 6, |ctx| {
        ctx.world.get_mut::<Health>(ctx.entity)?.heal(50);
        Ok(())
    });
    actions.cancel(heal);

    actions.schedule_with_completion(
        7,
        player,
        move |ctx| {
            if ctx.world.contains(enemy) {
                deal_damage(
                    ctx.world,
                    ctx.events,
                    enemy,
                    20,
                    Some(ctx.entity),
                    DamageKind::Physical,
                );
            }
            Ok(())
        },
        move |ctx| {
            if ctx.world.get::<Health>(enemy).is_ok_and(|h| h.current < 20) {
                ctx.events.enqueue(CombatEnded {
                    winner: Some(ctx.entity),
                    fled: false,
                });
                schedule_attack(ctx.scheduler, ctx.entity, enemy, 20, ctx.tick + 2);
            }
            Ok(())
        },
    );

    let wind_up: ActionFn<World, EventQueue> = Box::new(|ctx: &mut Ctx<'_>| {
        info!(entity = %ctx.entity, "enemy winds up a heavy blow");
        Ok(())
    });
    let heavy_blow: ActionFn<World, EventQueue> = Box::new(move |ctx: &mut Ctx<'_>| {
        deal_damage(
            ctx.world,
            ctx.events,
            player,
            30,
            Some(ctx.entity),
            DamageKind::Physical,
        );
        Ok(())
    });
    schedule_action_chain(actions, enemy, 0, vec![(8, wind_up), (2, heavy_blow)]);
}
