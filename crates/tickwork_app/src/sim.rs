//! Simulation tick loop.
//!
//! Each step:
//!
//! 1. Advance the tick counter.
//! 2. Drain due entity actions against the world.
//! 3. Drain due timed events.
//! 4. Broadcast the events published during the tick.
//! 5. Despawn entities that died this tick.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use tickwork_core::{EntityActionScheduler, Tick, TimedEventScheduler};
use tickwork_world::{EventQueue, World};
use tracing::{debug, info};

use crate::events::EntityDied;

pub type ActionScheduler = EntityActionScheduler<World, EventQueue>;

/// What one step did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub actions: usize,
    pub timed_events: usize,
    pub dispatched: usize,
    pub despawned: usize,
}

/// The world, its event queue and both schedulers, driven one tick at a time.
pub struct Simulation {
    /// Last completed tick. Starts at 0; the first step runs tick 1.
    tick: Tick,
    pub world: World,
    pub events: EventQueue,
    pub actions: ActionScheduler,
    pub timed: TimedEventScheduler,
    graveyard: Rc<RefCell<Vec<EntityDied>>>,
}

impl Simulation {
    #[must_use]
    pub fn new() -> Self {
        let graveyard = Rc::new(RefCell::new(Vec::new()));
        let mut events = EventQueue::new();

        let dead = Rc::clone(&graveyard);
        events.subscribe(move |died: &EntityDied| dead.borrow_mut().push(*died));

        Self {
            tick: 0,
            world: World::new(),
            events,
            actions: ActionScheduler::new(),
            timed: TimedEventScheduler::new(),
            graveyard,
        }
    }

    /// Returns the last completed tick.
    #[must_use]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// Returns the first scheduled action or event that failed. The tick
    /// counter has already moved on; unfinished work runs next step.
    pub fn step(&mut self) -> Result<StepReport> {
        self.tick += 1;
        let tick = self.tick;

        let actions = self.actions.advance(tick, &mut self.world, &mut self.events)?;
        let timed_events = self.timed.advance(tick)?;
        let dispatched = self.events.dispatch();

        let despawned = self
            .graveyard
            .borrow_mut()
            .drain(..)
            .filter(|died| self.world.despawn(died.entity))
            .inspect(|died| {
                info!(tick, entity = %died.entity, killer = ?died.killer, "entity died");
            })
            .count();

        let report = StepReport {
            actions,
            timed_events,
            dispatched,
            despawned,
        };
        debug!(tick, ?report, "tick complete");
        Ok(report)
    }

    /// Run `ticks` steps.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step.
    pub fn run(&mut self, ticks: u32) -> Result<Vec<StepReport>> {
        info!(ticks, "starting simulation");
        let reports = (0..ticks).map(|_| self.step()).collect::<Result<Vec<_>>>()?;
        info!(
            tick = self.tick,
            executed = reports.iter().map(|r| r.actions + r.timed_events).sum::<usize>(),
            dispatched = reports.iter().map(|r| r.dispatched).sum::<usize>(),
            despawned = reports.iter().map(|r| r.despawned).sum::<usize>(),
            "simulation complete"
        );
        Ok(reports)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
