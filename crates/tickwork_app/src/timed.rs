//! Timed event scenario: priorities, follow-ups and cancellation.
//!
//! - tick 1: `game-start` (priority 10)
//! - tick 3: `scout-report`, which queues `reinforcements` two ticks later
//!   with priority 1
//! - tick 4: `ambush`, cancelled before the run starts
//! - tick 5: `nightfall`, fired after `reinforcements`

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use tickwork_core::{EventContext, TimedEvent};
use tracing::info;

use crate::config::SimConfig;
use crate::sim::Simulation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedReport {
    /// `(tick, name)` of every event that fired, in firing order.
    pub fired: Vec<(i64, String)>,
    pub still_pending: usize,
}

type FiredLog = Rc<RefCell<Vec<(i64, String)>>>;

fn announce(log: &FiredLog) -> impl FnOnce(&mut EventContext<'_>) -> Result<()> + 'static {
    let log = Rc::clone(log);
    move |ctx| {
        info!(tick = ctx.tick, event = ctx.name, "event fired");
        log.borrow_mut().push((ctx.tick, ctx.name.to_string()));
        Ok(())
    }
}

/// Run the timed event scenario for `config.max_ticks` ticks.
///
/// # Errors
///
/// Returns an error if an event job fails.
pub fn run(config: &SimConfig) -> Result<TimedReport> {
    let mut sim = Simulation::new();
    let log = FiredLog::default();

    let timed = &mut sim.timed;
    timed.schedule_event(TimedEvent::new(1, announce(&log)).named("game-start").with_priority(10));

    let follow_up = Rc::clone(&log);
    timed.schedule_function(3, "scout-report", move |ctx| {
        let tick = ctx.tick;
        announce(&follow_up)(&mut *ctx)?;
        let reinforcements = TimedEvent::new(tick + 2, announce(&follow_up))
            .named("reinforcements")
            .with_priority(1);
        ctx.scheduler.schedule_event(reinforcements);
        Ok(())
    });

    let ambush = timed.schedule_function(4, "ambush", announce(&log));
    timed.cancel(ambush);

    timed.schedule_function(5, "nightfall", announce(&log));

    sim.run(config.max_ticks)?;

    let report = TimedReport {
        fired: log.borrow().clone(),
        still_pending: sim.timed.pending_count(),
    };
    info!(fired = report.fired.len(), "timed scenario finished");
    Ok(report)
}
