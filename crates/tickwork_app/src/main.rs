//! # tickwork_app — simulation driver
//!
//! Runs the demo scenarios on top of the tickwork schedulers, one logical
//! tick after another with no wall-clock pacing.
//!
//! Configuration comes from `SimConfig::default()`, optionally replaced by a
//! JSON file (`--config`), with individual CLI flags applied last. Logging
//! honours `RUST_LOG` and defaults to `tickwork_app=info`.

mod combat;
mod components;
mod config;
mod events;
mod helpers;
mod sim;
mod timed;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Scenario, SimConfig};

#[derive(Parser)]
#[command(name = "tickwork_app", about = "Run the tickwork scheduling scenarios")]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long)]
    ticks: Option<u32>,

    /// Scenario to run
    #[arg(short, long, value_enum)]
    scenario: Option<Scenario>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tickwork_app=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config = config.with_max_ticks(ticks);
    }
    if let Some(scenario) = args.scenario {
        config = config.with_scenario(scenario);
    }

    info!(max_ticks = config.max_ticks, scenario = ?config.scenario, "tickwork starting");

    if config.scenario.includes_combat() {
        let report = combat::run(&config)?;
        info!(
            ticks = report.ticks,
            player_health = ?report.player_health,
            enemy_health = ?report.enemy_health,
            winner = ?report.winner,
            actions = report.actions_run,
            damage_taken = report.damage_taken,
            "combat report"
        );
    }

    if config.scenario.includes_timed() {
        let report = timed::run(&config)?;
        info!(
            fired = report.fired.len(),
            pending = report.still_pending,
            "timed report"
        );
    }

    info!("tickwork finished");
    Ok(())
}
