//! Simulation configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Which demo scenarios to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Combat,
    Timed,
    All,
}

impl Scenario {
    #[must_use]
    pub fn includes_combat(self) -> bool {
        matches!(self, Self::Combat | Self::All)
    }

    #[must_use]
    pub fn includes_timed(self) -> bool {
        matches!(self, Self::Timed | Self::All)
    }
}

/// Configuration for a simulation run.
///
/// Missing fields in a config file fall back to [`SimConfig::default`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of ticks each scenario runs for, starting at tick 1.
    pub max_ticks: u32,
    pub scenario: Scenario,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_ticks: 10,
            scenario: Scenario::All,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is malformed or names an unknown scenario.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }
}
