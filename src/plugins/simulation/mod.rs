//! Simulation plugin
//!
//! Builds the cyclotron run from the configuration at startup and advances it
//! a batch of ticks on every app update. When the run reaches its revolution
//! target (or fails) the plugin logs the outcome and requests an app exit.

use crate::prelude::*;

mod physics;

pub use physics::{ActiveRun, advance_run, start_run};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Setup,
    Advance,
}

pub struct SimulationPlugin {
    config: Option<CyclotronConfig>,
}

impl SimulationPlugin {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn with_config(config: CyclotronConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone().unwrap_or_else(|| {
            CyclotronConfig::load(None).unwrap_or_else(|e| {
                warn!("Failed to load configuration, using defaults: {}", e);
                CyclotronConfig::default()
            })
        });

        match config.to_toml() {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        app.insert_resource(SharedRng::from_optional_seed(config.simulation.seed));
        app.insert_resource(config);

        app.add_systems(Startup, start_run.in_set(SimulationSet::Setup));
        app.add_systems(Update, advance_run.in_set(SimulationSet::Advance));
    }
}
