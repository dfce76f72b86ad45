use crate::config::CyclotronConfig;
use crate::error::SimulationResult;
use crate::resources::SharedRng;
use crate::simulation::{CsvTrajectoryWriter, Cyclotron, RunReport, TrajectorySink, build_cyclotron};
use bevy::prelude::*;
use chrono::{DateTime, Local};

/// The cyclotron being driven by the app, together with its trajectory output
#[derive(Resource)]
pub struct ActiveRun {
    cyclotron: Cyclotron,
    sink: Box<dyn TrajectorySink + Send + Sync>,
    ticks_per_update: u64,
    started_at: DateTime<Local>,
}

impl ActiveRun {
    pub fn new(
        cyclotron: Cyclotron,
        sink: Box<dyn TrajectorySink + Send + Sync>,
        ticks_per_update: u64,
    ) -> Self {
        Self {
            cyclotron,
            sink,
            ticks_per_update,
            started_at: Local::now(),
        }
    }

    /// Build the configured experiment, writing its trajectory to the output CSV
    pub fn from_config(config: &CyclotronConfig, rng: &mut SharedRng) -> SimulationResult<Self> {
        let cyclotron = build_cyclotron(config, &mut **rng)?;
        let path = config.output_path();
        let sink = CsvTrajectoryWriter::create(&path)?;
        info!("Writing trajectory to {}", path.display());

        Ok(Self::new(
            cyclotron,
            Box::new(sink),
            config.simulation.ticks_per_update,
        ))
    }

    pub fn cyclotron(&self) -> &Cyclotron {
        &self.cyclotron
    }

    /// Run up to one batch of ticks; returns the report once the run is complete
    pub fn advance(&mut self) -> SimulationResult<Option<RunReport>> {
        for _ in 0..self.ticks_per_update {
            if self.cyclotron.is_finished() {
                break;
            }
            self.cyclotron.check_budget()?;
            self.cyclotron.tick(self.sink.as_mut())?;
        }

        if self.cyclotron.is_finished() {
            return self.cyclotron.report().map(Some);
        }
        Ok(None)
    }

    pub fn elapsed_millis(&self) -> i64 {
        (Local::now() - self.started_at).num_milliseconds()
    }
}

/// Build the run from the configuration, or exit with an error
pub fn start_run(
    mut commands: Commands,
    config: Res<CyclotronConfig>,
    mut rng: ResMut<SharedRng>,
    mut exit: EventWriter<AppExit>,
) {
    match ActiveRun::from_config(&config, &mut rng) {
        Ok(run) => {
            commands.insert_resource(run);
        }
        Err(e) => {
            error!("Failed to set up the cyclotron: {}", e);
            exit.write(AppExit::error());
        }
    }
}

/// Advance the active run by one batch and exit once it is over
pub fn advance_run(
    mut commands: Commands,
    run: Option<ResMut<ActiveRun>>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(mut run) = run else {
        return;
    };

    match run.advance() {
        Ok(None) => {
            let cyclotron = run.cyclotron();
            debug!(
                "t = {} s after {} ticks, {} revolutions",
                cyclotron.clock().time(),
                cyclotron.clock().ticks(),
                cyclotron.revolutions()
            );
        }
        Ok(Some(report)) => {
            info!("Run finished in {} ms", run.elapsed_millis());
            info!("{}", report);
            commands.remove_resource::<ActiveRun>();
            exit.write(AppExit::Success);
        }
        Err(e) => {
            error!("Simulation failed: {}", e);
            commands.remove_resource::<ActiveRun>();
            exit.write(AppExit::error());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::simulation::SimulationPlugin;
    use std::path::PathBuf;

    fn output_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cyclotron_{}_{}.csv", name, std::process::id()))
    }

    /// Three protons starting at the origin on plain circular orbits, about
    /// 656 ticks per revolution
    fn quick_config(name: &str) -> CyclotronConfig {
        let mut config = CyclotronConfig::default();
        config.bunch.count = 3;
        config.bunch.position_spread_fraction = 0.0;
        config.fields.gap_electric_field = 0.0;
        config.simulation.time_step = 1.0e-3;
        config.simulation.max_revolutions = 1;
        config.simulation.sample_every = 10;
        config.simulation.ticks_per_update = 200;
        config.simulation.seed = Some(7);
        config.output.path = Some(output_path(name));
        config
    }

    fn run_until_exit(app: &mut App, max_updates: usize) -> Option<AppExit> {
        for _ in 0..max_updates {
            app.update();
            if let Some(exit) = app.should_exit() {
                return Some(exit);
            }
        }
        None
    }

    #[test]
    fn test_run_completes_and_writes_trajectory() {
        let config = quick_config("complete");
        let path = config.output_path();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin::with_config(config));

        app.update();
        assert!(app.world().get_resource::<ActiveRun>().is_some());
        assert_eq!(app.should_exit(), None);

        let exit = run_until_exit(&mut app, 20);
        assert_eq!(exit, Some(AppExit::Success));
        assert!(app.world().get_resource::<ActiveRun>().is_none());

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines.len() > 50, "only {} samples", lines.len());
        for line in lines {
            let (x, y) = line.split_once(',').unwrap();
            assert!(x.parse::<f64>().unwrap().is_finite());
            assert!(y.parse::<f64>().unwrap().is_finite());
        }
    }

    #[test]
    fn test_exhausted_tick_budget_exits_with_error() {
        let mut config = quick_config("budget");
        config.simulation.max_ticks = 50;
        let path = config.output_path();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin::with_config(config));

        let exit = run_until_exit(&mut app, 5);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(exit, Some(AppExit::Error(_))));
        assert!(app.world().get_resource::<ActiveRun>().is_none());
    }

    #[test]
    fn test_unknown_integrator_exits_at_startup() {
        let mut config = quick_config("unknown");
        config.simulation.integrator = "leapfrog".to_string();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin::with_config(config));
        app.update();

        assert!(matches!(app.should_exit(), Some(AppExit::Error(_))));
        assert!(app.world().get_resource::<ActiveRun>().is_none());
    }

    #[test]
    fn test_plugin_seeds_the_shared_rng() {
        let config = quick_config("seed");

        let mut app = App::new();
        app.add_plugins(SimulationPlugin::with_config(config));

        assert_eq!(
            *app.world().resource::<SharedRng>(),
            SharedRng::from_seed(7)
        );
    }
}
