use bevy::app::ScheduleRunnerPlugin;
use bevy::log::{Level, LogPlugin};
use clap::Parser;
use cyclotron::cli::{self, Args};
use cyclotron::prelude::*;
use std::time::Duration;

fn main() -> AppExit {
    let args = Args::parse();

    if args.list_integrators {
        cli::handle_list_integrators();
        return AppExit::Success;
    }

    let config = match cli::load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return AppExit::error();
        }
    };

    if args.print_config {
        return match config.to_toml() {
            Ok(toml_string) => {
                print!("{toml_string}");
                AppExit::Success
            }
            Err(e) => {
                eprintln!("Error: {e}");
                AppExit::error()
            }
        };
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        return AppExit::error();
    }

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)),
            LogPlugin {
                level,
                ..default()
            },
            SimulationPlugin::with_config(config),
        ))
        .run()
}
