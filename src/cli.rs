//! Command line interface for the cyclotron simulation

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::CyclotronConfig;
use crate::error::SimulationError;
use crate::physics::bunch::Distribution;
use crate::physics::integrators::registry::IntegratorRegistry;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),
    /// Invalid integrator name provided
    #[error("Invalid integrator: {0}")]
    InvalidIntegrator(String),
    /// Unrecognised bunch distribution
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),
}

/// Charged-particle bunch acceleration in a cyclotron
#[derive(Parser, Debug)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_DATE"), ")"), about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Integrator type (e.g., euler, euler_cromer, rk4)
    #[arg(short = 'i', long, value_name = "TYPE")]
    pub integrator: Option<String>,

    /// Number of particles in the bunch (overrides config file)
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub particles: Option<usize>,

    /// Random distribution for the initial bunch (uniform or gaussian)
    #[arg(short = 'd', long, value_name = "KIND")]
    pub distribution: Option<String>,

    /// Number of revolutions to simulate
    #[arg(short = 'r', long, value_name = "COUNT")]
    pub revolutions: Option<u32>,

    /// Initial time step in seconds
    #[arg(short = 't', long, value_name = "SECONDS")]
    pub time_step: Option<f64>,

    /// Give up after this many ticks
    #[arg(long, value_name = "TICKS")]
    pub max_ticks: Option<u64>,

    /// Random seed for the initial bunch
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Trajectory CSV path
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// List available integrators and exit
    #[arg(long)]
    pub list_integrators: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

/// Handles the --list-integrators flag by printing available integrators
pub fn handle_list_integrators() {
    let registry = IntegratorRegistry::new().with_standard_integrators();
    println!("Available integrators:");
    for name in registry.list_available() {
        println!("  - {name}");
    }

    let aliases = registry.list_aliases();
    if !aliases.is_empty() {
        println!("\nAliases:");
        for (alias, target) in aliases {
            println!("  - {alias} -> {target}");
        }
    }
}

/// Loads the layered configuration, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<CyclotronConfig, CliError> {
    let mut config = CyclotronConfig::load(args.config.as_deref())
        .map_err(|e| CliError::ConfigLoad(e.to_string()))?;
    apply_overrides(args, &mut config)?;
    Ok(config)
}

/// Apply every flag that was given on the command line
pub fn apply_overrides(args: &Args, config: &mut CyclotronConfig) -> Result<(), CliError> {
    if let Some(integrator) = &args.integrator {
        let registry = IntegratorRegistry::new().with_standard_integrators();
        registry
            .create(integrator)
            .map_err(|e| CliError::InvalidIntegrator(e.to_string()))?;

        println!("Using integrator: {integrator}");
        config.simulation.integrator = integrator.clone();
    }

    if let Some(count) = args.particles {
        println!("Overriding particle count to: {count}");
        config.bunch.count = count;
    }

    if let Some(distribution) = &args.distribution {
        let kind: Distribution = distribution
            .parse()
            .map_err(|e: SimulationError| CliError::InvalidDistribution(e.to_string()))?;
        println!("Using {kind} distribution");
        config.bunch.distribution = kind.name().to_string();
    }

    if let Some(revolutions) = args.revolutions {
        println!("Overriding revolution count to: {revolutions}");
        config.simulation.max_revolutions = revolutions;
    }

    if let Some(time_step) = args.time_step {
        println!("Overriding time step to: {time_step} s");
        config.simulation.time_step = time_step;
    }

    if let Some(max_ticks) = args.max_ticks {
        println!("Overriding tick budget to: {max_ticks}");
        config.simulation.max_ticks = max_ticks;
    }

    if let Some(seed) = args.seed {
        println!("Using random seed: {seed}");
        config.simulation.seed = Some(seed);
    }

    if let Some(output) = &args.output {
        println!("Writing trajectory to: {}", output.display());
        config.output.path = Some(output.clone());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(arguments: &[&str]) -> Args {
        Args::parse_from(std::iter::once("cyclotron").chain(arguments.iter().copied()))
    }

    #[test]
    fn test_no_flags_leave_config_untouched() {
        let args = parse(&[]);
        let mut config = CyclotronConfig::default();

        apply_overrides(&args, &mut config).unwrap();

        assert_eq!(config, CyclotronConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "-i", "rk4", "-n", "4", "-d", "G", "-r", "2", "-t", "0.001", "--max-ticks", "900",
            "-s", "11", "-o", "orbit.csv",
        ]);
        let mut config = CyclotronConfig::default();

        apply_overrides(&args, &mut config).unwrap();

        assert_eq!(config.simulation.integrator, "rk4");
        assert_eq!(config.bunch.count, 4);
        assert_eq!(config.bunch.distribution, "gaussian");
        assert_eq!(config.simulation.max_revolutions, 2);
        assert_eq!(config.simulation.time_step, 0.001);
        assert_eq!(config.simulation.max_ticks, 900);
        assert_eq!(config.simulation.seed, Some(11));
        assert_eq!(config.output_path(), PathBuf::from("orbit.csv"));
    }

    #[test]
    fn test_unknown_integrator_is_rejected() {
        let args = parse(&["--integrator", "leapfrog"]);
        let mut config = CyclotronConfig::default();

        let error = apply_overrides(&args, &mut config).unwrap_err();

        assert!(matches!(error, CliError::InvalidIntegrator(_)));
        assert!(error.to_string().contains("leapfrog"));
        assert_eq!(config.simulation.integrator, "euler_cromer");
    }

    #[test]
    fn test_unknown_distribution_is_rejected() {
        let args = parse(&["--distribution", "poisson"]);
        let mut config = CyclotronConfig::default();

        assert!(matches!(
            apply_overrides(&args, &mut config),
            Err(CliError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn test_flags_parse() {
        let args = parse(&["--list-integrators", "--verbose", "--config", "run.toml"]);

        assert!(args.list_integrators);
        assert!(args.verbose);
        assert!(!args.print_config);
        assert_eq!(args.config, Some(PathBuf::from("run.toml")));
    }
}
