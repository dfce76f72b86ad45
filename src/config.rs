//! Run configuration
//!
//! Values are layered, later layers winning: built-in defaults, a TOML file
//! (an explicit path, or `config.toml` in the user's config directory when it
//! exists), then `CYCLOTRON_<SECTION>__<KEY>` environment variables. The CLI
//! applies its own overrides on top.

use crate::error::{SimulationError, SimulationResult};
use crate::physics::bunch::Distribution;
use crate::physics::math::{self, Scalar, Vector};
use bevy::log::{debug, info};
use bevy::prelude::Resource;
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct CyclotronConfig {
    pub particle: ParticleConfig,
    pub bunch: BunchConfig,
    pub fields: FieldsConfig,
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
}

/// The species every bunch member belongs to
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    /// Mass in kilograms
    pub mass: Scalar,
    /// Charge in coulombs
    pub charge: Scalar,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            mass: math::PROTON_MASS,
            charge: math::PROTON_CHARGE,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BunchConfig {
    pub count: usize,
    /// `uniform` / `u` or `gaussian` / `g`
    pub distribution: String,
    /// Mean initial speed in m/s
    pub speed: Scalar,
    pub direction: [Scalar; 3],
    pub direction_spread: [Scalar; 3],
    /// Position spread in x and y, as a fraction of the orbit radius
    pub position_spread_fraction: Scalar,
    /// Energy spread as a fraction of the mean kinetic energy
    pub energy_spread_fraction: Scalar,
}

impl Default for BunchConfig {
    fn default() -> Self {
        Self {
            count: 15,
            distribution: "uniform".to_string(),
            speed: 1.0e-3,
            direction: [0.0, 1.0, 0.0],
            direction_spread: [0.0, 0.0, 0.0],
            position_spread_fraction: 0.01,
            energy_spread_fraction: 0.0,
        }
    }
}

impl BunchConfig {
    pub fn distribution(&self) -> SimulationResult<Distribution> {
        self.distribution.parse()
    }

    pub fn direction(&self) -> Vector {
        Vector::from_array(self.direction)
    }

    pub fn direction_spread(&self) -> Vector {
        Vector::from_array(self.direction_spread)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FieldsConfig {
    /// Static flux density along z, in tesla
    pub magnetic_flux_density: Scalar,
    /// Peak gap field along y, in V/m
    pub gap_electric_field: Scalar,
    /// Phase of the gap oscillation in radians
    pub phase: Scalar,
    /// Gap half-width in y, as a fraction of the orbit radius
    pub gap_fraction: Scalar,
    /// Gap half-extent in x, in metres
    pub gap_x_extent: Scalar,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            magnetic_flux_density: 1.0e-7,
            gap_electric_field: 1.0e-7,
            phase: std::f64::consts::PI,
            gap_fraction: 0.05,
            gap_x_extent: 999.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub integrator: String,
    pub time_step: Scalar,
    pub max_revolutions: u32,
    pub max_ticks: u64,
    pub sample_every: u64,
    /// Ticks run per app update
    pub ticks_per_update: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            integrator: "euler_cromer".to_string(),
            time_step: 1.0e-5,
            max_revolutions: 10,
            max_ticks: 100_000_000,
            sample_every: 100,
            ticks_per_update: 10_000,
            seed: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Trajectory CSV path; `plot_<integrator>.csv` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl CyclotronConfig {
    /// `<user config dir>/config.toml`, if the platform has a config directory
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "cyclotron").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the layered configuration
    ///
    /// An explicit `path` must exist; the user config file is optional.
    pub fn load(path: Option<&Path>) -> SimulationResult<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                if let Some(user_path) = Self::user_config_path() {
                    debug!("Looking for user configuration at {}", user_path.display());
                    builder = builder.add_source(
                        File::from(user_path)
                            .format(FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix("CYCLOTRON")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Parse a configuration from TOML text; missing keys take their defaults
    pub fn from_toml(content: &str) -> SimulationResult<Self> {
        toml::from_str(content).map_err(|e| SimulationError::InvalidConfig(e.to_string()))
    }

    pub fn to_toml(&self) -> SimulationResult<String> {
        toml::to_string_pretty(self).map_err(|e| SimulationError::InvalidConfig(e.to_string()))
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> SimulationResult<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Where the trajectory goes
    pub fn output_path(&self) -> PathBuf {
        self.output
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("plot_{}.csv", self.simulation.integrator)))
    }

    pub fn validate(&self) -> SimulationResult<()> {
        fn invalid(message: String) -> SimulationResult<()> {
            Err(SimulationError::InvalidConfig(message))
        }

        if !(self.particle.mass.is_finite() && self.particle.mass > 0.0) {
            return Err(SimulationError::NonPositiveMass(self.particle.mass));
        }
        if self.particle.charge == 0.0 {
            return invalid("particle charge must be non-zero to orbit".to_string());
        }
        if self.bunch.count == 0 {
            return invalid("bunch must contain at least one particle".to_string());
        }
        self.bunch.distribution()?;
        if self.bunch.direction().length_squared() == 0.0 {
            return invalid("bunch direction must be non-zero".to_string());
        }
        if !(self.bunch.speed.is_finite() && self.bunch.speed > 0.0) {
            return invalid(format!("bunch speed must be positive, got {}", self.bunch.speed));
        }
        let flux_density = self.fields.magnetic_flux_density;
        if flux_density == 0.0 || !flux_density.is_finite() {
            return invalid(format!(
                "magnetic flux density must be non-zero, got {flux_density}"
            ));
        }
        if !(self.fields.gap_fraction.is_finite() && self.fields.gap_fraction > 0.0) {
            return invalid(format!(
                "gap fraction must be positive, got {}",
                self.fields.gap_fraction
            ));
        }
        if self.fields.gap_x_extent < 0.0 {
            return invalid("gap x extent must not be negative".to_string());
        }
        if !(self.simulation.time_step.is_finite() && self.simulation.time_step > 0.0) {
            return invalid(format!(
                "time step must be positive, got {}",
                self.simulation.time_step
            ));
        }
        if self.simulation.max_revolutions == 0 {
            return invalid("max_revolutions must be at least 1".to_string());
        }
        if self.simulation.sample_every == 0 {
            return invalid("sample_every must be at least 1".to_string());
        }
        if self.simulation.ticks_per_update == 0 {
            return invalid("ticks_per_update must be at least 1".to_string());
        }
        Ok(())
    }
}
