//! Assembling a cyclotron experiment from configuration
//!
//! The orbit radius `r = m v / (q B)` sets every length scale: the gap
//! half-width is `gap_fraction * r` and the bunch is scattered over
//! `position_spread_fraction * r` in x and y. The gap field oscillates at the
//! cyclotron frequency `ω = q B / m` so that it stays in step with the orbit.

use crate::config::CyclotronConfig;
use crate::error::SimulationResult;
use crate::physics::bunch::Bunch;
use crate::physics::fields::{FieldExt, FieldSet, UniformField};
use crate::physics::integrators::IntegratorRegistry;
use crate::physics::math::{self, Scalar, Vector};
use crate::physics::particle::ChargedParticle;
use crate::simulation::{Cyclotron, DriverSettings};
use bevy::log::info;
use rand::Rng;

/// Derived quantities of the configured experiment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitScales {
    /// Radius of curvature at the mean initial speed
    pub radius: Scalar,
    /// Angular cyclotron frequency
    pub frequency: Scalar,
    /// Mean initial kinetic energy of one particle
    pub energy: Scalar,
    /// Half-width `L` of the gap in y
    pub gap_half_width: Scalar,
}

impl OrbitScales {
    pub fn from_config(config: &CyclotronConfig) -> Self {
        let mass = config.particle.mass;
        let charge = config.particle.charge;
        let flux_density = config.fields.magnetic_flux_density;
        let speed = config.bunch.speed;

        let radius = math::orbit_radius(mass, speed, charge, flux_density);
        Self {
            radius,
            frequency: math::cyclotron_frequency(charge, mass, flux_density),
            energy: 0.5 * mass * speed * speed,
            gap_half_width: config.fields.gap_fraction * radius,
        }
    }
}

/// Static B along z plus the bounded oscillating gap field along y
pub fn build_fields(config: &CyclotronConfig, scales: &OrbitScales) -> SimulationResult<FieldSet> {
    let magnet = UniformField::magnetic_only(Vector::new(
        0.0,
        0.0,
        config.fields.magnetic_flux_density,
    ));
    let gap = UniformField::electric_only(Vector::new(0.0, config.fields.gap_electric_field, 0.0))
        .oscillating(scales.frequency, config.fields.phase)
        .bounded(config.fields.gap_x_extent, scales.gap_half_width, 0.0);

    FieldSet::new(vec![magnet.boxed(), gap.boxed()])
}

/// A bunch of `count` identical particles scattered around the origin
pub fn build_bunch<R: Rng + ?Sized>(
    config: &CyclotronConfig,
    scales: &OrbitScales,
    rng: &mut R,
) -> SimulationResult<Bunch> {
    let template = ChargedParticle::new(config.particle.mass, config.particle.charge)?;
    let mut bunch = Bunch::filled(config.bunch.distribution()?, template, config.bunch.count);

    let position_spread = scales.radius * config.bunch.position_spread_fraction;
    bunch.initialize_positions(
        Vector::ZERO,
        Vector::new(position_spread, position_spread, 0.0),
        rng,
    );
    bunch.initialize_velocities(
        config.bunch.direction(),
        config.bunch.direction_spread(),
        scales.energy,
        scales.energy * config.bunch.energy_spread_fraction,
        rng,
    )?;
    Ok(bunch)
}

/// Build a ready-to-run cyclotron from a validated configuration
pub fn build_cyclotron<R: Rng + ?Sized>(
    config: &CyclotronConfig,
    rng: &mut R,
) -> SimulationResult<Cyclotron> {
    config.validate()?;

    let scales = OrbitScales::from_config(config);
    info!(
        "Orbit radius {} m, cyclotron frequency {} rad/s, gap half-width {} m",
        scales.radius, scales.frequency, scales.gap_half_width
    );

    let fields = build_fields(config, &scales)?;
    let bunch = build_bunch(config, &scales, rng)?;
    info!("Bunch: {}", bunch);

    let integrator = IntegratorRegistry::default().create(&config.simulation.integrator)?;
    info!("Using integrator: {}", integrator.name());

    Cyclotron::new(
        fields,
        bunch,
        integrator,
        DriverSettings {
            time_step: config.simulation.time_step,
            gap_half_width: scales.gap_half_width,
            max_revolutions: config.simulation.max_revolutions,
            max_ticks: config.simulation.max_ticks,
            sample_every: config.simulation.sample_every,
        },
    )
}
