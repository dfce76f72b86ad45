//! A bunch of charged particles advanced together
//!
//! The bunch only stores its members. Every aggregate (mean position, mean
//! velocity, kinetic-energy statistics) is recomputed on demand.

use crate::error::{SimulationError, SimulationResult};
use crate::physics::math::{self, Scalar, Vector};
use crate::physics::particle::ChargedParticle;
use rand::Rng;
use rand_distr::StandardNormal;
use std::fmt;
use std::str::FromStr;

/// How initial positions, directions and energies are scattered around their means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    /// `mean + spread * U[-1, 1]`
    #[default]
    Uniform,
    /// `mean + spread * N(0, 1)`
    Gaussian,
}

impl Distribution {
    pub fn sample<R: Rng + ?Sized>(&self, mean: Scalar, spread: Scalar, rng: &mut R) -> Scalar {
        let deviate: Scalar = match self {
            Distribution::Uniform => rng.random_range(-1.0..=1.0),
            Distribution::Gaussian => rng.sample(StandardNormal),
        };
        mean + spread * deviate
    }

    /// Sample each component independently
    pub fn sample_vector<R: Rng + ?Sized>(
        &self,
        mean: Vector,
        spread: Vector,
        rng: &mut R,
    ) -> Vector {
        Vector::new(
            self.sample(mean.x, spread.x, rng),
            self.sample(mean.y, spread.y, rng),
            self.sample(mean.z, spread.z, rng),
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Uniform => "uniform",
            Distribution::Gaussian => "gaussian",
        }
    }
}

impl FromStr for Distribution {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "uniform" => Ok(Distribution::Uniform),
            "g" | "gaussian" => Ok(Distribution::Gaussian),
            _ => Err(SimulationError::UnsupportedDistribution(s.to_string())),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered collection of charged particles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bunch {
    particles: Vec<ChargedParticle>,
    distribution: Distribution,
}

impl Bunch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distribution(distribution: Distribution) -> Self {
        Self {
            particles: Vec::new(),
            distribution,
        }
    }

    /// A bunch of `count` copies of `template`, ready to be scattered
    pub fn filled(distribution: Distribution, template: ChargedParticle, count: usize) -> Self {
        Self {
            particles: vec![template; count],
            distribution,
        }
    }

    pub fn add_particle(&mut self, particle: ChargedParticle) {
        self.particles.push(particle);
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    pub fn set_distribution(&mut self, distribution: Distribution) {
        self.distribution = distribution;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChargedParticle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ChargedParticle> {
        self.particles.iter_mut()
    }

    pub fn particles(&self) -> &[ChargedParticle] {
        &self.particles
    }

    /// Scatter every member's position around `mean`, component by component
    pub fn initialize_positions<R: Rng + ?Sized>(
        &mut self,
        mean: Vector,
        spread: Vector,
        rng: &mut R,
    ) {
        let distribution = self.distribution;
        for particle in &mut self.particles {
            particle.set_position(distribution.sample_vector(mean, spread, rng));
        }
    }

    /// Give every member a velocity drawn around a mean direction and energy
    ///
    /// The sampled direction is normalized and the sampled energy clamped at
    /// zero before the speed `sqrt(2E/m)` is applied.
    pub fn initialize_velocities<R: Rng + ?Sized>(
        &mut self,
        direction: Vector,
        direction_spread: Vector,
        energy: Scalar,
        energy_spread: Scalar,
        rng: &mut R,
    ) -> SimulationResult<()> {
        if direction.length_squared() == 0.0 {
            return Err(SimulationError::InvalidConfig(
                "mean velocity direction must be non-zero".to_string(),
            ));
        }

        let distribution = self.distribution;
        for particle in &mut self.particles {
            let sampled = distribution.sample_vector(direction, direction_spread, rng);
            let unit = sampled.try_normalize().unwrap_or_else(|| direction.normalize());
            let energy = distribution.sample(energy, energy_spread, rng).max(0.0);
            let speed = math::speed_from_kinetic_energy(energy, particle.mass());
            particle.set_velocity(unit * speed);
        }
        Ok(())
    }

    fn mean_of(
        &self,
        quantity: &'static str,
        f: impl Fn(&ChargedParticle) -> Vector,
    ) -> SimulationResult<Vector> {
        if self.is_empty() {
            return Err(SimulationError::EmptyBunch { quantity });
        }
        let sum = self.particles.iter().map(f).fold(Vector::ZERO, |acc, v| acc + v);
        Ok(sum / self.len() as Scalar)
    }

    pub fn mean_position(&self) -> SimulationResult<Vector> {
        self.mean_of("Mean position", |particle| particle.position())
    }

    pub fn mean_velocity(&self) -> SimulationResult<Vector> {
        self.mean_of("Mean velocity", |particle| particle.velocity())
    }

    /// Sum of member kinetic energies; zero for an empty bunch
    pub fn total_kinetic_energy(&self) -> Scalar {
        self.particles.iter().map(|particle| particle.kinetic_energy()).sum()
    }

    pub fn average_kinetic_energy(&self) -> SimulationResult<Scalar> {
        if self.is_empty() {
            return Err(SimulationError::EmptyBunch {
                quantity: "Average kinetic energy",
            });
        }
        Ok(self.total_kinetic_energy() / self.len() as Scalar)
    }

    /// Population standard deviation of member kinetic energies
    pub fn kinetic_energy_spread(&self) -> SimulationResult<Scalar> {
        if self.is_empty() {
            return Err(SimulationError::EmptyBunch {
                quantity: "Kinetic energy spread",
            });
        }
        let average = self.average_kinetic_energy()?;
        let variance = self
            .particles
            .iter()
            .map(|particle| {
                let deviation = particle.kinetic_energy() - average;
                deviation * deviation
            })
            .sum::<Scalar>()
            / self.len() as Scalar;
        Ok(libm::sqrt(variance))
    }
}

impl<'a> IntoIterator for &'a Bunch {
    type Item = &'a ChargedParticle;
    type IntoIter = std::slice::Iter<'a, ChargedParticle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Bunch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} particles ({} distribution)", self.len(), self.distribution)?;
        if let (Ok(position), Ok(velocity), Ok(energy)) = (
            self.mean_position(),
            self.mean_velocity(),
            self.average_kinetic_energy(),
        ) {
            write!(
                f,
                ", mean position ({}, {}, {}), mean velocity ({}, {}, {}), average kinetic energy {}",
                position.x, position.y, position.z, velocity.x, velocity.y, velocity.z, energy
            )?;
        }
        Ok(())
    }
}
