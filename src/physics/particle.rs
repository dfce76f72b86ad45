//! Point particles and their first-order update primitives

use crate::error::{SimulationError, SimulationResult};
use crate::physics::math::{self, Scalar, Vector};
use bevy::prelude::{Deref, DerefMut};
use std::fmt;

/// A massive point particle
///
/// The acceleration is whatever was last computed for the particle; it is
/// never integrated on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    mass: Scalar,
    position: Vector,
    velocity: Vector,
    acceleration: Vector,
}

impl Particle {
    /// Create a particle at rest at the origin
    pub fn new(mass: Scalar) -> SimulationResult<Self> {
        Self::with_state(mass, Vector::ZERO, Vector::ZERO)
    }

    pub fn with_state(mass: Scalar, position: Vector, velocity: Vector) -> SimulationResult<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimulationError::NonPositiveMass(mass));
        }

        Ok(Self {
            mass,
            position,
            velocity,
            acceleration: Vector::ZERO,
        })
    }

    #[inline]
    pub fn mass(&self) -> Scalar {
        self.mass
    }

    #[inline]
    pub fn position(&self) -> Vector {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    #[inline]
    pub fn acceleration(&self) -> Vector {
        self.acceleration
    }

    pub fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vector) {
        self.acceleration = acceleration;
    }

    #[inline]
    pub fn kinetic_energy(&self) -> Scalar {
        math::kinetic_energy(self.mass, self.velocity)
    }

    /// Forward Euler step: position advances with the velocity from before the update
    ///
    /// ```text
    /// v(t+dt) = v(t) + a * dt
    /// x(t+dt) = x(t) + v(t) * dt
    /// ```
    pub fn update_euler(&mut self, dt: Scalar, acceleration: Vector) {
        let current_velocity = self.velocity;
        self.acceleration = acceleration;
        self.velocity += acceleration * dt;
        self.position += current_velocity * dt;
    }

    /// Euler-Cromer step: position advances with the freshly updated velocity
    ///
    /// ```text
    /// v(t+dt) = v(t) + a * dt
    /// x(t+dt) = x(t) + v(t+dt) * dt
    /// ```
    pub fn update_euler_cromer(&mut self, dt: Scalar, acceleration: Vector) {
        self.acceleration = acceleration;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }
}

/// A particle carrying electric charge (any sign, including zero)
#[derive(Debug, Clone, Copy, PartialEq, Deref, DerefMut)]
pub struct ChargedParticle {
    #[deref]
    particle: Particle,
    charge: Scalar,
}

impl ChargedParticle {
    /// Create a charged particle at rest at the origin
    pub fn new(mass: Scalar, charge: Scalar) -> SimulationResult<Self> {
        Ok(Self {
            particle: Particle::new(mass)?,
            charge,
        })
    }

    pub fn with_state(
        mass: Scalar,
        charge: Scalar,
        position: Vector,
        velocity: Vector,
    ) -> SimulationResult<Self> {
        Ok(Self {
            particle: Particle::with_state(mass, position, velocity)?,
            charge,
        })
    }

    /// A proton at rest at the origin
    pub fn proton() -> Self {
        Self {
            particle: Particle {
                mass: math::PROTON_MASS,
                position: Vector::ZERO,
                velocity: Vector::ZERO,
                acceleration: Vector::ZERO,
            },
            charge: math::PROTON_CHARGE,
        }
    }

    #[inline]
    pub fn charge(&self) -> Scalar {
        self.charge
    }

    pub fn set_charge(&mut self, charge: Scalar) {
        self.charge = charge;
    }

    /// The Lorentz prefactor `q / m`
    #[inline]
    pub fn charge_to_mass_ratio(&self) -> Scalar {
        self.charge / self.particle.mass
    }

    /// A copy of this particle moved to a trial state
    ///
    /// Multi-stage integrators evaluate fields through such probes so that
    /// position-dependent fields see the trial position.
    pub fn probe(&self, position: Vector, velocity: Vector) -> Self {
        let mut probe = *self;
        probe.particle.position = position;
        probe.particle.velocity = velocity;
        probe
    }
}

fn simple(vector: Vector) -> String {
    format!("({}, {}, {})", vector.x, vector.y, vector.z)
}

impl fmt::Display for ChargedParticle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mass {} charge {} Position: {} Velocity: {} Acceleration: {}",
            self.mass(),
            self.charge,
            simple(self.position()),
            simple(self.velocity()),
            simple(self.acceleration()),
        )
    }
}
