//! Numerical integration methods for charged-particle motion

use crate::physics::fields::FieldSet;
use crate::physics::math::Scalar;
use crate::physics::particle::ChargedParticle;

pub mod euler_cromer;
pub mod explicit_euler;
pub mod registry;
pub mod runge_kutta;

pub use euler_cromer::EulerCromer;
pub use explicit_euler::ExplicitEuler;
pub use registry::IntegratorRegistry;
pub use runge_kutta::{RungeKuttaFourthOrder, RungeKuttaSecondOrder};

/// Base trait for all integrators
pub trait Integrator: Send + Sync {
    fn clone_box(&self) -> Box<dyn Integrator>;

    /// Advance a particle's state over `[t, t + dt]`
    ///
    /// Replaces the particle's position and velocity and stores the
    /// acceleration evaluated at the start of the step. Fields are always
    /// sampled through a copy of the particle carrying the trial state, so
    /// position-dependent fields see the trial position.
    fn step(&self, particle: &mut ChargedParticle, fields: &FieldSet, t: Scalar, dt: Scalar);

    /// Get the convergence order of this integrator
    fn convergence_order(&self) -> usize;

    /// Get the canonical name of this integrator
    fn name(&self) -> &'static str;

    /// Get alternative names for this integrator
    fn aliases(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

impl Clone for Box<dyn Integrator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[cfg(test)]
pub(crate) mod test_fields {
    //! Small field setups shared by the integrator tests

    use crate::physics::fields::{FieldSet, HarmonicTrapField, UniformField};
    use crate::physics::math::{Scalar, Vector};
    use crate::physics::particle::ChargedParticle;

    /// Constant downward pull of 9.81 on a unit charge-to-mass particle
    pub fn constant_pull() -> FieldSet {
        FieldSet::single(UniformField::electric_only(Vector::new(0.0, 0.0, -9.81)))
    }

    /// Unit-stiffness trap: `a = -(x, y, 0)` for a unit charge-to-mass particle
    pub fn unit_trap() -> FieldSet {
        FieldSet::single(HarmonicTrapField::new(1.0))
    }

    pub fn unit_particle(position: Vector, velocity: Vector) -> ChargedParticle {
        ChargedParticle::with_state(1.0, 1.0, position, velocity).unwrap()
    }

    /// Total energy of a unit particle in `unit_trap`
    pub fn trap_energy(particle: &ChargedParticle) -> Scalar {
        particle.kinetic_energy() + unit_trap().potential_energy(particle, 0.0)
    }
}
