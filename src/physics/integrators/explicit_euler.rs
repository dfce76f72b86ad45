//! Explicit Euler integration method (forward Euler)
//!
//! Provided mainly for comparison. Energy drifts steadily on closed orbits.

use super::Integrator;
use crate::physics::fields::FieldSet;
use crate::physics::math::Scalar;
use crate::physics::particle::ChargedParticle;

/// Explicit Euler integrator (forward Euler method)
///
/// Position advances with the velocity from the start of the step:
///
/// ```text
/// a(t)    = (q/m) (E + v(t) × B)
/// v(t+dt) = v(t) + a(t) * dt
/// x(t+dt) = x(t) + v(t) * dt
/// ```
///
/// - **Order of accuracy**: O(dt)
/// - **Field evaluations**: 1 per timestep
/// - **Symplectic**: No. Circular orbits spiral outward.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }

    fn step(&self, particle: &mut ChargedParticle, fields: &FieldSet, t: Scalar, dt: Scalar) {
        let acceleration = fields.acceleration(particle, t);
        particle.update_euler(dt, acceleration);
    }

    fn convergence_order(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "euler"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["explicit_euler", "forward_euler"]
    }
}
