//! Euler-Cromer integration (semi-implicit or symplectic Euler)

use super::Integrator;
use crate::physics::fields::FieldSet;
use crate::physics::math::Scalar;
use crate::physics::particle::ChargedParticle;

/// Euler-Cromer integrator
///
/// Identical to forward Euler except that the position advances with the
/// freshly updated velocity:
///
/// ```text
/// a(t)    = (q/m) (E + v(t) × B)
/// v(t+dt) = v(t) + a(t) * dt
/// x(t+dt) = x(t) + v(t+dt) * dt
/// ```
///
/// For forces that depend only on position this is symplectic, and the energy
/// error stays bounded instead of accumulating.
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerCromer;

impl Integrator for EulerCromer {
    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }

    fn step(&self, particle: &mut ChargedParticle, fields: &FieldSet, t: Scalar, dt: Scalar) {
        let acceleration = fields.acceleration(particle, t);
        particle.update_euler_cromer(dt, acceleration);
    }

    fn convergence_order(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "euler_cromer"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["semi_implicit_euler", "symplectic_euler"]
    }
}
