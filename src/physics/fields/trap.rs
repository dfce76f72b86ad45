use super::ElectromagneticField;
use crate::physics::math::{Scalar, Vector};
use crate::physics::particle::ChargedParticle;

/// A radial electric restoring field `E = -k (x, y, 0)` with no magnetic part
///
/// A charge with `q k > 0` launched tangentially at speed `r sqrt(q k / m)`
/// follows a circle of radius `r` about the z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicTrapField {
    pub stiffness: Scalar,
}

impl HarmonicTrapField {
    pub fn new(stiffness: Scalar) -> Self {
        Self { stiffness }
    }

    /// Tangential speed that keeps a particle on a circle of `radius`
    pub fn circular_speed(&self, particle: &ChargedParticle, radius: Scalar) -> Scalar {
        radius * libm::sqrt((particle.charge_to_mass_ratio() * self.stiffness).max(0.0))
    }
}

impl ElectromagneticField for HarmonicTrapField {
    fn electric(&self, position: Vector, _t: Scalar) -> Vector {
        Vector::new(-self.stiffness * position.x, -self.stiffness * position.y, 0.0)
    }

    fn magnetic(&self, _position: Vector, _t: Scalar) -> Vector {
        Vector::ZERO
    }

    /// `U = q k (x² + y²) / 2`
    fn potential_energy(&self, particle: &ChargedParticle, _t: Scalar) -> Scalar {
        let position = particle.position();
        0.5 * particle.charge() * self.stiffness * (position.x * position.x + position.y * position.y)
    }
}
