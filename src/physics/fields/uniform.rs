use super::ElectromagneticField;
use crate::physics::math::{Scalar, Vector};
use crate::physics::particle::ChargedParticle;

/// A static field with the same electric and magnetic vectors everywhere
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UniformField {
    pub electric: Vector,
    pub magnetic: Vector,
}

impl UniformField {
    pub fn new(electric: Vector, magnetic: Vector) -> Self {
        Self { electric, magnetic }
    }

    pub fn electric_only(electric: Vector) -> Self {
        Self::new(electric, Vector::ZERO)
    }

    pub fn magnetic_only(magnetic: Vector) -> Self {
        Self::new(Vector::ZERO, magnetic)
    }
}

impl ElectromagneticField for UniformField {
    fn electric(&self, _position: Vector, _t: Scalar) -> Vector {
        self.electric
    }

    fn magnetic(&self, _position: Vector, _t: Scalar) -> Vector {
        self.magnetic
    }

    /// `U = -q E · r`, taking the origin as the zero of potential
    fn potential_energy(&self, particle: &ChargedParticle, _t: Scalar) -> Scalar {
        -particle.charge() * self.electric.dot(particle.position())
    }
}
