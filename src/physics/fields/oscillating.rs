use super::ElectromagneticField;
use crate::physics::math::{Scalar, Vector};
use crate::physics::particle::{ChargedParticle, Particle};

/// A field whose force is modulated by `sin(ω t + φ)`
///
/// The raw electric, magnetic and potential queries report the wrapped field
/// unmodulated. Both acceleration forms scale the electric and magnetic
/// vectors by the same factor, which for the Lorentz force is the same as
/// scaling the wrapped acceleration.
#[derive(Debug)]
pub struct OscillatingField {
    inner: Box<dyn ElectromagneticField>,
    frequency: Scalar,
    phase: Scalar,
}

impl OscillatingField {
    pub fn new(inner: Box<dyn ElectromagneticField>, frequency: Scalar) -> Self {
        Self::with_phase(inner, frequency, 0.0)
    }

    pub fn with_phase(inner: Box<dyn ElectromagneticField>, frequency: Scalar, phase: Scalar) -> Self {
        Self {
            inner,
            frequency,
            phase,
        }
    }

    pub fn frequency(&self) -> Scalar {
        self.frequency
    }

    pub fn phase(&self) -> Scalar {
        self.phase
    }

    pub fn set_frequency(&mut self, frequency: Scalar) {
        self.frequency = frequency;
    }

    pub fn set_phase(&mut self, phase: Scalar) {
        self.phase = phase;
    }

    /// The modulation factor `sin(ω t + φ)` at time `t`
    #[inline]
    pub fn modulation(&self, t: Scalar) -> Scalar {
        libm::sin(self.frequency * t + self.phase)
    }
}

impl ElectromagneticField for OscillatingField {
    fn electric(&self, position: Vector, t: Scalar) -> Vector {
        self.inner.electric(position, t)
    }

    fn magnetic(&self, position: Vector, t: Scalar) -> Vector {
        self.inner.magnetic(position, t)
    }

    fn electric_on(&self, particle: &Particle, t: Scalar) -> Vector {
        self.inner.electric_on(particle, t)
    }

    fn magnetic_on(&self, particle: &Particle, t: Scalar) -> Vector {
        self.inner.magnetic_on(particle, t)
    }

    fn potential_energy(&self, particle: &ChargedParticle, t: Scalar) -> Scalar {
        self.inner.potential_energy(particle, t)
    }

    fn acceleration(&self, particle: &ChargedParticle, t: Scalar) -> Vector {
        self.inner.acceleration(particle, t) * self.modulation(t)
    }

    fn acceleration_with_velocity(
        &self,
        particle: &ChargedParticle,
        t: Scalar,
        velocity: Vector,
    ) -> Vector {
        self.inner.acceleration_with_velocity(particle, t, velocity) * self.modulation(t)
    }
}
