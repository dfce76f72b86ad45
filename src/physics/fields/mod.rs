//! Electromagnetic fields and their decorators
//!
//! Every field answers raw electric/magnetic queries and derives the
//! non-relativistic Lorentz acceleration `a = (q/m)(E + v × B)` from them.
//! Decorators own exactly one inner field and override a single aspect of its
//! behaviour, so chains such as bounded(oscillating(uniform)) are built by
//! nesting rather than by subclassing.

use crate::error::{SimulationError, SimulationResult};
use crate::physics::math::{Scalar, Vector};
use crate::physics::particle::{ChargedParticle, Particle};
use std::fmt;

pub mod bounded;
pub mod oscillating;
pub mod trap;
pub mod uniform;

pub use bounded::BoundedField;
pub use oscillating::OscillatingField;
pub use trap::HarmonicTrapField;
pub use uniform::UniformField;

/// Non-relativistic Lorentz acceleration `(q/m)(E + v × B)`
#[inline]
pub fn lorentz_acceleration(
    charge_to_mass: Scalar,
    electric: Vector,
    magnetic: Vector,
    velocity: Vector,
) -> Vector {
    (electric + velocity.cross(magnetic)) * charge_to_mass
}

/// Base trait for all electromagnetic fields
pub trait ElectromagneticField: Send + Sync + fmt::Debug {
    /// Electric field strength at a position
    fn electric(&self, position: Vector, t: Scalar) -> Vector;

    /// Magnetic flux density at a position
    fn magnetic(&self, position: Vector, t: Scalar) -> Vector;

    /// Potential energy of a charged particle due to this field
    fn potential_energy(&self, particle: &ChargedParticle, t: Scalar) -> Scalar;

    /// Electric field strength experienced by a particle
    fn electric_on(&self, particle: &Particle, t: Scalar) -> Vector {
        self.electric(particle.position(), t)
    }

    /// Magnetic flux density experienced by a particle
    fn magnetic_on(&self, particle: &Particle, t: Scalar) -> Vector {
        self.magnetic(particle.position(), t)
    }

    /// Acceleration of a particle moving with its own stored velocity
    fn acceleration(&self, particle: &ChargedParticle, t: Scalar) -> Vector {
        self.acceleration_with_velocity(particle, t, particle.velocity())
    }

    /// Acceleration of a particle moving with an externally supplied velocity
    ///
    /// Integrators need this mid-step, before the particle's own velocity has
    /// been replaced.
    fn acceleration_with_velocity(
        &self,
        particle: &ChargedParticle,
        t: Scalar,
        velocity: Vector,
    ) -> Vector {
        lorentz_acceleration(
            particle.charge_to_mass_ratio(),
            self.electric_on(particle, t),
            self.magnetic_on(particle, t),
            velocity,
        )
    }
}

impl ElectromagneticField for Box<dyn ElectromagneticField> {
    fn electric(&self, position: Vector, t: Scalar) -> Vector {
        (**self).electric(position, t)
    }

    fn magnetic(&self, position: Vector, t: Scalar) -> Vector {
        (**self).magnetic(position, t)
    }

    fn potential_energy(&self, particle: &ChargedParticle, t: Scalar) -> Scalar {
        (**self).potential_energy(particle, t)
    }

    fn acceleration(&self, particle: &ChargedParticle, t: Scalar) -> Vector {
        (**self).acceleration(particle, t)
    }

    fn acceleration_with_velocity(
        &self,
        particle: &ChargedParticle,
        t: Scalar,
        velocity: Vector,
    ) -> Vector {
        (**self).acceleration_with_velocity(particle, t, velocity)
    }
}

/// Builder methods for wrapping a field in decorators
pub trait FieldExt: ElectromagneticField + Sized + 'static {
    /// Modulate this field by `sin(frequency * t + phase)`
    fn oscillating(self, frequency: Scalar, phase: Scalar) -> OscillatingField {
        OscillatingField::with_phase(Box::new(self), frequency, phase)
    }

    /// Confine this field's force to `|x| <= x_bound` and `|y| <= y_bound`
    fn bounded(self, x_bound: Scalar, y_bound: Scalar, z_bound: Scalar) -> BoundedField {
        BoundedField::with_extents(Box::new(self), x_bound, y_bound, z_bound)
    }

    fn boxed(self) -> Box<dyn ElectromagneticField> {
        Box::new(self)
    }
}

impl<F: ElectromagneticField + 'static> FieldExt for F {}

/// The ordered, non-empty list of fields acting on a bunch
#[derive(Debug)]
pub struct FieldSet {
    fields: Vec<Box<dyn ElectromagneticField>>,
}

impl FieldSet {
    pub fn new(fields: Vec<Box<dyn ElectromagneticField>>) -> SimulationResult<Self> {
        if fields.is_empty() {
            return Err(SimulationError::EmptyFieldList);
        }
        Ok(Self { fields })
    }

    /// A set holding a single field
    pub fn single(field: impl ElectromagneticField + 'static) -> Self {
        Self {
            fields: vec![Box::new(field)],
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ElectromagneticField> {
        self.fields.iter().map(|field| field.as_ref())
    }

    /// Total acceleration summed across every field
    pub fn acceleration(&self, particle: &ChargedParticle, t: Scalar) -> Vector {
        self.fields
            .iter()
            .fold(Vector::ZERO, |sum, field| sum + field.acceleration(particle, t))
    }

    /// Total acceleration for a supplied velocity, summed across every field
    pub fn acceleration_with_velocity(
        &self,
        particle: &ChargedParticle,
        t: Scalar,
        velocity: Vector,
    ) -> Vector {
        self.fields.iter().fold(Vector::ZERO, |sum, field| {
            sum + field.acceleration_with_velocity(particle, t, velocity)
        })
    }

    pub fn potential_energy(&self, particle: &ChargedParticle, t: Scalar) -> Scalar {
        self.fields
            .iter()
            .map(|field| field.potential_energy(particle, t))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_particle(position: Vector, velocity: Vector) -> ChargedParticle {
        ChargedParticle::with_state(1.0, 1.0, position, velocity).unwrap()
    }

    #[test]
    fn test_magnetic_acceleration_is_perpendicular() {
        let field = UniformField::magnetic_only(Vector::new(0.0, 0.0, 2.0));
        let velocity = Vector::new(3.0, -1.0, 0.0);
        let particle = unit_particle(Vector::ZERO, velocity);

        for step in 0..50 {
            let t = step as Scalar * 0.37;
            let acceleration = field.acceleration(&particle, t);
            assert!(acceleration.length() > 0.0);
            assert!(acceleration.dot(velocity).abs() < 1e-12);
            assert!(acceleration.dot(field.magnetic(Vector::ZERO, t)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_acceleration_scales_with_charge_to_mass() {
        let field = UniformField::electric_only(Vector::new(0.0, 4.0, 0.0));
        let particle = ChargedParticle::with_state(2.0, -3.0, Vector::ZERO, Vector::ZERO).unwrap();

        assert_eq!(
            field.acceleration(&particle, 0.0),
            Vector::new(0.0, -6.0, 0.0)
        );
    }

    #[test]
    fn test_supplied_velocity_overrides_stored_velocity() {
        let field = UniformField::magnetic_only(Vector::Z);
        let particle = unit_particle(Vector::ZERO, Vector::X);

        assert_eq!(field.acceleration(&particle, 0.0), Vector::new(0.0, -1.0, 0.0));
        assert_eq!(
            field.acceleration_with_velocity(&particle, 0.0, Vector::Y),
            Vector::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_field_set_rejects_empty_list() {
        assert!(matches!(
            FieldSet::new(Vec::new()),
            Err(SimulationError::EmptyFieldList)
        ));
    }

    #[test]
    fn test_field_set_sums_fields() {
        let fields = FieldSet::new(vec![
            UniformField::electric_only(Vector::new(1.0, 0.0, 0.0)).boxed(),
            UniformField::electric_only(Vector::new(0.0, 2.0, 0.0)).boxed(),
            UniformField::magnetic_only(Vector::Z).boxed(),
        ])
        .unwrap();
        let particle = unit_particle(Vector::ZERO, Vector::X);

        assert_eq!(fields.len(), 3);
        assert_eq!(
            fields.acceleration(&particle, 0.0),
            Vector::new(1.0, 1.0, 0.0)
        );
        assert_eq!(
            fields.acceleration_with_velocity(&particle, 0.0, Vector::ZERO),
            Vector::new(1.0, 2.0, 0.0)
        );
    }

    #[test]
    fn test_decorator_chain_builds_by_nesting() {
        let field = UniformField::electric_only(Vector::Y)
            .oscillating(1.0, std::f64::consts::FRAC_PI_2)
            .bounded(10.0, 0.5, 0.0);
        let inside = unit_particle(Vector::ZERO, Vector::ZERO);
        let outside = unit_particle(Vector::new(0.0, 1.0, 0.0), Vector::ZERO);

        // sin(0 + π/2) = 1 at the origin, nothing beyond the bound
        assert!((field.acceleration(&inside, 0.0) - Vector::Y).length() < 1e-12);
        assert_eq!(field.acceleration(&outside, 0.0), Vector::ZERO);
        // Raw queries are answered everywhere
        assert_eq!(field.electric(Vector::new(0.0, 1.0, 0.0), 0.0), Vector::Y);
    }
}
