use super::ElectromagneticField;
use crate::physics::math::{Scalar, Vector};
use crate::physics::particle::{ChargedParticle, Particle};

/// A field that only exerts force inside an aperture
///
/// The aperture is the box `|x| <= x_bound`, `|y| <= y_bound`. The z extent is
/// stored but not enforced. Only the acceleration is gated: electric,
/// magnetic and potential queries still report the wrapped field everywhere,
/// so diagnostics can probe what the field would be at a point without it
/// pushing on anything there.
#[derive(Debug)]
pub struct BoundedField {
    inner: Box<dyn ElectromagneticField>,
    x_bound: Scalar,
    y_bound: Scalar,
    z_bound: Scalar,
}

impl BoundedField {
    /// Wrap a field with all extents set to zero
    pub fn new(inner: Box<dyn ElectromagneticField>) -> Self {
        Self::with_extents(inner, 0.0, 0.0, 0.0)
    }

    pub fn with_xy(inner: Box<dyn ElectromagneticField>, x_bound: Scalar, y_bound: Scalar) -> Self {
        Self::with_extents(inner, x_bound, y_bound, 0.0)
    }

    pub fn with_extents(
        inner: Box<dyn ElectromagneticField>,
        x_bound: Scalar,
        y_bound: Scalar,
        z_bound: Scalar,
    ) -> Self {
        Self {
            inner,
            x_bound,
            y_bound,
            z_bound,
        }
    }

    pub fn x_bound(&self) -> Scalar {
        self.x_bound
    }

    pub fn y_bound(&self) -> Scalar {
        self.y_bound
    }

    pub fn z_bound(&self) -> Scalar {
        self.z_bound
    }

    pub fn set_x_bound(&mut self, x_bound: Scalar) {
        self.x_bound = x_bound;
    }

    pub fn set_y_bound(&mut self, y_bound: Scalar) {
        self.y_bound = y_bound;
    }

    pub fn set_z_bound(&mut self, z_bound: Scalar) {
        self.z_bound = z_bound;
    }

    /// Whether a particle sits inside the aperture (edges included)
    pub fn contains(&self, particle: &Particle) -> bool {
        let position = particle.position();
        position.y.abs() <= self.y_bound && position.x.abs() <= self.x_bound
    }
}

impl ElectromagneticField for BoundedField {
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
        if self.contains(particle) {
            self.inner.acceleration(particle, t)
        } else {
            Vector::ZERO
        }
    }

    fn acceleration_with_velocity(
        &self,
        particle: &ChargedParticle,
        t: Scalar,
        velocity: Vector,
    ) -> Vector {
        if self.contains(particle) {
            self.inner.acceleration_with_velocity(particle, t, velocity)
        } else {
            Vector::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::fields::{FieldExt, UniformField};

    fn raw_field() -> UniformField {
        UniformField::new(Vector::new(0.0, 3.0, 0.0), Vector::new(0.0, 0.0, 2.0))
    }

    fn particle_at(x: Scalar, y: Scalar) -> ChargedParticle {
        ChargedParticle::with_state(2.0, 1.0, Vector::new(x, y, 0.0), Vector::new(1.0, 0.5, 0.0))
            .unwrap()
    }

    #[test]
    fn test_zero_outside_the_box() {
        let bounded = raw_field().bounded(1.0, 0.25, 0.0);
        let velocity = Vector::new(-4.0, 1.0, 0.0);

        for (x, y) in [(1.5, 0.0), (-1.01, 0.1), (0.0, 0.3), (0.5, -0.26), (7.0, 7.0)] {
            let particle = particle_at(x, y);
            assert_eq!(bounded.acceleration(&particle, 0.0), Vector::ZERO);
            assert_eq!(
                bounded.acceleration_with_velocity(&particle, 0.0, velocity),
                Vector::ZERO
            );
        }
    }

    #[test]
    fn test_matches_wrapped_field_inside_the_box() {
        let raw = raw_field();
        let bounded = raw_field().bounded(1.0, 0.25, 0.0);
        let velocity = Vector::new(-4.0, 1.0, 0.0);

        for (x, y) in [(0.0, 0.0), (0.99, 0.2), (-0.5, -0.24)] {
            let particle = particle_at(x, y);
            assert_eq!(
                bounded.acceleration(&particle, 1.0),
                raw.acceleration(&particle, 1.0)
            );
            assert_eq!(
                bounded.acceleration_with_velocity(&particle, 1.0, velocity),
                raw.acceleration_with_velocity(&particle, 1.0, velocity)
            );
        }
    }

    #[test]
    fn test_raw_queries_are_never_gated() {
        let bounded = raw_field().bounded(1.0, 0.25, 0.0);
        let far_away = particle_at(50.0, -50.0);

        assert_eq!(
            bounded.electric(far_away.position(), 0.0),
            Vector::new(0.0, 3.0, 0.0)
        );
        assert_eq!(bounded.magnetic_on(&far_away, 0.0), Vector::new(0.0, 0.0, 2.0));
        assert_eq!(
            bounded.potential_energy(&far_away, 0.0),
            raw_field().potential_energy(&far_away, 0.0)
        );
    }

    #[test]
    fn test_z_extent_is_not_enforced() {
        let bounded = raw_field().bounded(1.0, 1.0, 0.0);
        let high = ChargedParticle::with_state(1.0, 1.0, Vector::new(0.0, 0.0, 100.0), Vector::ZERO)
            .unwrap();

        assert_ne!(bounded.acceleration(&high, 0.0), Vector::ZERO);
    }

    #[test]
    fn test_constructors_and_setters() {
        let mut bounded = BoundedField::new(raw_field().boxed());
        assert_eq!(
            (bounded.x_bound(), bounded.y_bound(), bounded.z_bound()),
            (0.0, 0.0, 0.0)
        );

        bounded.set_x_bound(2.0);
        bounded.set_y_bound(3.0);
        bounded.set_z_bound(4.0);
        assert_eq!(
            (bounded.x_bound(), bounded.y_bound(), bounded.z_bound()),
            (2.0, 3.0, 4.0)
        );

        let planar = BoundedField::with_xy(raw_field().boxed(), 5.0, 6.0);
        assert_eq!(
            (planar.x_bound(), planar.y_bound(), planar.z_bound()),
            (5.0, 6.0, 0.0)
        );
    }
}
