/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 3D vector type for positions, velocities, accelerations and field strengths
pub type Vector = bevy::math::DVec3;

/// Proton rest mass in kilograms
pub const PROTON_MASS: Scalar = 1.672_621_78e-27;

/// Elementary charge in coulombs
pub const PROTON_CHARGE: Scalar = 1.602_176_57e-19;

/// Non-relativistic kinetic energy `m v² / 2`
#[inline]
pub fn kinetic_energy(mass: Scalar, velocity: Vector) -> Scalar {
    0.5 * mass * velocity.length_squared()
}

/// Speed of a body of `mass` carrying kinetic energy `energy`: `v = sqrt(2E/m)`
///
/// Negative energies are treated as zero.
#[inline]
pub fn speed_from_kinetic_energy(energy: Scalar, mass: Scalar) -> Scalar {
    libm::sqrt(2.0 * energy.max(0.0) / mass)
}

/// Angular cyclotron frequency `ω = q B / m`
#[inline]
pub fn cyclotron_frequency(charge: Scalar, mass: Scalar, flux_density: Scalar) -> Scalar {
    charge * flux_density / mass
}

/// Radius of curvature `r = m v / (q B)` of a charge moving perpendicular to `B`
#[inline]
pub fn orbit_radius(mass: Scalar, speed: Scalar, charge: Scalar, flux_density: Scalar) -> Scalar {
    mass * speed / (charge * flux_density)
}
