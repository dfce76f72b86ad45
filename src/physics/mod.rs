//! Physics core: particles, fields, integrators and the bunch aggregate

pub mod bunch;
pub mod fields;
pub mod integrators;
pub mod math;
pub mod particle;
