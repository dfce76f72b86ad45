//! Cyclotron prelude module
//!
//! This module re-exports the most commonly used types and traits to reduce
//! import boilerplate in the binary, tests and benchmarks.

// External crate re-exports
pub use bevy::prelude::*;
pub use rand::Rng;

// Internal re-exports - Config and errors
pub use crate::config::CyclotronConfig;
pub use crate::error::{SimulationError, SimulationResult};

// Internal re-exports - Physics
pub use crate::physics::bunch::{Bunch, Distribution};
pub use crate::physics::fields::{
    BoundedField, ElectromagneticField, FieldExt, FieldSet, HarmonicTrapField, OscillatingField,
    UniformField,
};
pub use crate::physics::integrators::{Integrator, IntegratorRegistry};
pub use crate::physics::math::{Scalar, Vector};
pub use crate::physics::particle::{ChargedParticle, Particle};

// Internal re-exports - Simulation
pub use crate::plugins::simulation::SimulationPlugin;
pub use crate::resources::SharedRng;
pub use crate::simulation::{Cyclotron, DriverSettings, RunReport, TrajectorySink};
