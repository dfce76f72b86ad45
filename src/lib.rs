//! Cyclotron library
//!
//! Charged-particle bunches pushed through composable electromagnetic fields,
//! exposed as a library so the binary, integration tests and benchmarks share
//! one implementation.

pub mod cli;
pub mod config;
pub mod error;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod resources;
pub mod simulation;
