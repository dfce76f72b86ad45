//! Error types shared by the physics core and the simulation driver

use crate::physics::math::Scalar;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Particle mass must be strictly positive and finite, got {0}")]
    NonPositiveMass(Scalar),

    #[error("Unsupported distribution kind: '{0}' (expected 'uniform' or 'gaussian')")]
    UnsupportedDistribution(String),

    #[error("Field set must contain at least one field")]
    EmptyFieldList,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown integrator: {0}")]
    UnknownIntegrator(String),

    #[error("{quantity} is undefined for an empty bunch")]
    EmptyBunch { quantity: &'static str },

    #[error("Average energy gain is undefined: the bunch never crossed the gap")]
    NoGapCrossings,

    #[error("Spread-to-energy ratio is undefined: the bunch has no kinetic energy")]
    ZeroKineticEnergy,

    #[error(
        "Simulation did not converge: {revolutions} of {max_revolutions} revolutions after {ticks} ticks"
    )]
    NotConverged {
        revolutions: u32,
        max_revolutions: u32,
        ticks: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_problem() {
        let error = SimulationError::NonPositiveMass(0.0);
        assert!(error.to_string().contains("strictly positive"));

        let error = SimulationError::EmptyBunch {
            quantity: "Average kinetic energy",
        };
        assert_eq!(
            error.to_string(),
            "Average kinetic energy is undefined for an empty bunch"
        );

        let error = SimulationError::NotConverged {
            revolutions: 3,
            max_revolutions: 10,
            ticks: 500,
        };
        assert!(error.to_string().contains("3 of 10 revolutions after 500 ticks"));
    }

    #[test]
    fn test_io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let error: SimulationError = io.into();
        assert!(matches!(error, SimulationError::Io(_)));
    }
}
