//! Typed errors for lattice construction, configuration and Monte Carlo moves.

use std::fmt;

/// Everything that can stop a simulation run.
///
/// A rejected Metropolis move is not an error; it is one of the two normal
/// outcomes of the acceptance test.
#[derive(Debug, Clone, PartialEq)]
pub enum IsingError {
    /// Configuration rejected before any lattice was built.
    InvalidConfig(String),

    /// Energy change of a trial flip evaluated to NaN or ±∞.
    NonFiniteEnergy { row: usize, col: usize, delta: f64 },

    /// Raw spin value outside {-1, +1}.
    InvalidSpin(i8),
}

impl fmt::Display for IsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::NonFiniteEnergy { row, col, delta } => write!(
                f,
                "Non-finite energy change {delta} when flipping site ({row}, {col})"
            ),
            Self::InvalidSpin(v) => write!(f, "Spin value {v} is not -1 or +1"),
        }
    }
}

impl std::error::Error for IsingError {}

impl From<validator::ValidationErrors> for IsingError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}
