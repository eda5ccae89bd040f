use thiserror::Error;

use crate::api::types::BallId;

/// Errors surfaced by the simulation core.
///
/// All of them are recoverable by the caller; none leaves ball state
/// half-updated.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("cannot normalize a zero-length vector")]
    ZeroVector,
    #[error("balls {a} and {b} share the same center, no collision normal")]
    CoincidentCenters { a: BallId, b: BallId },
    #[error("layout infeasible for requested density: placed {placed} of {requested} balls, gave up after {attempts} attempts")]
    LayoutInfeasible {
        placed: usize,
        requested: usize,
        attempts: u32,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
