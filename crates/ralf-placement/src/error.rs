//! Placement error types.
//!
//! Failing to place a component is not an error: it is recorded in the
//! plan. These cover plan queries and the installer's fail-fast gate.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlacementError {
    #[error("unknown component '{0}'")]
    UnknownComponent(String),

    #[error("unsatisfied placement requirements: {}", .0.join(", "))]
    Unsatisfied(Vec<String>),
}

pub type PlacementResult<T> = Result<T, PlacementError>;
