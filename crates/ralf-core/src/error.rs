//! Error types for configuration and dependency resolution.

use thiserror::Error;

use crate::resources::Resource;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Configuration-level errors. All of these are fatal to a planning run
/// and are raised before any placement begins.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("circular dependency detected involving '{component}'")]
    Cycle { component: String },

    #[error("component '{component}' depends on unknown component '{dependency}'")]
    UnknownDependency { component: String, dependency: String },

    #[error("duplicate component name: {0}")]
    DuplicateComponent(String),

    #[error("duplicate node name: {0}")]
    DuplicateNode(String),

    #[error("invalid {resource} value {value}: must be finite and non-negative")]
    InvalidResource { resource: Resource, value: f64 },
}
