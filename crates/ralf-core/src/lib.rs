//! Core types for the RALF deployment planner.
//!
//! Components declare resource demands and placement constraints; nodes
//! declare capacity and labels. This crate owns those types, the
//! dependency ordering that the scheduler consumes, and the inventory
//! file layer that builds them.

pub mod config;
pub mod deps;
pub mod error;
pub mod resources;
pub mod types;

pub use config::Inventory;
pub use deps::resolve_dependencies;
pub use error::{CoreError, CoreResult};
pub use resources::{Resource, ResourceProfile};
pub use types::*;
