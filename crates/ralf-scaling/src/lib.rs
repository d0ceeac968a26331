//! ralf-scaling: what-if capacity projections.
//!
//! Replays a finished [`DistributedPlan`](ralf_placement::DistributedPlan)
//! with per-component scale factors and reports every node dimension that
//! would exceed the node's total capacity.
//!
//! # Simulation
//!
//! ```text
//! for each placed component c on node n:
//!     usage[n] += demand(c) * overrides.get(c, 1.0)
//!
//! for each node n, dimension r:
//!     if usage[n][r] > capacity[n][r] + 1e-9:
//!         deficit(n, r, required = usage[n][r], available = capacity[n][r])
//! ```
//!
//! Usage is rebuilt from the decisions; the plan's own usage tracker is not
//! reused. Deficits are data, never errors.

pub mod simulator;

pub use simulator::{
    DeficitReport, ScalingDeficit, ScalingSimulation, SimulationReport, simulate_scaling,
};
