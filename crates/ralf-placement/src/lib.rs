//! RALF placement scheduler.
//!
//! Assigns components, in dependency order, to the node that best fits
//! their placement policy. This is a greedy single pass: there is no
//! backtracking and the planner never executes anything. It produces a
//! [`DistributedPlan`] that the installer inspects before running tasks.
//!
//! # Components
//!
//! - **`scorer`**: Candidate filtering and scoring for a single node
//! - **`placer`**: Planning pass over all components, plan types
//! - **`report`**: Rounded, JSON-ready views of a plan

pub mod error;
pub mod placer;
pub mod report;
pub mod scorer;

pub use error::{PlacementError, PlacementResult};
pub use placer::{DistributedPlan, PlacementDecision, plan_distributed_deployment};
pub use report::{DecisionReport, NodeReport, PlanReport, REPORT_PRECISION};
pub use scorer::{NodeScore, Rejection, evaluate_node, headroom_ratio};
