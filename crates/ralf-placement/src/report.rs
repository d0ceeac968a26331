//! JSON-ready views of a plan.
//!
//! Floats are rounded to [`REPORT_PRECISION`] decimal places so the
//! rendered output is stable across runs and platforms.

use std::collections::BTreeMap;

use serde::Serialize;

use ralf_core::ResourceProfile;
use ralf_core::resources::round_to;

use crate::placer::{DistributedPlan, PlacementDecision};

/// Decimal places kept in reports.
pub const REPORT_PRECISION: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionReport {
    pub component: String,
    pub node: Option<String>,
    pub score: f64,
    pub reasons: Vec<String>,
    pub required: bool,
}

impl From<&PlacementDecision> for DecisionReport {
    fn from(decision: &PlacementDecision) -> Self {
        Self {
            component: decision.component.clone(),
            node: decision.node.clone(),
            score: round_to(decision.score, REPORT_PRECISION),
            reasons: decision.reasons.clone(),
            required: decision.required,
        }
    }
}

/// Capacity and usage of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub name: String,
    pub capacity: ResourceProfile,
    pub usage: ResourceProfile,
}

impl NodeReport {
    pub fn new(name: &str, capacity: &ResourceProfile, usage: &ResourceProfile) -> Self {
        Self {
            name: name.to_string(),
            capacity: capacity.rounded(REPORT_PRECISION),
            usage: usage.rounded(REPORT_PRECISION),
        }
    }
}

/// Node reports for every node in `capacity`, sorted by name. Nodes with
/// no usage entry report zero usage.
pub fn node_reports(
    capacity: &BTreeMap<String, ResourceProfile>,
    usage: &BTreeMap<String, ResourceProfile>,
) -> Vec<NodeReport> {
    let zero = ResourceProfile::zero();
    capacity
        .iter()
        .map(|(name, cap)| NodeReport::new(name, cap, usage.get(name).unwrap_or(&zero)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub decisions: Vec<DecisionReport>,
    pub nodes: Vec<NodeReport>,
    pub placements: BTreeMap<String, String>,
    pub unsatisfied_requirements: Vec<String>,
}

impl PlanReport {
    /// Tag the report with the profile it was planned from.
    pub fn with_profile(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.profile = Some(name.into());
        self.description = Some(description.into());
        self
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl DistributedPlan {
    pub fn report(&self) -> PlanReport {
        PlanReport {
            profile: None,
            description: None,
            decisions: self.decisions.iter().map(DecisionReport::from).collect(),
            nodes: node_reports(&self.node_capacity, &self.node_usage),
            placements: self.placements.clone(),
            unsatisfied_requirements: self
                .unsatisfied_requirements()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        self.report().to_json()
    }
}
