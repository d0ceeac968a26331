//! Placement engine: one greedy pass over the ordered components.
//!
//! Each component with a policy goes to its best-scoring node. Ties go to
//! the lexicographically smallest node name, so the result does not
//! depend on the order nodes were declared in. Remaining capacity is
//! tracked in a working table private to the call; the caller's node
//! definitions are never touched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use ralf_core::{Component, NodeDefinition, PlacementPolicy, ResourceProfile};

use crate::error::{PlacementError, PlacementResult};
use crate::scorer::{NodeScore, evaluate_node};

const NO_POLICY_REASON: &str = "no placement policy defined";
const NO_NODES_REASON: &str = "no matching nodes";

/// Placement outcome for a single component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementDecision {
    pub component: String,
    /// Chosen node, or `None` when exempt or unplaceable.
    pub node: Option<String>,
    pub score: f64,
    pub reasons: Vec<String>,
    /// False when the component has no placement policy.
    pub required: bool,
}

impl PlacementDecision {
    fn exempt(component: &str) -> Self {
        Self {
            component: component.to_string(),
            node: None,
            score: 0.0,
            reasons: vec![NO_POLICY_REASON.to_string()],
            required: false,
        }
    }

    /// True for a component that needed a node and did not get one.
    pub fn is_unsatisfied(&self) -> bool {
        self.required && self.node.is_none()
    }
}

/// Placement of components across the available nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedPlan {
    /// One decision per input component, in input order.
    pub decisions: Vec<PlacementDecision>,
    /// Component → node, successful placements only.
    pub placements: BTreeMap<String, String>,
    /// Node → cumulative demand of the components placed on it.
    pub node_usage: BTreeMap<String, ResourceProfile>,
    /// Node → declared capacity.
    pub node_capacity: BTreeMap<String, ResourceProfile>,
}

impl DistributedPlan {
    /// Components that required a node but could not be placed.
    pub fn unsatisfied_requirements(&self) -> Vec<&str> {
        self.decisions
            .iter()
            .filter(|d| d.is_unsatisfied())
            .map(|d| d.component.as_str())
            .collect()
    }

    /// Fail if any component could not be placed. The installer runs this
    /// before executing anything.
    pub fn ensure_satisfied(&self) -> PlacementResult<()> {
        let unsatisfied = self.unsatisfied_requirements();
        if unsatisfied.is_empty() {
            Ok(())
        } else {
            Err(PlacementError::Unsatisfied(
                unsatisfied.into_iter().map(str::to_string).collect(),
            ))
        }
    }

    pub fn decision(&self, component: &str) -> Option<&PlacementDecision> {
        self.decisions.iter().find(|d| d.component == component)
    }

    /// Node assigned to `component`, or `None` if it is exempt or unplaced.
    pub fn assignment_for(&self, component: &str) -> PlacementResult<Option<&str>> {
        self.decision(component)
            .map(|d| d.node.as_deref())
            .ok_or_else(|| PlacementError::UnknownComponent(component.to_string()))
    }
}

/// Plan placement for `components`, which must already be in dependency
/// order (see [`ralf_core::resolve_dependencies`]).
///
/// Always returns a complete plan; unplaceable components are recorded as
/// unsatisfied decisions rather than errors.
pub fn plan_distributed_deployment(
    components: &[Component],
    nodes: &[NodeDefinition],
) -> DistributedPlan {
    let node_capacity: BTreeMap<String, ResourceProfile> = nodes
        .iter()
        .map(|n| (n.name.clone(), n.capacity.clone()))
        .collect();
    let mut remaining: BTreeMap<&str, ResourceProfile> = nodes
        .iter()
        .map(|n| (n.name.as_str(), n.capacity.clone()))
        .collect();
    let mut node_usage: BTreeMap<String, ResourceProfile> = nodes
        .iter()
        .map(|n| (n.name.clone(), ResourceProfile::zero()))
        .collect();

    let mut placements: BTreeMap<String, String> = BTreeMap::new();
    let mut decisions = Vec::with_capacity(components.len());

    for component in components {
        let Some(policy) = &component.placement else {
            decisions.push(PlacementDecision::exempt(&component.name));
            continue;
        };

        let decision = schedule_component(component, policy, nodes, &remaining, &placements);

        if let Some(node) = &decision.node {
            debug!(
                component = %component.name,
                node = %node,
                score = decision.score,
                "placed component"
            );
            if let Some(left) = remaining.get_mut(node.as_str()) {
                left.consume(&policy.resources);
            }
            node_usage
                .entry(node.clone())
                .or_default()
                .add_inplace(&policy.resources);
            placements.insert(component.name.clone(), node.clone());
        } else {
            warn!(
                component = %component.name,
                reasons = ?decision.reasons,
                "no node can host component"
            );
        }
        decisions.push(decision);
    }

    let plan = DistributedPlan {
        decisions,
        placements,
        node_usage,
        node_capacity,
    };
    info!(
        components = components.len(),
        nodes = nodes.len(),
        placed = plan.placements.len(),
        unsatisfied = plan.unsatisfied_requirements().len(),
        "planned distributed deployment"
    );
    plan
}

fn schedule_component(
    component: &Component,
    policy: &PlacementPolicy,
    nodes: &[NodeDefinition],
    remaining: &BTreeMap<&str, ResourceProfile>,
    placements: &BTreeMap<String, String>,
) -> PlacementDecision {
    let mut best: Option<NodeScore> = None;
    let mut rejections = Vec::new();

    for node in nodes {
        let Some(left) = remaining.get(node.name.as_str()) else {
            continue;
        };
        match evaluate_node(node, left, policy, placements) {
            Ok(candidate) => {
                let better = match &best {
                    None => true,
                    Some(current) => {
                        candidate.score > current.score
                            || (candidate.score == current.score && candidate.node < current.node)
                    }
                };
                if better {
                    best = Some(candidate);
                }
            }
            Err(rejection) => rejections.push(format!("{}: {rejection}", node.name)),
        }
    }

    match best {
        Some(NodeScore {
            node,
            score,
            reasons,
        }) => PlacementDecision {
            component: component.name.clone(),
            node: Some(node),
            score,
            reasons,
            required: true,
        },
        None => {
            let reason = if rejections.is_empty() {
                NO_NODES_REASON.to_string()
            } else {
                rejections.join("; ")
            };
            PlacementDecision {
                component: component.name.clone(),
                node: None,
                score: 0.0,
                reasons: vec![reason],
                required: true,
            }
        }
    }
}
