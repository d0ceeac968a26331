//! Scaling simulator: projects node usage under scale factors.
//!
//! Pure with respect to its inputs: the plan is borrowed and never
//! modified, so the same plan can be simulated under any number of
//! scenarios.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{info, warn};

use ralf_core::resources::round_to;
use ralf_core::{Component, Resource, ResourceProfile};
use ralf_placement::report::node_reports;
use ralf_placement::{DistributedPlan, NodeReport, REPORT_PRECISION};

/// Usage within this margin of capacity is not a deficit.
const EPSILON: f64 = 1e-9;

/// Scale factor for components without an override.
const DEFAULT_FACTOR: f64 = 1.0;

/// One node dimension whose simulated usage exceeds total capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingDeficit {
    pub node: String,
    pub resource: Resource,
    /// Simulated usage.
    pub required: f64,
    /// Total capacity of the node in this dimension.
    pub available: f64,
}

impl ScalingDeficit {
    /// How far usage exceeds capacity.
    pub fn shortfall(&self) -> f64 {
        self.required - self.available
    }
}

/// Result of simulating a plan under a set of scale factors.
#[derive(Debug, Clone)]
pub struct ScalingSimulation<'a> {
    pub plan: &'a DistributedPlan,
    /// Node → simulated usage. Every node in the plan has an entry.
    pub usage: BTreeMap<String, ResourceProfile>,
    /// Node → declared capacity.
    pub capacity: BTreeMap<String, ResourceProfile>,
    /// Ordered by node name, then dimension.
    pub deficits: Vec<ScalingDeficit>,
}

impl ScalingSimulation<'_> {
    pub fn is_within_capacity(&self) -> bool {
        self.deficits.is_empty()
    }

    pub fn deficits_for<'s>(
        &'s self,
        node: &'s str,
    ) -> impl Iterator<Item = &'s ScalingDeficit> + 's {
        self.deficits.iter().filter(move |d| d.node == node)
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            nodes: node_reports(&self.capacity, &self.usage),
            deficits: self.deficits.iter().map(DeficitReport::from).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        self.report().to_json()
    }
}

/// Simulate `plan` with each placed component's demand multiplied by its
/// entry in `scale_overrides` (default 1.0).
///
/// Negative and non-finite factors are logged and count as zero.
/// Overrides for components that are not in the plan are logged and
/// ignored.
pub fn simulate_scaling<'a>(
    plan: &'a DistributedPlan,
    components: &[Component],
    scale_overrides: &HashMap<String, f64>,
) -> ScalingSimulation<'a> {
    for (name, &factor) in scale_overrides {
        if plan.decision(name).is_none() {
            warn!(component = %name, "scale override for component not in plan");
        }
        if !factor.is_finite() || factor < 0.0 {
            warn!(component = %name, factor, "invalid scale factor, treating as 0");
        }
    }

    let lookup: HashMap<&str, &Component> =
        components.iter().map(|c| (c.name.as_str(), c)).collect();

    let mut usage: BTreeMap<String, ResourceProfile> = plan
        .node_capacity
        .keys()
        .map(|name| (name.clone(), ResourceProfile::zero()))
        .collect();

    for decision in &plan.decisions {
        let Some(node) = &decision.node else {
            continue;
        };
        let Some(demand) = lookup
            .get(decision.component.as_str())
            .and_then(|c| c.demand())
        else {
            continue;
        };
        let factor = scale_overrides
            .get(&decision.component)
            .copied()
            .unwrap_or(DEFAULT_FACTOR);
        let factor = if factor.is_finite() { factor } else { 0.0 };

        usage
            .entry(node.clone())
            .or_default()
            .add_inplace(&demand.scaled(factor));
    }

    let zero = ResourceProfile::zero();
    let deficits: Vec<ScalingDeficit> = plan
        .node_capacity
        .iter()
        .flat_map(|(node, capacity)| {
            let used = usage.get(node).unwrap_or(&zero);
            calculate_deficits(node, used, capacity)
        })
        .collect();

    info!(
        nodes = plan.node_capacity.len(),
        overrides = scale_overrides.len(),
        deficits = deficits.len(),
        "simulated scaling"
    );

    ScalingSimulation {
        plan,
        usage,
        capacity: plan.node_capacity.clone(),
        deficits,
    }
}

fn calculate_deficits(
    node: &str,
    used: &ResourceProfile,
    capacity: &ResourceProfile,
) -> Vec<ScalingDeficit> {
    Resource::ALL
        .iter()
        .filter(|&&r| used.get(r) > capacity.get(r) + EPSILON)
        .map(|&r| ScalingDeficit {
            node: node.to_string(),
            resource: r,
            required: used.get(r),
            available: capacity.get(r),
        })
        .collect()
}

// ── Reports ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeficitReport {
    pub node: String,
    pub resource: Resource,
    pub required: f64,
    pub available: f64,
}

impl From<&ScalingDeficit> for DeficitReport {
    fn from(deficit: &ScalingDeficit) -> Self {
        Self {
            node: deficit.node.clone(),
            resource: deficit.resource,
            required: round_to(deficit.required, REPORT_PRECISION),
            available: round_to(deficit.available, REPORT_PRECISION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub nodes: Vec<NodeReport>,
    pub deficits: Vec<DeficitReport>,
}

impl SimulationReport {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
