//! Inventory types shared by the planner crates.
//!
//! These are built by the configuration layer and only read by the
//! scheduler and simulator.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::resources::ResourceProfile;

/// Unique node name.
pub type NodeName = String;

/// Unique component name.
pub type ComponentName = String;

// ── Node ───────────────────────────────────────────────────────────

/// A capacity-bounded execution target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDefinition {
    pub name: NodeName,
    /// Free-form role, e.g. "hypervisor" or "backup".
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Total capacity. Never mutated by the planner.
    #[serde(default)]
    pub capacity: ResourceProfile,
}

impl NodeDefinition {
    pub fn new(name: impl Into<String>, capacity: ResourceProfile) -> Self {
        Self {
            name: name.into(),
            role: String::new(),
            labels: BTreeMap::new(),
            capacity,
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// True if the node carries `key` with exactly `value`.
    pub fn has_label(&self, key: &str, value: &str) -> bool {
        self.labels.get(key).is_some_and(|v| v == value)
    }
}

// ── Placement policy ───────────────────────────────────────────────

/// Hard and soft placement constraints plus the resource demand of a
/// component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlacementPolicy {
    /// Every entry must match a node label (hard).
    pub required_labels: BTreeMap<String, String>,
    /// Each matching entry raises the node's score (soft).
    pub preferred_labels: BTreeMap<String, String>,
    /// Components this one would like to share a node with.
    pub affinity: BTreeSet<ComponentName>,
    /// Components this one must never share a node with.
    pub anti_affinity: BTreeSet<ComponentName>,
    /// Demand consumed from the chosen node.
    pub resources: ResourceProfile,
}

impl PlacementPolicy {
    pub fn with_resources(resources: ResourceProfile) -> Self {
        Self {
            resources,
            ..Self::default()
        }
    }

    pub fn require_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.required_labels.insert(key.into(), value.into());
        self
    }

    pub fn prefer_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.preferred_labels.insert(key.into(), value.into());
        self
    }

    pub fn with_affinity(mut self, component: impl Into<String>) -> Self {
        self.affinity.insert(component.into());
        self
    }

    pub fn with_anti_affinity(mut self, component: impl Into<String>) -> Self {
        self.anti_affinity.insert(component.into());
        self
    }
}

// ── Component ──────────────────────────────────────────────────────

/// A task the installer runs for a component. The planner never looks
/// inside; it is carried for the executor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSpec {
    pub identifier: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: toml::Table,
}

/// A unit of deployable work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Component {
    pub name: ComponentName,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub depends_on: Vec<ComponentName>,
    /// Components without a policy are exempt from placement.
    #[serde(default)]
    pub placement: Option<PlacementPolicy>,
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            depends_on: Vec::new(),
            placement: None,
            tasks: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.depends_on.push(dependency.into());
        self
    }

    pub fn with_placement(mut self, policy: PlacementPolicy) -> Self {
        self.placement = Some(policy);
        self
    }

    /// Resource demand, if the component takes part in placement.
    pub fn demand(&self) -> Option<&ResourceProfile> {
        self.placement.as_ref().map(|p| &p.resources)
    }
}
