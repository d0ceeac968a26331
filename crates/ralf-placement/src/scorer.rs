//! Node scoring for placement decisions.
//!
//! A node is first checked against the hard constraints (required labels,
//! remaining capacity, anti-affinity). Surviving nodes are scored:
//!
//! ```text
//! score = 1.0
//!       + 5.0 per matching preferred label
//!       + min(headroom, 10.0)
//!       + 8.0 if any affinity peer already sits on this node
//!       - 2.0 per affinity peer placed on a different node
//! ```
//!
//! Headroom is the smallest `remaining / demand` ratio over the
//! dimensions the component actually demands.

use std::collections::BTreeMap;
use std::fmt;

use ralf_core::{NodeDefinition, PlacementPolicy, Resource, ResourceProfile};

pub const BASE_SCORE: f64 = 1.0;
pub const PREFERRED_LABEL_BONUS: f64 = 5.0;
pub const AFFINITY_BONUS: f64 = 8.0;
pub const AFFINITY_ELSEWHERE_PENALTY: f64 = 2.0;
/// Upper bound on the headroom term; also the value used when the
/// policy demands nothing.
pub const HEADROOM_CAP: f64 = 10.0;

/// Why a node cannot host a component.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// `key=value` pairs from `required_labels` the node does not carry.
    MissingLabels(Vec<String>),
    InsufficientCapacity,
    AntiAffinity,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingLabels(missing) => write!(f, "missing {}", missing.join("/")),
            Rejection::InsufficientCapacity => f.write_str("insufficient capacity"),
            Rejection::AntiAffinity => f.write_str("anti-affinity conflict"),
        }
    }
}

/// Scored candidate node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeScore {
    pub node: String,
    pub score: f64,
    /// Human-readable score contributions.
    pub reasons: Vec<String>,
}

/// Check the hard constraints for `node` and score it.
///
/// `remaining` is the node's capacity left after earlier placements in
/// this run; `placements` maps already-placed components to their nodes.
pub fn evaluate_node(
    node: &NodeDefinition,
    remaining: &ResourceProfile,
    policy: &PlacementPolicy,
    placements: &BTreeMap<String, String>,
) -> Result<NodeScore, Rejection> {
    let missing: Vec<String> = policy
        .required_labels
        .iter()
        .filter(|(k, v)| !node.has_label(k, v))
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    if !missing.is_empty() {
        return Err(Rejection::MissingLabels(missing));
    }

    if !remaining.can_host(&policy.resources) {
        return Err(Rejection::InsufficientCapacity);
    }

    let conflict = policy
        .anti_affinity
        .iter()
        .any(|peer| placements.get(peer).is_some_and(|n| *n == node.name));
    if conflict {
        return Err(Rejection::AntiAffinity);
    }

    let mut score = BASE_SCORE;
    let mut reasons = Vec::new();

    for (key, value) in &policy.preferred_labels {
        if node.has_label(key, value) {
            score += PREFERRED_LABEL_BONUS;
            reasons.push(format!("preferred label {key}={value}"));
        }
    }

    let headroom = headroom_ratio(remaining, &policy.resources);
    score += headroom.min(HEADROOM_CAP);
    reasons.push(format!("headroom {headroom:.2}"));

    let mut co_located = Vec::new();
    for peer in &policy.affinity {
        match placements.get(peer) {
            Some(assigned) if *assigned == node.name => co_located.push(peer.as_str()),
            Some(_) => {
                score -= AFFINITY_ELSEWHERE_PENALTY;
                reasons.push(format!("affinity prefers {peer} on this node"));
            }
            None => {}
        }
    }
    if !co_located.is_empty() {
        score += AFFINITY_BONUS;
        reasons.push(format!("affinity with {}", co_located.join(", ")));
    }

    Ok(NodeScore {
        node: node.name.clone(),
        score,
        reasons,
    })
}

/// Smallest `remaining / demand` ratio over the demanded dimensions, or
/// [`HEADROOM_CAP`] when nothing is demanded.
pub fn headroom_ratio(remaining: &ResourceProfile, demand: &ResourceProfile) -> f64 {
    Resource::ALL
        .iter()
        .filter(|&&r| demand.get(r) > 0.0)
        .map(|&r| remaining.get(r) / demand.get(r))
        .reduce(f64::min)
        .unwrap_or(HEADROOM_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu(amount: f64) -> ResourceProfile {
        ResourceProfile::new(amount, 0.0, 0.0, 0.0).unwrap()
    }

    fn node(name: &str, cpus: f64) -> NodeDefinition {
        NodeDefinition::new(name, cpu(cpus))
    }

    fn placed(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(c, n)| (c.to_string(), n.to_string()))
            .collect()
    }

    #[test]
    fn rejects_missing_required_labels() {
        let n = node("a", 4.0).with_label("zone", "west");
        let policy = PlacementPolicy::with_resources(cpu(1.0))
            .require_label("tier", "gpu")
            .require_label("zone", "east");

        let rejection = evaluate_node(&n, &n.capacity, &policy, &BTreeMap::new()).unwrap_err();
        assert_eq!(
            rejection,
            Rejection::MissingLabels(vec!["tier=gpu".to_string(), "zone=east".to_string()])
        );
        assert_eq!(rejection.to_string(), "missing tier=gpu/zone=east");
    }

    #[test]
    fn rejects_insufficient_remaining_capacity() {
        let n = node("a", 4.0);
        let policy = PlacementPolicy::with_resources(cpu(3.0));
        let remaining = cpu(2.0);

        assert_eq!(
            evaluate_node(&n, &remaining, &policy, &BTreeMap::new()),
            Err(Rejection::InsufficientCapacity)
        );
    }

    #[test]
    fn rejects_anti_affinity_conflict() {
        let n = node("a", 4.0);
        let policy = PlacementPolicy::with_resources(cpu(1.0)).with_anti_affinity("y");

        assert_eq!(
            evaluate_node(&n, &n.capacity, &policy, &placed(&[("y", "a")])),
            Err(Rejection::AntiAffinity)
        );
        assert!(evaluate_node(&n, &n.capacity, &policy, &placed(&[("y", "b")])).is_ok());
    }

    #[test]
    fn base_plus_capped_headroom() {
        let n = node("a", 100.0);
        let policy = PlacementPolicy::with_resources(cpu(1.0));

        let scored = evaluate_node(&n, &n.capacity, &policy, &BTreeMap::new()).unwrap();
        assert_eq!(scored.score, BASE_SCORE + HEADROOM_CAP);
        assert_eq!(scored.reasons, ["headroom 100.00"]);
    }

    #[test]
    fn headroom_uses_tightest_demanded_dimension() {
        let remaining = ResourceProfile::new(8.0, 16.0, 100.0, 0.0).unwrap();
        let demand = ResourceProfile::new(2.0, 8.0, 0.0, 0.0).unwrap();
        assert_eq!(headroom_ratio(&remaining, &demand), 2.0);
        assert_eq!(headroom_ratio(&remaining, &ResourceProfile::zero()), HEADROOM_CAP);
    }

    #[test]
    fn preferred_labels_add_five_each() {
        let n = node("a", 4.0).with_label("tier", "gpu").with_label("ssd", "yes");
        let policy = PlacementPolicy::with_resources(cpu(2.0))
            .prefer_label("tier", "gpu")
            .prefer_label("ssd", "yes")
            .prefer_label("zone", "east");

        let scored = evaluate_node(&n, &n.capacity, &policy, &BTreeMap::new()).unwrap();
        // 1.0 base + 2 * 5.0 + headroom 2.0
        assert_eq!(scored.score, 13.0);
        assert!(scored.reasons.contains(&"preferred label tier=gpu".to_string()));
        assert!(scored.reasons.contains(&"preferred label ssd=yes".to_string()));
    }

    #[test]
    fn affinity_bonus_applies_once() {
        let n = node("a", 4.0);
        let policy = PlacementPolicy::with_resources(cpu(2.0))
            .with_affinity("db")
            .with_affinity("cache");

        let scored = evaluate_node(
            &n,
            &n.capacity,
            &policy,
            &placed(&[("db", "a"), ("cache", "a")]),
        )
        .unwrap();
        assert_eq!(scored.score, BASE_SCORE + 2.0 + AFFINITY_BONUS);
        assert!(scored.reasons.contains(&"affinity with cache, db".to_string()));
    }

    #[test]
    fn affinity_elsewhere_is_penalised_per_peer() {
        let n = node("a", 4.0);
        let policy = PlacementPolicy::with_resources(cpu(2.0))
            .with_affinity("db")
            .with_affinity("cache")
            .with_affinity("queue");

        let scored = evaluate_node(
            &n,
            &n.capacity,
            &policy,
            &placed(&[("db", "b"), ("cache", "c")]),
        )
        .unwrap();
        // queue is not placed yet and contributes nothing.
        assert_eq!(scored.score, BASE_SCORE + 2.0 - 2.0 * AFFINITY_ELSEWHERE_PENALTY);
        assert!(scored.reasons.contains(&"affinity prefers db on this node".to_string()));
    }
}
