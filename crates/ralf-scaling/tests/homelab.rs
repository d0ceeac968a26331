//! End-to-end planning against a three-node homelab inventory.
//!
//! Loads the fixture, orders components by dependency, plans placement
//! and runs what-if scaling scenarios over the result.

use std::collections::HashMap;
use std::path::PathBuf;

use ralf_core::{Component, CoreError, Inventory, Resource, resolve_dependencies};
use ralf_placement::{DistributedPlan, PlacementError, plan_distributed_deployment};
use ralf_scaling::simulate_scaling;

fn load_inventory() -> Inventory {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/homelab.toml");
    Inventory::from_file(&path).unwrap()
}

fn plan(inventory: &Inventory) -> (Vec<Component>, DistributedPlan) {
    let ordered = resolve_dependencies(&inventory.components).unwrap();
    let plan = plan_distributed_deployment(&ordered, &inventory.nodes);
    (ordered, plan)
}

#[test]
fn components_are_ordered_by_dependency() {
    let inventory = load_inventory();
    let ordered = resolve_dependencies(&inventory.components).unwrap();
    let names: Vec<&str> = ordered.iter().map(|c| c.name.as_str()).collect();

    assert_eq!(
        names,
        [
            "postgresql",
            "gitea",
            "vaultwarden",
            "vector-db",
            "observability",
            "backups",
            "docs",
        ]
    );
}

#[test]
fn plan_assigns_every_component() {
    let inventory = load_inventory();
    let (_, plan) = plan(&inventory);

    assert!(plan.unsatisfied_requirements().is_empty());
    assert!(plan.ensure_satisfied().is_ok());

    assert_eq!(plan.assignment_for("postgresql").unwrap(), Some("pve01"));
    assert_eq!(plan.assignment_for("gitea").unwrap(), Some("pve01"));
    assert_eq!(plan.assignment_for("vector-db").unwrap(), Some("pve01"));
    assert_eq!(plan.assignment_for("vaultwarden").unwrap(), Some("pve02"));
    assert_eq!(plan.assignment_for("observability").unwrap(), Some("pve02"));
    assert_eq!(plan.assignment_for("backups").unwrap(), Some("pbs01"));
    assert_eq!(plan.assignment_for("docs").unwrap(), None);
    assert!(!plan.decision("docs").unwrap().required);

    assert_ne!(plan.placements["postgresql"], plan.placements["vaultwarden"]);

    assert_eq!(plan.node_usage["pve01"].cpu(), 16.0);
    assert_eq!(plan.node_usage["pve01"].memory_gb(), 72.0);
    assert_eq!(plan.node_usage["pve02"].cpu(), 8.0);
    assert_eq!(plan.node_usage["pve02"].network_gbps(), 5.0);
    assert_eq!(plan.node_usage["pbs01"].storage_gb(), 2000.0);

    // Capacity is reported as declared, not as what is left.
    assert_eq!(plan.node_capacity["pve01"], inventory.node("pve01").unwrap().capacity);

    let backups = inventory.component("backups").unwrap();
    let host = inventory.node(&plan.placements[&backups.name]).unwrap();
    assert_eq!(host.role, "backup");
}

#[test]
fn gitea_follows_its_database() {
    let inventory = load_inventory();
    let (_, plan) = plan(&inventory);

    let gitea = plan.decision("gitea").unwrap();
    // 1.0 base + headroom 4.0 + 8.0 affinity
    assert_eq!(gitea.score, 13.0);
    assert!(gitea.reasons.contains(&"affinity with postgresql".to_string()));
}

#[test]
fn placed_nodes_satisfy_hard_constraints() {
    let inventory = load_inventory();
    let (ordered, plan) = plan(&inventory);

    for component in &ordered {
        let Some(policy) = &component.placement else {
            continue;
        };
        let node_name = plan.placements[&component.name].as_str();
        let node = inventory.node(node_name).unwrap();

        for (key, value) in &policy.required_labels {
            assert!(node.has_label(key, value), "{} on {node_name}", component.name);
        }
        for peer in &policy.anti_affinity {
            assert_ne!(plan.placements.get(peer).map(String::as_str), Some(node_name));
        }
    }
}

#[test]
fn usage_never_exceeds_capacity() {
    let inventory = load_inventory();
    let (_, plan) = plan(&inventory);

    for (node, usage) in &plan.node_usage {
        assert!(plan.node_capacity[node].can_host(usage), "{node} over capacity");
    }
}

#[test]
fn missing_backup_node_fails_fast() {
    let mut inventory = load_inventory();
    inventory.nodes.retain(|n| n.name != "pbs01");
    let (_, plan) = plan(&inventory);

    assert_eq!(plan.unsatisfied_requirements(), ["backups"]);
    assert_eq!(
        plan.decision("backups").unwrap().reasons,
        ["pve01: missing role=backup; pve02: missing role=backup"]
    );
    assert_eq!(
        plan.ensure_satisfied(),
        Err(PlacementError::Unsatisfied(vec!["backups".to_string()]))
    );
    // Everything else still placed.
    assert_eq!(plan.placements.len(), 5);
}

#[test]
fn scaling_identifies_pressure() {
    let inventory = load_inventory();
    let (ordered, plan) = plan(&inventory);

    let overrides: HashMap<String, f64> = [
        ("vector-db".to_string(), 3.0),
        ("observability".to_string(), 3.0),
    ]
    .into_iter()
    .collect();
    let sim = simulate_scaling(&plan, &ordered, &overrides);

    let deficits: Vec<(&str, Resource, f64, f64)> = sim
        .deficits
        .iter()
        .map(|d| (d.node.as_str(), d.resource, d.required, d.available))
        .collect();
    assert_eq!(
        deficits,
        [
            ("pve01", Resource::MemoryGb, 136.0, 128.0),
            ("pve02", Resource::Cpu, 20.0, 16.0),
            ("pve02", Resource::NetworkGbps, 13.0, 12.0),
        ]
    );

    // Exactly at capacity is fine.
    assert_eq!(sim.usage["pve01"].cpu(), 24.0);
    assert_eq!(sim.usage["pbs01"], plan.node_usage["pbs01"]);

    let report = sim.to_json().unwrap();
    assert_eq!(report["deficits"].as_array().unwrap().len(), 3);
    assert_eq!(report["deficits"][0]["resource"], "memory_gb");
}

#[test]
fn cyclic_inventory_is_rejected_before_planning() {
    let mut inventory = load_inventory();
    if let Some(pg) = inventory.components.iter_mut().find(|c| c.name == "postgresql") {
        pg.depends_on.push("docs".to_string());
    }

    let err = resolve_dependencies(&inventory.components).unwrap_err();
    assert!(matches!(err, CoreError::Cycle { .. }), "unexpected error: {err}");
}
