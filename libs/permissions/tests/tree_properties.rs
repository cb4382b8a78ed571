//! Invariant tests for the permission tree
//!
//! These exercise the engine across representative trees and paths:
//! cascading disablement, ancestor gating, write purity, and the
//! fail-safe behavior of validation on arbitrary input.

use permissions::{PermissionPath, PermissionTree, SectionKey, validate_permission_tree};
use serde_json::json;

/// A tree with grants at every depth, used as the base state for the
/// invariant checks below.
fn populated_tree() -> PermissionTree {
    let mut tree = PermissionTree::full_access();
    for (path, value) in [
        (PermissionPath::feature(SectionKey::Patients, "delete"), false),
        (
            PermissionPath::component(SectionKey::Billing, "claims", "submit"),
            false,
        ),
        (
            PermissionPath::tab(SectionKey::Settings, "practice", "branding", "theme"),
            false,
        ),
    ] {
        tree = tree.set_value(&path, value);
    }
    tree
}

/// Every addressable path in the fixed catalog of `populated_tree`.
fn catalog_paths(tree: &PermissionTree) -> Vec<PermissionPath> {
    let mut paths = Vec::new();
    for key in SectionKey::ALL {
        paths.push(PermissionPath::section(key));
        let Some(section) = tree.section(key) else {
            continue;
        };
        for (feature_key, feature) in &section.features {
            paths.push(PermissionPath::feature(key, feature_key.clone()));
            let permissions::Feature::Node(node) = feature else {
                continue;
            };
            for (component_key, component) in &node.components {
                paths.push(PermissionPath::component(
                    key,
                    feature_key.clone(),
                    component_key.clone(),
                ));
                let permissions::Component::Node(node) = component else {
                    continue;
                };
                for tab_key in node.tabs.keys() {
                    paths.push(PermissionPath::tab(
                        key,
                        feature_key.clone(),
                        component_key.clone(),
                        tab_key.clone(),
                    ));
                }
            }
        }
    }
    paths
}

#[test]
fn disabling_a_node_denies_every_descendant() {
    let tree = populated_tree();
    let paths = catalog_paths(&tree);
    for target in &paths {
        let disabled = tree.set_value(target, false);
        for descendant in paths.iter().filter(|p| target.is_ancestor_of(p)) {
            assert!(
                !disabled.get_value(descendant),
                "descendant {descendant:?} still granted after disabling {target:?}"
            );
        }
    }
}

#[test]
fn enabling_a_node_never_grants_unrelated_paths() {
    let tree = populated_tree();
    let paths = catalog_paths(&tree);
    for target in &paths {
        // Descendants are excluded: enabling a gate legitimately restores
        // their stored values. Everything else must stay denied.
        let denied_before: Vec<_> = paths
            .iter()
            .filter(|p| {
                !tree.get_value(p)
                    && !p.is_ancestor_of(target)
                    && !target.is_ancestor_of(p)
                    && *p != target
            })
            .collect();
        let enabled = tree.set_value(target, true);
        for path in denied_before {
            assert!(
                !enabled.get_value(path),
                "{path:?} became granted as a side effect of enabling {target:?}"
            );
        }
    }
}

#[test]
fn disable_is_idempotent() {
    let tree = populated_tree();
    for target in catalog_paths(&tree) {
        let once = tree.set_value(&target, false);
        let twice = once.set_value(&target, false);
        assert_eq!(once, twice, "second disable of {target:?} changed the tree");
    }
}

#[test]
fn disabled_section_gates_all_features() {
    let tree = populated_tree();
    for key in SectionKey::ALL {
        let gated = tree.set_value(&PermissionPath::section(key), false);
        let Some(section) = gated.section(key) else {
            continue;
        };
        for feature in section.features.keys() {
            assert!(!gated.get_value(&PermissionPath::feature(key, feature.clone())));
        }
    }
}

#[test]
fn writes_never_mutate_the_source_tree() {
    let tree = populated_tree();
    let snapshot = tree.clone();
    for target in catalog_paths(&tree) {
        let _ = tree.set_value(&target, true);
        let _ = tree.set_value(&target, false);
    }
    assert_eq!(tree, snapshot);
}

#[test]
fn validation_returns_a_report_for_any_input() {
    let inputs = [
        json!(null),
        json!(42),
        json!("string"),
        json!({}),
        json!([]),
        json!({"patients": {"enabled": {"deeply": ["broken"]}}}),
        json!({"billing": {"enabled": true, "features": {"claims": {"components": 9}}}}),
    ];
    for input in inputs {
        // Must not panic, and is_valid must mirror the errors list.
        let report = validate_permission_tree(&input);
        assert_eq!(report.is_valid, report.errors.is_empty());
    }
}

#[test]
fn stored_state_equals_effective_state_after_disable() {
    // Cascade is eager: after disabling billing, a serialized copy decodes
    // to a tree whose reads agree with the original everywhere.
    let tree = populated_tree().set_value(&PermissionPath::section(SectionKey::Billing), false);
    let reloaded = PermissionTree::from_value(&serde_json::to_value(&tree).unwrap());
    for path in catalog_paths(&tree) {
        assert_eq!(tree.get_value(&path), reloaded.get_value(&path));
    }
    assert_eq!(tree, reloaded);
}
