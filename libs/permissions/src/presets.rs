//! Built-in permission presets
//!
//! Presets seed template roles: an all-disabled baseline, the full-access
//! tree behind the "Owner" template, and the clinical-staff tree behind
//! the "Provider" template.

use std::collections::BTreeMap;

use crate::section::SectionKey;
use crate::tree::{Component, ComponentNode, Feature, FeatureNode, PermissionTree, Section};

fn section(enabled: bool, features: Vec<(&str, Feature)>) -> Section {
    Section {
        enabled,
        features: features
            .into_iter()
            .map(|(key, feature)| (key.to_string(), feature))
            .collect(),
    }
}

fn leaf(value: bool) -> Feature {
    Feature::Leaf(value)
}

fn node(enabled: bool, components: Vec<(&str, Component)>) -> Feature {
    Feature::Node(FeatureNode {
        enabled,
        components: components
            .into_iter()
            .map(|(key, component)| (key.to_string(), component))
            .collect(),
    })
}

fn component(value: bool) -> Component {
    Component::Leaf(value)
}

fn tabbed(enabled: bool, tabs: Vec<(&str, bool)>) -> Component {
    Component::Node(ComponentNode {
        enabled,
        tabs: tabs
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    })
}

impl PermissionTree {
    /// Every section present and disabled; the starting point for a new
    /// custom role
    pub fn default_tree() -> PermissionTree {
        let mut sections = BTreeMap::new();
        for key in SectionKey::ALL {
            sections.insert(key, Section::default());
        }
        PermissionTree { sections }
    }

    /// Everything granted; seeds the "Owner" template role
    pub fn full_access() -> PermissionTree {
        let mut sections = BTreeMap::new();
        sections.insert(
            SectionKey::Patients,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("create", leaf(true)),
                    ("edit", leaf(true)),
                    ("delete", leaf(true)),
                ],
            ),
        );
        sections.insert(
            SectionKey::Appointments,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("create", leaf(true)),
                    ("edit", leaf(true)),
                    ("cancel", leaf(true)),
                ],
            ),
        );
        sections.insert(
            SectionKey::Messages,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("send", leaf(true)),
                    ("delete", leaf(true)),
                ],
            ),
        );
        sections.insert(
            SectionKey::MedicalRecords,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("create", leaf(true)),
                    ("edit", leaf(true)),
                    ("export", leaf(true)),
                ],
            ),
        );
        sections.insert(
            SectionKey::Billing,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    (
                        "invoices",
                        node(
                            true,
                            vec![
                                ("create", component(true)),
                                ("edit", component(true)),
                                ("void", component(true)),
                            ],
                        ),
                    ),
                    (
                        "claims",
                        node(
                            true,
                            vec![
                                ("create", component(true)),
                                ("edit", component(true)),
                                ("submit", component(true)),
                            ],
                        ),
                    ),
                    (
                        "payments",
                        node(
                            true,
                            vec![("record", component(true)), ("refund", component(true))],
                        ),
                    ),
                ],
            ),
        );
        sections.insert(
            SectionKey::Settings,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    (
                        "practice",
                        node(
                            true,
                            vec![
                                ("profile", component(true)),
                                (
                                    "branding",
                                    tabbed(true, vec![("logo", true), ("theme", true)]),
                                ),
                            ],
                        ),
                    ),
                    (
                        "team",
                        node(
                            true,
                            vec![("invite", component(true)), ("remove", component(true))],
                        ),
                    ),
                    (
                        "roles",
                        node(
                            true,
                            vec![
                                ("create", component(true)),
                                ("edit", component(true)),
                                ("delete", component(true)),
                            ],
                        ),
                    ),
                ],
            ),
        );
        sections.insert(
            SectionKey::Reports,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("financial", leaf(true)),
                    ("clinical", leaf(true)),
                    ("export", leaf(true)),
                ],
            ),
        );
        sections.insert(
            SectionKey::AiAssistant,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("chat", leaf(true)),
                    ("summaries", leaf(true)),
                ],
            ),
        );
        PermissionTree { sections }
    }

    /// Clinical access for providers; seeds the "Provider" template role
    ///
    /// Billing stays visible but read-only (container features enabled,
    /// action components denied), settings and financial reporting are
    /// withheld, and patient records cannot be deleted.
    pub fn provider_access() -> PermissionTree {
        let mut sections = BTreeMap::new();
        sections.insert(
            SectionKey::Patients,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("create", leaf(true)),
                    ("edit", leaf(true)),
                    ("delete", leaf(false)),
                ],
            ),
        );
        sections.insert(
            SectionKey::Appointments,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("create", leaf(true)),
                    ("edit", leaf(true)),
                    ("cancel", leaf(true)),
                ],
            ),
        );
        sections.insert(
            SectionKey::Messages,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("send", leaf(true)),
                    ("delete", leaf(false)),
                ],
            ),
        );
        sections.insert(
            SectionKey::MedicalRecords,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("create", leaf(true)),
                    ("edit", leaf(true)),
                    ("export", leaf(true)),
                ],
            ),
        );
        sections.insert(
            SectionKey::Billing,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    (
                        "invoices",
                        node(
                            true,
                            vec![
                                ("create", component(false)),
                                ("edit", component(false)),
                                ("void", component(false)),
                            ],
                        ),
                    ),
                    (
                        "claims",
                        node(
                            true,
                            vec![
                                ("create", component(false)),
                                ("edit", component(false)),
                                ("submit", component(false)),
                            ],
                        ),
                    ),
                    (
                        "payments",
                        node(
                            true,
                            vec![("record", component(false)), ("refund", component(false))],
                        ),
                    ),
                ],
            ),
        );
        sections.insert(SectionKey::Settings, Section::default());
        sections.insert(
            SectionKey::Reports,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("financial", leaf(false)),
                    ("clinical", leaf(true)),
                    ("export", leaf(false)),
                ],
            ),
        );
        sections.insert(
            SectionKey::AiAssistant,
            section(
                true,
                vec![
                    ("view", leaf(true)),
                    ("chat", leaf(true)),
                    ("summaries", leaf(true)),
                ],
            ),
        );
        PermissionTree { sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PermissionPath;

    #[test]
    fn test_default_tree_denies_everything() {
        let tree = PermissionTree::default_tree();
        for key in SectionKey::ALL {
            assert!(tree.section(key).is_some());
            assert!(!tree.get_value(&PermissionPath::section(key)));
        }
    }

    #[test]
    fn test_full_access_grants_patient_delete() {
        let tree = PermissionTree::full_access();
        assert!(tree.get_value(&PermissionPath::section(SectionKey::Patients)));
        assert!(tree.get_value(&PermissionPath::feature(SectionKey::Patients, "delete")));
    }

    #[test]
    fn test_full_access_grants_every_section() {
        let tree = PermissionTree::full_access();
        for key in SectionKey::ALL {
            assert!(tree.get_value(&PermissionPath::section(key)), "{key} disabled");
        }
    }

    #[test]
    fn test_full_access_grants_deep_tabs() {
        let tree = PermissionTree::full_access();
        assert!(tree.get_value(&PermissionPath::tab(
            SectionKey::Settings,
            "practice",
            "branding",
            "logo",
        )));
    }

    #[test]
    fn test_provider_settings_disabled() {
        let tree = PermissionTree::provider_access();
        assert!(!tree.get_value(&PermissionPath::section(SectionKey::Settings)));
    }

    #[test]
    fn test_provider_billing_is_read_only() {
        let tree = PermissionTree::provider_access();
        // Claims are visible...
        assert!(tree.get_value(&PermissionPath::feature(SectionKey::Billing, "claims")));
        // ...but no billing action is granted.
        for action in ["create", "edit", "submit"] {
            assert!(!tree.get_value(&PermissionPath::component(
                SectionKey::Billing,
                "claims",
                action
            )));
        }
        for action in ["create", "edit", "void"] {
            assert!(!tree.get_value(&PermissionPath::component(
                SectionKey::Billing,
                "invoices",
                action
            )));
        }
    }

    #[test]
    fn test_provider_cannot_delete_patients() {
        let tree = PermissionTree::provider_access();
        assert!(tree.get_value(&PermissionPath::feature(SectionKey::Patients, "view")));
        assert!(!tree.get_value(&PermissionPath::feature(SectionKey::Patients, "delete")));
    }
}
