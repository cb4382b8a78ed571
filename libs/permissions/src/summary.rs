//! Role-wide permission summaries for review screens and audit records

use serde::Serialize;
use std::collections::BTreeMap;

use crate::path::PermissionPath;
use crate::section::SectionKey;
use crate::tree::PermissionTree;

/// Aggregated view of what a permission tree grants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionSummary {
    /// Sections whose stored enable flag is set, in canonical order
    pub enabled_sections: Vec<SectionKey>,
    /// Sections disabled or absent, in canonical order
    pub disabled_sections: Vec<SectionKey>,
    /// For each enabled section, the feature keys whose effective value
    /// is granted
    pub enabled_features: BTreeMap<SectionKey, Vec<String>>,
    /// Total number of granted features across all sections
    pub total_enabled_features: usize,
}

impl PermissionTree {
    /// Summarize the tree
    ///
    /// Sections are visited in [`SectionKey::ALL`] order so the output is
    /// stable regardless of how the tree was built. Feature membership is
    /// judged by effective value, so a feature stored `true` under a gate
    /// that denies it does not count.
    pub fn summarize(&self) -> PermissionSummary {
        let mut summary = PermissionSummary {
            enabled_sections: Vec::new(),
            disabled_sections: Vec::new(),
            enabled_features: BTreeMap::new(),
            total_enabled_features: 0,
        };
        for key in SectionKey::ALL {
            let Some(section) = self.section(key).filter(|section| section.enabled) else {
                summary.disabled_sections.push(key);
                continue;
            };
            summary.enabled_sections.push(key);
            let granted: Vec<String> = section
                .features
                .keys()
                .filter(|feature| self.get_value(&PermissionPath::feature(key, feature.as_str())))
                .cloned()
                .collect();
            summary.total_enabled_features += granted.len();
            summary.enabled_features.insert(key, granted);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree_summary() {
        let summary = PermissionTree::new().summarize();
        assert!(summary.enabled_sections.is_empty());
        assert_eq!(summary.disabled_sections.len(), SectionKey::ALL.len());
        assert_eq!(summary.total_enabled_features, 0);
    }

    #[test]
    fn test_summary_counts_effective_grants_only() {
        let tree = PermissionTree::new()
            .set_value(&PermissionPath::section(SectionKey::Patients), true)
            .set_value(&PermissionPath::feature(SectionKey::Patients, "view"), true)
            .set_value(&PermissionPath::feature(SectionKey::Patients, "edit"), true)
            .set_value(&PermissionPath::feature(SectionKey::Patients, "delete"), false)
            // Stored grant under a disabled section must not count.
            .set_value(&PermissionPath::feature(SectionKey::Billing, "view"), true);

        let summary = tree.summarize();
        assert_eq!(summary.enabled_sections, vec![SectionKey::Patients]);
        assert_eq!(
            summary.enabled_features.get(&SectionKey::Patients),
            Some(&vec!["edit".to_string(), "view".to_string()])
        );
        assert!(!summary.enabled_features.contains_key(&SectionKey::Billing));
        assert_eq!(summary.total_enabled_features, 2);
    }

    #[test]
    fn test_summary_section_order_is_canonical() {
        // Enable sections in reverse canonical order; the summary must
        // still list them canonically.
        let tree = PermissionTree::new()
            .set_value(&PermissionPath::section(SectionKey::Reports), true)
            .set_value(&PermissionPath::section(SectionKey::Patients), true);
        let summary = tree.summarize();
        assert_eq!(
            summary.enabled_sections,
            vec![SectionKey::Patients, SectionKey::Reports]
        );
    }

    #[test]
    fn test_full_access_summary() {
        let summary = PermissionTree::full_access().summarize();
        assert_eq!(summary.enabled_sections.len(), SectionKey::ALL.len());
        assert!(summary.disabled_sections.is_empty());
        // Every catalog feature is granted: 4+4+3+4+4+4+4+3.
        assert_eq!(summary.total_enabled_features, 30);
    }
}
