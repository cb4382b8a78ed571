//! Typed addressing of nodes in a permission tree

use crate::section::SectionKey;

/// Address of a single node in a [`PermissionTree`](crate::PermissionTree)
///
/// Legacy documents and API payloads address nodes with string arrays that
/// interleave the structural markers `features`, `components` and `tabs`
/// between key names. [`PermissionPath::parse`] accepts that form and
/// [`PermissionPath::segments`] renders it back, so the typed variant can
/// replace stringly paths without changing addressing semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionPath {
    /// A top-level section
    Section(SectionKey),
    /// A feature within a section
    Feature {
        section: SectionKey,
        feature: String,
    },
    /// A component beneath a feature
    Component {
        section: SectionKey,
        feature: String,
        component: String,
    },
    /// A tab beneath a component, the deepest addressable node
    Tab {
        section: SectionKey,
        feature: String,
        component: String,
        tab: String,
    },
}

impl PermissionPath {
    /// Address a section
    pub fn section(section: SectionKey) -> Self {
        PermissionPath::Section(section)
    }

    /// Address a feature within a section
    pub fn feature(section: SectionKey, feature: impl Into<String>) -> Self {
        PermissionPath::Feature {
            section,
            feature: feature.into(),
        }
    }

    /// Address a component beneath a feature
    pub fn component(
        section: SectionKey,
        feature: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        PermissionPath::Component {
            section,
            feature: feature.into(),
            component: component.into(),
        }
    }

    /// Address a tab beneath a component
    pub fn tab(
        section: SectionKey,
        feature: impl Into<String>,
        component: impl Into<String>,
        tab: impl Into<String>,
    ) -> Self {
        PermissionPath::Tab {
            section,
            feature: feature.into(),
            component: component.into(),
            tab: tab.into(),
        }
    }

    /// The section this path lives under
    pub fn section_key(&self) -> SectionKey {
        match self {
            PermissionPath::Section(section)
            | PermissionPath::Feature { section, .. }
            | PermissionPath::Component { section, .. }
            | PermissionPath::Tab { section, .. } => *section,
        }
    }

    /// Parse the legacy marker form
    ///
    /// Accepted shapes:
    /// - `[section]`
    /// - `[section, "features", feature]`
    /// - `[section, "features", feature, "components", component]`
    /// - `[section, "features", feature, "components", component, "tabs", tab]`
    ///
    /// Returns `None` for an unknown section or any other shape.
    pub fn parse<S: AsRef<str>>(segments: &[S]) -> Option<PermissionPath> {
        let segments: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
        let section: SectionKey = segments.first()?.parse().ok()?;
        match segments.as_slice() {
            [_] => Some(PermissionPath::Section(section)),
            [_, "features", feature] => Some(PermissionPath::feature(section, *feature)),
            [_, "features", feature, "components", component] => {
                Some(PermissionPath::component(section, *feature, *component))
            }
            [_, "features", feature, "components", component, "tabs", tab] => {
                Some(PermissionPath::tab(section, *feature, *component, *tab))
            }
            _ => None,
        }
    }

    /// Render the path back to its legacy marker form
    pub fn segments(&self) -> Vec<String> {
        match self {
            PermissionPath::Section(section) => vec![section.to_string()],
            PermissionPath::Feature { section, feature } => {
                vec![section.to_string(), "features".to_string(), feature.clone()]
            }
            PermissionPath::Component {
                section,
                feature,
                component,
            } => vec![
                section.to_string(),
                "features".to_string(),
                feature.clone(),
                "components".to_string(),
                component.clone(),
            ],
            PermissionPath::Tab {
                section,
                feature,
                component,
                tab,
            } => vec![
                section.to_string(),
                "features".to_string(),
                feature.clone(),
                "components".to_string(),
                component.clone(),
                "tabs".to_string(),
                tab.clone(),
            ],
        }
    }

    /// Whether `self` strictly contains `other` (a proper ancestor)
    pub fn is_ancestor_of(&self, other: &PermissionPath) -> bool {
        if self.section_key() != other.section_key() {
            return false;
        }
        match (self, other) {
            (PermissionPath::Section(_), PermissionPath::Section(_)) => false,
            (PermissionPath::Section(_), _) => true,
            (
                PermissionPath::Feature { feature: f, .. },
                PermissionPath::Component { feature, .. } | PermissionPath::Tab { feature, .. },
            ) => f == feature,
            (
                PermissionPath::Component {
                    feature: f,
                    component: c,
                    ..
                },
                PermissionPath::Tab {
                    feature, component, ..
                },
            ) => f == feature && c == component,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_depths() {
        assert_eq!(
            PermissionPath::parse(&["patients"]),
            Some(PermissionPath::section(SectionKey::Patients))
        );
        assert_eq!(
            PermissionPath::parse(&["patients", "features", "edit"]),
            Some(PermissionPath::feature(SectionKey::Patients, "edit"))
        );
        assert_eq!(
            PermissionPath::parse(&["billing", "features", "claims", "components", "submit"]),
            Some(PermissionPath::component(
                SectionKey::Billing,
                "claims",
                "submit"
            ))
        );
        assert_eq!(
            PermissionPath::parse(&[
                "settings", "features", "practice", "components", "branding", "tabs", "logo",
            ]),
            Some(PermissionPath::tab(
                SectionKey::Settings,
                "practice",
                "branding",
                "logo"
            ))
        );
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert_eq!(PermissionPath::parse::<&str>(&[]), None);
        // Unknown section
        assert_eq!(PermissionPath::parse(&["dashboard"]), None);
        // Missing structural marker
        assert_eq!(PermissionPath::parse(&["patients", "edit"]), None);
        // Wrong marker at feature depth
        assert_eq!(PermissionPath::parse(&["patients", "components", "edit"]), None);
        // Trailing marker without a key
        assert_eq!(PermissionPath::parse(&["patients", "features"]), None);
    }

    #[test]
    fn test_segments_roundtrip() {
        let paths = [
            PermissionPath::section(SectionKey::Reports),
            PermissionPath::feature(SectionKey::Reports, "export"),
            PermissionPath::component(SectionKey::Billing, "invoices", "void"),
            PermissionPath::tab(SectionKey::Settings, "practice", "branding", "theme"),
        ];
        for path in paths {
            let segments = path.segments();
            assert_eq!(PermissionPath::parse(&segments), Some(path));
        }
    }

    #[test]
    fn test_is_ancestor_of() {
        let section = PermissionPath::section(SectionKey::Billing);
        let feature = PermissionPath::feature(SectionKey::Billing, "claims");
        let component = PermissionPath::component(SectionKey::Billing, "claims", "submit");

        assert!(section.is_ancestor_of(&feature));
        assert!(section.is_ancestor_of(&component));
        assert!(feature.is_ancestor_of(&component));
        assert!(!feature.is_ancestor_of(&section));
        assert!(!section.is_ancestor_of(&section));
        assert!(!feature.is_ancestor_of(&PermissionPath::component(
            SectionKey::Billing,
            "invoices",
            "void"
        )));
    }
}
