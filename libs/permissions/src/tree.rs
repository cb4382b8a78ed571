//! The permission tree model and its path-based operations
//!
//! A tree maps each known section to an enable flag plus optional nested
//! features, components and tabs. Reads are gated by every ancestor's
//! enable flag; writes of `false` eagerly cascade to all descendants so
//! stored state and effective state never diverge after a write. The tree
//! is a value: mutation always goes through [`PermissionTree::set_value`],
//! which returns a new tree and leaves the input untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::warn;

use crate::path::PermissionPath;
use crate::section::SectionKey;

/// Full nested enable/disable configuration for one role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionTree {
    pub(crate) sections: BTreeMap<SectionKey, Section>,
}

/// A top-level section: an enable flag plus optional feature toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub enabled: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, Feature>,
}

/// A capability within a section
///
/// On the wire a feature is either a plain boolean leaf or an object
/// carrying its own enable flag and component toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Feature {
    Leaf(bool),
    Node(FeatureNode),
}

/// Object form of a feature, holding component toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureNode {
    pub enabled: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, Component>,
}

/// A sub-toggle beneath a feature, either a boolean leaf or an object
/// carrying tab toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Component {
    Leaf(bool),
    Node(ComponentNode),
}

/// Object form of a component, holding tab toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentNode {
    pub enabled: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tabs: BTreeMap<String, bool>,
}

impl Default for Section {
    fn default() -> Self {
        Section {
            enabled: false,
            features: BTreeMap::new(),
        }
    }
}

impl FeatureNode {
    fn disabled() -> Self {
        FeatureNode {
            enabled: false,
            components: BTreeMap::new(),
        }
    }

    fn disable_descendants(&mut self) {
        for component in self.components.values_mut() {
            component.force_disable();
        }
    }
}

impl ComponentNode {
    fn disabled() -> Self {
        ComponentNode {
            enabled: false,
            tabs: BTreeMap::new(),
        }
    }

    fn disable_descendants(&mut self) {
        for tab in self.tabs.values_mut() {
            *tab = false;
        }
    }
}

impl Section {
    fn disable_descendants(&mut self) {
        for feature in self.features.values_mut() {
            feature.force_disable();
        }
    }
}

impl Feature {
    fn force_disable(&mut self) {
        match self {
            Feature::Leaf(value) => *value = false,
            Feature::Node(node) => {
                node.enabled = false;
                node.disable_descendants();
            }
        }
    }

    /// Promote a leaf to its object form so a child can be attached; the
    /// previous boolean becomes the node's enable flag
    fn as_node_mut(&mut self) -> &mut FeatureNode {
        if let Feature::Leaf(value) = *self {
            *self = Feature::Node(FeatureNode {
                enabled: value,
                components: BTreeMap::new(),
            });
        }
        match self {
            Feature::Node(node) => node,
            Feature::Leaf(_) => unreachable!("leaf was just promoted"),
        }
    }
}

impl Component {
    fn force_disable(&mut self) {
        match self {
            Component::Leaf(value) => *value = false,
            Component::Node(node) => {
                node.enabled = false;
                node.disable_descendants();
            }
        }
    }

    fn as_node_mut(&mut self) -> &mut ComponentNode {
        if let Component::Leaf(value) = *self {
            *self = Component::Node(ComponentNode {
                enabled: value,
                tabs: BTreeMap::new(),
            });
        }
        match self {
            Component::Node(node) => node,
            Component::Leaf(_) => unreachable!("leaf was just promoted"),
        }
    }
}

impl PermissionTree {
    /// An empty tree; every section reads as disabled
    pub fn new() -> Self {
        PermissionTree::default()
    }

    /// The stored state of a section, if present
    pub fn section(&self, key: SectionKey) -> Option<&Section> {
        self.sections.get(&key)
    }

    /// Effective value of the node at `path`
    ///
    /// Walks the tree top-down. Any missing node resolves to `false`, and
    /// a disabled ancestor gates everything beneath it to `false`
    /// regardless of stored values. The terminal node contributes its
    /// boolean as-is (or its own enable flag, for object forms).
    pub fn get_value(&self, path: &PermissionPath) -> bool {
        let Some(section) = self.sections.get(&path.section_key()) else {
            return false;
        };
        let feature_key = match path {
            PermissionPath::Section(_) => return section.enabled,
            PermissionPath::Feature { feature, .. }
            | PermissionPath::Component { feature, .. }
            | PermissionPath::Tab { feature, .. } => feature,
        };
        if !section.enabled {
            return false;
        }
        let Some(feature) = section.features.get(feature_key) else {
            return false;
        };
        let component_key = match path {
            PermissionPath::Feature { .. } => {
                return match feature {
                    Feature::Leaf(value) => *value,
                    Feature::Node(node) => node.enabled,
                };
            }
            PermissionPath::Component { component, .. }
            | PermissionPath::Tab { component, .. } => component,
            PermissionPath::Section(_) => return false,
        };
        // Descending past a feature requires its object form, enabled.
        let Feature::Node(feature_node) = feature else {
            return false;
        };
        if !feature_node.enabled {
            return false;
        }
        let Some(component) = feature_node.components.get(component_key) else {
            return false;
        };
        match path {
            PermissionPath::Component { .. } => match component {
                Component::Leaf(value) => *value,
                Component::Node(node) => node.enabled,
            },
            PermissionPath::Tab { tab, .. } => {
                let Component::Node(component_node) = component else {
                    return false;
                };
                if !component_node.enabled {
                    return false;
                }
                component_node.tabs.get(tab).copied().unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Return a new tree with the node at `path` set to `value`
    ///
    /// Intermediate containers are materialized disabled as needed, so
    /// writing deep into an empty tree never grants anything by itself.
    /// Writing `false` to a container eagerly disables every descendant.
    pub fn set_value(&self, path: &PermissionPath, value: bool) -> PermissionTree {
        let mut tree = self.clone();
        match path {
            PermissionPath::Section(section) => {
                let section = tree.sections.entry(*section).or_default();
                section.enabled = value;
                if !value {
                    section.disable_descendants();
                }
            }
            PermissionPath::Feature { section, feature } => {
                let section = tree.sections.entry(*section).or_default();
                match section.features.entry(feature.clone()) {
                    Entry::Occupied(mut entry) => match entry.get_mut() {
                        Feature::Leaf(stored) => *stored = value,
                        Feature::Node(node) => {
                            node.enabled = value;
                            if !value {
                                node.disable_descendants();
                            }
                        }
                    },
                    Entry::Vacant(entry) => {
                        entry.insert(Feature::Leaf(value));
                    }
                }
            }
            PermissionPath::Component {
                section,
                feature,
                component,
            } => {
                let section = tree.sections.entry(*section).or_default();
                let feature = section
                    .features
                    .entry(feature.clone())
                    .or_insert_with(|| Feature::Node(FeatureNode::disabled()))
                    .as_node_mut();
                match feature.components.entry(component.clone()) {
                    Entry::Occupied(mut entry) => match entry.get_mut() {
                        Component::Leaf(stored) => *stored = value,
                        Component::Node(node) => {
                            node.enabled = value;
                            if !value {
                                node.disable_descendants();
                            }
                        }
                    },
                    Entry::Vacant(entry) => {
                        entry.insert(Component::Leaf(value));
                    }
                }
            }
            PermissionPath::Tab {
                section,
                feature,
                component,
                tab,
            } => {
                let section = tree.sections.entry(*section).or_default();
                let feature = section
                    .features
                    .entry(feature.clone())
                    .or_insert_with(|| Feature::Node(FeatureNode::disabled()))
                    .as_node_mut();
                let component = feature
                    .components
                    .entry(component.clone())
                    .or_insert_with(|| Component::Node(ComponentNode::disabled()))
                    .as_node_mut();
                component.tabs.insert(tab.clone(), value);
            }
        }
        tree
    }

    /// Decode a persisted or externally supplied document
    ///
    /// The input is untrusted: unknown section keys are ignored with a
    /// warning, and anything malformed decodes to a denied state rather
    /// than failing. This function never errors.
    pub fn from_value(value: &Value) -> PermissionTree {
        let Some(object) = value.as_object() else {
            if !value.is_null() {
                warn!("permission document is not an object, treating as no access");
            }
            return PermissionTree::new();
        };
        let mut sections = BTreeMap::new();
        for (name, raw) in object {
            match name.parse::<SectionKey>() {
                Ok(key) => {
                    sections.insert(key, Section::from_value(name, raw));
                }
                Err(_) => warn!("ignoring unknown permission section: {}", name),
            }
        }
        PermissionTree { sections }
    }
}

impl<'de> Deserialize<'de> for PermissionTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(PermissionTree::from_value(&value))
    }
}

impl Section {
    fn from_value(name: &str, value: &Value) -> Section {
        let Some(object) = value.as_object() else {
            warn!("section {} is not an object, treating as disabled", name);
            return Section::default();
        };
        let enabled = object.get("enabled").and_then(Value::as_bool).unwrap_or(false);
        let mut features = BTreeMap::new();
        match object.get("features") {
            Some(Value::Object(map)) => {
                for (key, raw) in map {
                    features.insert(key.clone(), Feature::from_value(key, raw));
                }
            }
            Some(_) => warn!("section {} has a non-object features field, ignoring it", name),
            None => {}
        }
        Section { enabled, features }
    }
}

impl Feature {
    fn from_value(name: &str, value: &Value) -> Feature {
        match value {
            Value::Bool(flag) => Feature::Leaf(*flag),
            Value::Object(object) => {
                let enabled = object.get("enabled").and_then(Value::as_bool).unwrap_or(false);
                let mut components = BTreeMap::new();
                match object.get("components") {
                    Some(Value::Object(map)) => {
                        for (key, raw) in map {
                            components.insert(key.clone(), Component::from_value(key, raw));
                        }
                    }
                    Some(_) => {
                        warn!("feature {} has a non-object components field, ignoring it", name)
                    }
                    None => {}
                }
                Feature::Node(FeatureNode {
                    enabled,
                    components,
                })
            }
            _ => {
                warn!("feature {} is neither a boolean nor an object, denying it", name);
                Feature::Leaf(false)
            }
        }
    }
}

impl Component {
    fn from_value(name: &str, value: &Value) -> Component {
        match value {
            Value::Bool(flag) => Component::Leaf(*flag),
            Value::Object(object) => {
                let enabled = object.get("enabled").and_then(Value::as_bool).unwrap_or(false);
                let mut tabs = BTreeMap::new();
                match object.get("tabs") {
                    Some(Value::Object(map)) => {
                        for (key, raw) in map {
                            tabs.insert(key.clone(), raw.as_bool().unwrap_or(false));
                        }
                    }
                    Some(_) => {
                        warn!("component {} has a non-object tabs field, ignoring it", name)
                    }
                    None => {}
                }
                Component::Node(ComponentNode { enabled, tabs })
            }
            _ => {
                warn!("component {} is neither a boolean nor an object, denying it", name);
                Component::Leaf(false)
            }
        }
    }
}
