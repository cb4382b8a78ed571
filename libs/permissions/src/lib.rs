//! Hierarchical permission tree for role-based access control
//!
//! This crate implements the permission model shared by the role editor,
//! role migration, and auditing: a nested structure of sections, features,
//! components and tabs, each independently enable-able, with cascading
//! disablement and fail-safe-closed reads. All operations are pure and
//! synchronous; persistence belongs to the roles service.

mod presets;

pub mod path;
pub mod section;
pub mod summary;
pub mod tree;
pub mod validate;

// Re-export for convenience
pub use path::PermissionPath;
pub use section::{SectionKey, UnknownSection};
pub use summary::PermissionSummary;
pub use tree::{Component, ComponentNode, Feature, FeatureNode, PermissionTree, Section};
pub use validate::{
    SectionReport, TreeReport, VIEW_SCOPES, validate_permission_tree, validate_section_structure,
};
