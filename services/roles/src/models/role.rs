//! Custom role model and related functionality

use chrono::{DateTime, Utc};
use permissions::PermissionTree;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Custom role entity
///
/// Template roles (`is_template = true`) are reusable presets scoped to a
/// tenant; regular custom roles are assigned to users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRole {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub permissions: PermissionTree,
    pub is_template: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New custom role creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomRole {
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub permissions: PermissionTree,
    pub is_template: bool,
}

/// Custom role update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomRole {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<PermissionTree>,
}
