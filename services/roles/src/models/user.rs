//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Legacy flat role, kept on every user alongside the optional custom
/// role assignment
///
/// `admin` and `provider` only appear on accounts created before the
/// tree-based roles existed; migration converts both to `clinic_user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyRole {
    Superadmin,
    Admin,
    Provider,
    ClinicUser,
    Patient,
}

/// Error returned when a string does not name a known role
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl LegacyRole {
    /// The snake_case name stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            LegacyRole::Superadmin => "superadmin",
            LegacyRole::Admin => "admin",
            LegacyRole::Provider => "provider",
            LegacyRole::ClinicUser => "clinic_user",
            LegacyRole::Patient => "patient",
        }
    }
}

impl fmt::Display for LegacyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegacyRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(LegacyRole::Superadmin),
            "admin" => Ok(LegacyRole::Admin),
            "provider" => Ok(LegacyRole::Provider),
            "clinic_user" => Ok(LegacyRole::ClinicUser),
            "patient" => Ok(LegacyRole::Patient),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: LegacyRole,
    pub is_owner: bool,
    pub custom_role_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub tenant_id: Uuid,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: LegacyRole,
}
