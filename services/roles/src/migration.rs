//! Legacy role migration
//!
//! Accounts created before tree-based roles hold a flat `admin` or
//! `provider` role. Migration converts both to `clinic_user`, recording
//! the admin's ownership as `is_owner`. The transition is one-way and
//! replay-safe: deciding what to do is a pure function over the current
//! user record, so a retried call observes the already-migrated state and
//! performs no write.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{LegacyRole, User};

/// Errors raised by the migration procedures
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Unknown user id
    #[error("user {0} not found")]
    UserNotFound(Uuid),

    /// Admin migration requested for a user that is not an admin
    #[error("user {0} is not an admin")]
    NotAnAdmin(Uuid),

    /// Provider migration requested for a user that is not a provider
    #[error("user {0} is not a provider")]
    NotAProvider(Uuid),

    /// Underlying store failure
    #[error("migration store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// What the store must do to complete a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStep {
    /// First-time migration: write the new role and ownership flag
    Apply { is_owner: bool },
    /// The user is already migrated consistently; nothing to write
    AlreadyMigrated,
}

/// Outcome reported to the caller
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub success: bool,
    pub old_role: LegacyRole,
    pub new_role: LegacyRole,
    pub is_owner: bool,
    pub message: String,
}

/// Decide how to migrate a legacy admin
///
/// `admin` becomes `clinic_user` with `is_owner = true`. A `clinic_user`
/// that already owns the clinic replays as a no-op; any other state is
/// not an admin.
pub fn plan_admin_migration(user: &User) -> Result<MigrationStep, MigrationError> {
    match user.role {
        LegacyRole::Admin => Ok(MigrationStep::Apply { is_owner: true }),
        LegacyRole::ClinicUser if user.is_owner => Ok(MigrationStep::AlreadyMigrated),
        _ => Err(MigrationError::NotAnAdmin(user.id)),
    }
}

/// Decide how to migrate a legacy provider
///
/// `provider` becomes `clinic_user` with `is_owner = false`. A
/// non-owning `clinic_user` replays as a no-op; any other state is not a
/// provider.
pub fn plan_provider_migration(user: &User) -> Result<MigrationStep, MigrationError> {
    match user.role {
        LegacyRole::Provider => Ok(MigrationStep::Apply { is_owner: false }),
        LegacyRole::ClinicUser if !user.is_owner => Ok(MigrationStep::AlreadyMigrated),
        _ => Err(MigrationError::NotAProvider(user.id)),
    }
}

/// Build the report for a decided step
pub fn report_for(user: &User, step: MigrationStep) -> MigrationReport {
    match step {
        MigrationStep::Apply { is_owner } => MigrationReport {
            success: true,
            old_role: user.role,
            new_role: LegacyRole::ClinicUser,
            is_owner,
            message: format!(
                "user {} migrated from {} to clinic_user",
                user.id, user.role
            ),
        },
        MigrationStep::AlreadyMigrated => MigrationReport {
            success: true,
            old_role: user.role,
            new_role: LegacyRole::ClinicUser,
            is_owner: user.is_owner,
            message: format!("user {} already migrated", user.id),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(role: LegacyRole, is_owner: bool) -> User {
        User {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: "staff@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Alex".to_string(),
            last_name: "Reyes".to_string(),
            role,
            is_owner,
            custom_role_id: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_migrates_to_owner() {
        let user = user_with(LegacyRole::Admin, false);
        let step = plan_admin_migration(&user).unwrap();
        assert_eq!(step, MigrationStep::Apply { is_owner: true });

        let report = report_for(&user, step);
        assert!(report.success);
        assert_eq!(report.old_role, LegacyRole::Admin);
        assert_eq!(report.new_role, LegacyRole::ClinicUser);
        assert!(report.is_owner);
    }

    #[test]
    fn test_provider_migrates_without_ownership() {
        let user = user_with(LegacyRole::Provider, false);
        let step = plan_provider_migration(&user).unwrap();
        assert_eq!(step, MigrationStep::Apply { is_owner: false });
        assert!(!report_for(&user, step).is_owner);
    }

    #[test]
    fn test_admin_replay_reports_already_migrated() {
        // State after a successful admin migration.
        let user = user_with(LegacyRole::ClinicUser, true);
        let step = plan_admin_migration(&user).unwrap();
        assert_eq!(step, MigrationStep::AlreadyMigrated);

        let report = report_for(&user, step);
        assert!(report.success);
        assert!(report.message.contains("already migrated"));
        assert!(report.is_owner);
        assert_eq!(report.old_role, LegacyRole::ClinicUser);
        assert_eq!(report.new_role, LegacyRole::ClinicUser);
    }

    #[test]
    fn test_provider_replay_reports_already_migrated() {
        let user = user_with(LegacyRole::ClinicUser, false);
        let step = plan_provider_migration(&user).unwrap();
        assert_eq!(step, MigrationStep::AlreadyMigrated);
        assert!(report_for(&user, step).message.contains("already migrated"));
    }

    #[test]
    fn test_admin_migration_rejects_provider() {
        let user = user_with(LegacyRole::Provider, false);
        let err = plan_admin_migration(&user).unwrap_err();
        assert!(err.to_string().contains("is not an admin"));
    }

    #[test]
    fn test_provider_migration_rejects_admin() {
        let user = user_with(LegacyRole::Admin, false);
        let err = plan_provider_migration(&user).unwrap_err();
        assert!(err.to_string().contains("is not a provider"));
    }

    #[test]
    fn test_replay_direction_must_match_ownership() {
        // A migrated provider is not an admin...
        let staff = user_with(LegacyRole::ClinicUser, false);
        let err = plan_admin_migration(&staff).unwrap_err();
        assert!(err.to_string().contains("is not an admin"));

        // ...and a migrated admin is not a provider.
        let owner = user_with(LegacyRole::ClinicUser, true);
        let err = plan_provider_migration(&owner).unwrap_err();
        assert!(err.to_string().contains("is not a provider"));
    }

    #[test]
    fn test_unsupported_roles_are_rejected() {
        for role in [LegacyRole::Superadmin, LegacyRole::Patient] {
            assert!(plan_admin_migration(&user_with(role, false)).is_err());
            assert!(plan_provider_migration(&user_with(role, false)).is_err());
        }
    }
}
