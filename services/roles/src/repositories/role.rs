//! Custom role repository for database operations

use anyhow::Result;
use permissions::{PermissionTree, validate_permission_tree};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{CustomRole, LegacyRole, NewCustomRole, UpdateCustomRole};
use crate::validation::{validate_role_description, validate_role_name};

const ROLE_COLUMNS: &str =
    "id, tenant_id, name, description, permissions, is_template, created_at, updated_at";

/// Decode one row, re-validating the stored permission document
///
/// Documents are accepted from persistence as loosely typed input; any
/// structural problem is logged and the tolerant decode denies the
/// affected nodes instead of failing the load.
fn role_from_row(row: &PgRow) -> CustomRole {
    let raw: serde_json::Value = row.get("permissions");
    let report = validate_permission_tree(&raw);
    for error in &report.errors {
        warn!("stored permission document problem: {}", error);
    }
    for warning in &report.warnings {
        debug!("stored permission document note: {}", warning);
    }

    CustomRole {
        id: row.get("id"),
        tenant_id: row.get("tenant_id"),
        name: row.get("name"),
        description: row.get("description"),
        permissions: PermissionTree::from_value(&raw),
        is_template: row.get("is_template"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Custom role repository
#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a custom role
    pub async fn create_custom_role(&self, new_role: &NewCustomRole) -> Result<CustomRole> {
        info!(
            "Creating custom role '{}' for tenant {}",
            new_role.name, new_role.tenant_id
        );

        validate_role_name(&new_role.name).map_err(|e| anyhow::anyhow!(e))?;
        validate_role_description(new_role.description.as_deref())
            .map_err(|e| anyhow::anyhow!(e))?;

        let permissions = serde_json::to_value(&new_role.permissions)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO custom_roles (tenant_id, name, description, permissions, is_template)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ROLE_COLUMNS}
            "#,
        ))
        .bind(new_role.tenant_id)
        .bind(new_role.name.trim())
        .bind(&new_role.description)
        .bind(&permissions)
        .bind(new_role.is_template)
        .fetch_one(&self.pool)
        .await?;

        Ok(role_from_row(&row))
    }

    /// Get a custom role by ID
    pub async fn get_custom_role(&self, id: Uuid) -> Result<Option<CustomRole>> {
        info!("Finding custom role by ID: {}", id);

        let row = sqlx::query(&format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM custom_roles
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(role_from_row))
    }

    /// Find a custom role by name within a tenant
    pub async fn find_by_name(&self, tenant_id: Uuid, name: &str) -> Result<Option<CustomRole>> {
        info!("Finding custom role '{}' for tenant {}", name, tenant_id);

        let row = sqlx::query(&format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM custom_roles
            WHERE tenant_id = $1 AND name = $2
            "#,
        ))
        .bind(tenant_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(role_from_row))
    }

    /// List template roles for a tenant
    pub async fn get_template_roles(&self, tenant_id: Uuid) -> Result<Vec<CustomRole>> {
        info!("Listing template roles for tenant {}", tenant_id);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM custom_roles
            WHERE tenant_id = $1 AND is_template = TRUE
            ORDER BY name
            "#,
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(role_from_row).collect())
    }

    /// Update a custom role
    ///
    /// Absent fields keep their current values. Returns `None` when the
    /// role does not exist.
    pub async fn update_custom_role(
        &self,
        id: Uuid,
        update: &UpdateCustomRole,
    ) -> Result<Option<CustomRole>> {
        info!("Updating custom role: {}", id);

        if let Some(name) = &update.name {
            validate_role_name(name).map_err(|e| anyhow::anyhow!(e))?;
        }
        validate_role_description(update.description.as_deref())
            .map_err(|e| anyhow::anyhow!(e))?;

        let permissions = update
            .permissions
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE custom_roles
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                permissions = COALESCE($4, permissions),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ROLE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(&permissions)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(role_from_row))
    }

    /// Assign a custom role to a user
    ///
    /// Assignment always leaves the user's flat role at `clinic_user`;
    /// from then on, access is decided by the custom role's tree.
    pub async fn assign_custom_role_to_user(&self, user_id: Uuid, role_id: Uuid) -> Result<()> {
        info!("Assigning custom role {} to user {}", role_id, user_id);

        let role = self
            .get_custom_role(role_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("custom role {} not found", role_id))?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET custom_role_id = $2, role = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(role.id)
        .bind(LegacyRole::ClinicUser.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("user {} not found", user_id);
        }

        Ok(())
    }
}
