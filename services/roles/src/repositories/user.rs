//! User repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::migration::{
    MigrationError, MigrationReport, MigrationStep, plan_admin_migration, plan_provider_migration,
    report_for,
};
use crate::models::{LegacyRole, NewUser, User};
use crate::validation::{validate_email, validate_password};

const USER_COLUMNS: &str = "id, tenant_id, email, password_hash, first_name, last_name, role, \
     is_owner, custom_role_id, is_active, created_at, updated_at";

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    let role: String = row.get("role");
    let role = role
        .parse::<LegacyRole>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?;

    Ok(User {
        id: row.get("id"),
        tenant_id: row.get("tenant_id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        role,
        is_owner: row.get("is_owner"),
        custom_role_id: row.get("custom_role_id"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        info!("Creating new user: {}", new_user.email);

        validate_email(&new_user.email).map_err(|e| anyhow::anyhow!(e))?;
        validate_password(&new_user.password).map_err(|e| anyhow::anyhow!(e))?;

        // Hash the password
        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (tenant_id, email, password_hash, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(new_user.tenant_id)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(new_user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row)?)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        info!("Finding user by ID: {}", id);

        let row = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// List active users holding the legacy `admin` role, optionally
    /// scoped to one tenant
    pub async fn get_admin_users(&self, tenant_id: Option<Uuid>) -> Result<Vec<User>> {
        self.active_users_with_role(LegacyRole::Admin, tenant_id)
            .await
    }

    /// List active users holding the legacy `provider` role, optionally
    /// scoped to one tenant
    pub async fn get_provider_users(&self, tenant_id: Option<Uuid>) -> Result<Vec<User>> {
        self.active_users_with_role(LegacyRole::Provider, tenant_id)
            .await
    }

    async fn active_users_with_role(
        &self,
        role: LegacyRole,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<User>> {
        info!("Listing active {} users (tenant: {:?})", role, tenant_id);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE role = $1
              AND is_active = TRUE
              AND ($2::uuid IS NULL OR tenant_id = $2)
            ORDER BY created_at
            "#,
        ))
        .bind(role.as_str())
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        let users = rows
            .iter()
            .map(user_from_row)
            .collect::<Result<Vec<User>, sqlx::Error>>()?;

        Ok(users)
    }

    /// Migrate a legacy admin to an owning clinic user
    ///
    /// Replaying the call against an already-migrated owner succeeds
    /// without touching the record.
    pub async fn migrate_admin_user(
        &self,
        user_id: Uuid,
    ) -> Result<MigrationReport, MigrationError> {
        info!("Migrating legacy admin user: {}", user_id);
        self.run_migration(user_id, plan_admin_migration).await
    }

    /// Migrate a legacy provider to a non-owning clinic user
    pub async fn migrate_provider_user(
        &self,
        user_id: Uuid,
    ) -> Result<MigrationReport, MigrationError> {
        info!("Migrating legacy provider user: {}", user_id);
        self.run_migration(user_id, plan_provider_migration).await
    }

    async fn run_migration(
        &self,
        user_id: Uuid,
        plan: fn(&User) -> Result<MigrationStep, MigrationError>,
    ) -> Result<MigrationReport, MigrationError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let user = match row {
            Some(row) => user_from_row(&row)?,
            None => return Err(MigrationError::UserNotFound(user_id)),
        };

        let step = plan(&user)?;
        if let MigrationStep::Apply { is_owner } = step {
            sqlx::query(
                r#"
                UPDATE users
                SET role = $2, is_owner = $3, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .bind(LegacyRole::ClinicUser.as_str())
            .bind(is_owner)
            .execute(&self.pool)
            .await?;
        }

        let report = report_for(&user, step);
        info!("{}", report.message);
        Ok(report)
    }
}
