//! Schema bootstrap for the roles service
//!
//! The service owns its tables and creates them idempotently at startup,
//! so a fresh environment needs nothing beyond a reachable database.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

/// Create the service tables and indexes if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    info!("Ensuring roles service schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tenant_id UUID NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            role TEXT NOT NULL,
            is_owner BOOLEAN NOT NULL DEFAULT FALSE,
            custom_role_id UUID,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS custom_roles (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tenant_id UUID NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            permissions JSONB NOT NULL,
            is_template BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (tenant_id, name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_users_tenant_role ON users (tenant_id, role)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_custom_roles_tenant ON custom_roles (tenant_id, is_template)",
    )
    .execute(pool)
    .await?;

    info!("Roles service schema ready");
    Ok(())
}
