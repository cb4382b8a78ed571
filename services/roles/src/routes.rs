//! Roles service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use permissions::{PermissionPath, PermissionTree, validate_permission_tree};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    AppState,
    error::{RolesError, RolesResult},
    models::{LegacyRole, NewCustomRole, NewUser, UpdateCustomRole, User},
};

/// Request for creating a custom role
#[derive(Deserialize)]
pub struct CreateRoleRequest {
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Raw permission document; validated before persistence
    pub permissions: serde_json::Value,
    #[serde(default)]
    pub is_template: bool,
}

/// Query for template role listings
#[derive(Deserialize)]
pub struct TemplateRolesQuery {
    pub tenant_id: Uuid,
}

/// Query for user listings, optionally scoped to one tenant
#[derive(Deserialize)]
pub struct UsersQuery {
    pub tenant_id: Option<Uuid>,
}

/// Request for setting a single permission on a role
#[derive(Deserialize)]
pub struct SetPermissionRequest {
    /// Path in marker form, e.g. `["billing", "features", "claims"]`
    pub path: Vec<String>,
    pub value: bool,
}

/// Request for assigning a custom role to a user
#[derive(Deserialize)]
pub struct AssignRoleRequest {
    pub custom_role_id: Uuid,
}

/// User representation returned by the service
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: LegacyRole,
    pub is_owner: bool,
    pub custom_role_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            is_owner: user.is_owner,
            custom_role_id: user.custom_role_id,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Create the router for the roles service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/roles", post(create_role))
        .route("/roles/templates", get(list_template_roles))
        .route("/roles/:id", get(get_role).patch(update_role))
        .route("/roles/:id/permissions", put(set_role_permission))
        .route("/roles/:id/summary", get(role_summary))
        .route("/users", post(create_user))
        .route("/users/admins", get(list_admin_users))
        .route("/users/providers", get(list_provider_users))
        .route("/users/:id/assign-role", post(assign_role))
        .route("/users/:id/migrate-admin", post(migrate_admin))
        .route("/users/:id/migrate-provider", post(migrate_provider))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "roles-service"
    }))
}

/// Create a custom role
pub async fn create_role(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> RolesResult<impl IntoResponse> {
    info!("Create role request: {}", payload.name);

    let report = validate_permission_tree(&payload.permissions);
    if !report.is_valid {
        return Err(RolesError::BadRequest(format!(
            "invalid permission document: {}",
            report.errors.join("; ")
        )));
    }
    for warning in &report.warnings {
        warn!("permission document warning: {}", warning);
    }

    let new_role = NewCustomRole {
        tenant_id: payload.tenant_id,
        name: payload.name,
        description: payload.description,
        permissions: PermissionTree::from_value(&payload.permissions),
        is_template: payload.is_template,
    };
    let role = state.role_repository.create_custom_role(&new_role).await?;

    Ok((StatusCode::CREATED, Json(role)))
}

/// Get a custom role by ID
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> RolesResult<impl IntoResponse> {
    let role = state
        .role_repository
        .get_custom_role(id)
        .await?
        .ok_or_else(|| RolesError::NotFound(format!("custom role {} not found", id)))?;

    Ok(Json(role))
}

/// Update a custom role
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomRole>,
) -> RolesResult<impl IntoResponse> {
    let role = state
        .role_repository
        .update_custom_role(id, &payload)
        .await?
        .ok_or_else(|| RolesError::NotFound(format!("custom role {} not found", id)))?;

    Ok(Json(role))
}

/// List template roles for a tenant
pub async fn list_template_roles(
    State(state): State<AppState>,
    Query(query): Query<TemplateRolesQuery>,
) -> RolesResult<impl IntoResponse> {
    let roles = state
        .role_repository
        .get_template_roles(query.tenant_id)
        .await?;

    Ok(Json(roles))
}

/// Set a single permission on a role
pub async fn set_role_permission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPermissionRequest>,
) -> RolesResult<impl IntoResponse> {
    let Some(path) = PermissionPath::parse(&payload.path) else {
        return Err(RolesError::BadRequest(format!(
            "invalid permission path: {:?}",
            payload.path
        )));
    };

    let role = state
        .role_repository
        .get_custom_role(id)
        .await?
        .ok_or_else(|| RolesError::NotFound(format!("custom role {} not found", id)))?;

    let update = UpdateCustomRole {
        permissions: Some(role.permissions.set_value(&path, payload.value)),
        ..Default::default()
    };
    let role = state
        .role_repository
        .update_custom_role(id, &update)
        .await?
        .ok_or_else(|| RolesError::NotFound(format!("custom role {} not found", id)))?;

    Ok(Json(role))
}

/// Summarize what a role grants
pub async fn role_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> RolesResult<impl IntoResponse> {
    let role = state
        .role_repository
        .get_custom_role(id)
        .await?
        .ok_or_else(|| RolesError::NotFound(format!("custom role {} not found", id)))?;

    Ok(Json(role.permissions.summarize()))
}

/// Create a user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> RolesResult<impl IntoResponse> {
    let user = state.user_repository.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List active legacy admin users
pub async fn list_admin_users(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> RolesResult<impl IntoResponse> {
    let users = state.user_repository.get_admin_users(query.tenant_id).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(users))
}

/// List active legacy provider users
pub async fn list_provider_users(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> RolesResult<impl IntoResponse> {
    let users = state
        .user_repository
        .get_provider_users(query.tenant_id)
        .await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(users))
}

/// Assign a custom role to a user
pub async fn assign_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRoleRequest>,
) -> RolesResult<impl IntoResponse> {
    state
        .role_repository
        .assign_custom_role_to_user(id, payload.custom_role_id)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "role assigned",
        "user_id": id,
        "custom_role_id": payload.custom_role_id,
    })))
}

/// Migrate a legacy admin user
pub async fn migrate_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> RolesResult<impl IntoResponse> {
    let report = state.user_repository.migrate_admin_user(id).await?;
    Ok(Json(report))
}

/// Migrate a legacy provider user
pub async fn migrate_provider(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> RolesResult<impl IntoResponse> {
    let report = state.user_repository.migrate_provider_user(id).await?;
    Ok(Json(report))
}
