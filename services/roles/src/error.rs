//! Custom error types for the roles service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::migration::MigrationError;

/// Custom error type for the roles service
#[derive(Error, Debug)]
pub enum RolesError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Legacy role migration failure
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// Internal server error
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for RolesError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            RolesError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            RolesError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            RolesError::Migration(err) => {
                let status = match &err {
                    MigrationError::UserNotFound(_) => StatusCode::NOT_FOUND,
                    MigrationError::NotAnAdmin(_) | MigrationError::NotAProvider(_) => {
                        StatusCode::CONFLICT
                    }
                    MigrationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            RolesError::Internal(err) => {
                error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for roles service results
pub type RolesResult<T> = Result<T, RolesError>;
