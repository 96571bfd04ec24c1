//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Malformed token")]
    MalformedToken,

    #[error("User not authorized for this route")]
    InsufficientRole,

    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token signing error: {0}")]
    TokenIssue(#[source] jsonwebtoken::errors::Error),

    #[error("Database error: {0}")]
    Database(#[from] roster_db::DbError),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::MalformedToken
            | AuthError::InsufficientRole => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::BAD_REQUEST,
            AuthError::PasswordHash(_) | AuthError::TokenIssue(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Authentication failure: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = axum::Json(json!({
            "msg": message
        }));

        (status, body).into_response()
    }
}
