//! Authentication middleware for Axum
//!
//! Each stage either forwards the request with more context in its
//! extensions or short-circuits with an `AuthError` response:
//!
//! 1. [`verify_token`] validates the bearer token and inserts [`Claims`].
//! 2. [`require_role`] (optional) rejects claims without the required role.
//! 3. [`attach_current_user`] loads the user named by the claims and inserts
//!    [`CurrentUser`].
//!
//! Mount them with `axum::middleware::from_fn_with_state`, in that order.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use roster_db::{Database, User, UserRole};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::jwt::{Claims, JwtManager};

/// The stored user behind the request's token
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extract bearer token from authorization header
fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Token verification stage
pub async fn verify_token(
    State(jwt_manager): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = extract_bearer_token(header)?;
    let claims = jwt_manager.validate_token(token).inspect_err(|e| {
        warn!("Rejected token: {}", e);
    })?;

    debug!("Authenticated user: {} ({})", claims.email, claims.role.as_str());

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Role gate: the verified claims must carry exactly `required`
pub async fn require_role(
    State(required): State<UserRole>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or(AuthError::MissingAuthHeader)?;

    if claims.role != required {
        warn!(
            "User {} with role {} denied, {} required",
            claims.email,
            claims.role.as_str(),
            required.as_str()
        );
        return Err(AuthError::InsufficientRole);
    }

    Ok(next.run(request).await)
}

/// Middleware to require admin role
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AuthError> {
    require_role(State(UserRole::Admin), request, next).await
}

/// Current-user loading stage
pub async fn attach_current_user(
    State(db): State<Database>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user_id = request
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.id.clone())
        .ok_or(AuthError::MissingAuthHeader)?;

    let user = db
        .get_user_by_id(&user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
