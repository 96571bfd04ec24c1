//! User directory routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use roster_auth::{attach_current_user, require_role, verify_token};
use roster_db::{NewUser, UpdateUser, User, UserRole};
use tower::ServiceBuilder;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

use super::types::{CreateUserRequest, UpdateUserRequest, UserDetailResponse};
use super::validation::validate_email;

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// POST /create-user
///
/// Public, and stores `passwordHash` without hashing it. Accounts created
/// here can only log in if the caller supplied a valid Argon2 PHC string.
async fn create_user(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    validate_email(&request.email)?;

    warn!("Creating user {} with a caller-supplied password hash", request.email);

    let user = state
        .db
        .insert_user(NewUser {
            email: request.email,
            password_hash: request.password_hash,
            role: request.role,
        })
        .await?;

    info!("Created user: {} ({})", user.email, user.role.as_str());
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /all-users (Admin only)
async fn list_all_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.db.list_users().await?;
    Ok(Json(users))
}

/// GET /oneUser/{id}
async fn get_one_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    let user = state.db.get_user_by_id(&id).await?.ok_or_else(user_not_found)?;
    let tasks = state.db.list_tasks_by_user(&user.id).await?;

    Ok(Json(UserDetailResponse::new(user, tasks)))
}

/// DELETE /delete/{id}
///
/// Removes the user, then every task it owns, and answers with the users
/// that remain. The two deletes are not atomic.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, ApiError> {
    debug!("Deleting user: {}", id);

    if !state.db.delete_user(&id).await? {
        return Err(user_not_found());
    }

    let removed_tasks = state.db.delete_tasks_by_user(&id).await?;
    metrics::counter!("roster_users_deleted_total").increment(1);
    info!("Deleted user {} and {} owned tasks", id, removed_tasks);

    let users = state.db.list_users().await?;
    Ok(Json(users))
}

/// PUT /edit/{id}
///
/// Like create-user, a supplied `passwordHash` replaces the stored hash
/// without hashing.
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    debug!("Updating user: {}", id);

    if let Some(email) = &request.email {
        validate_email(email)?;
    }
    if request.password_hash.is_some() {
        warn!("Replacing password hash of user {} with a caller-supplied value", id);
    }

    let user = state
        .db
        .update_user(
            &id,
            UpdateUser {
                email: request.email,
                password_hash: request.password_hash,
                role: request.role,
            },
        )
        .await?
        .ok_or_else(user_not_found)?;

    info!("Updated user: {}", user.email);
    Ok(Json(user))
}

/// Create user directory routes
pub fn routes(state: &AppState) -> Router<AppState> {
    let admin_only = ServiceBuilder::new()
        .layer(from_fn_with_state(state.jwt.clone(), verify_token))
        .layer(from_fn_with_state(UserRole::Admin, require_role))
        .layer(from_fn_with_state(state.db.clone(), attach_current_user));

    Router::new()
        .route("/all-users", get(list_all_users))
        .route_layer(admin_only)
        .route("/create-user", post(create_user))
        .route("/oneUser/{id}", get(get_one_user))
        .route("/delete/{id}", delete(delete_user))
        .route("/edit/{id}", put(update_user))
}
