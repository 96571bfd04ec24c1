//! Sign-up, login and profile routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::post,
};
use roster_auth::{CurrentUser, attach_current_user, hash_password, verify_password, verify_token};
use roster_db::{NewUser, User, UserRole};
use tower::ServiceBuilder;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse, SignUpRequest};
use super::validation::{validate_email, validate_password};

/// POST /sign-up
async fn sign_up(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignUpRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    validate_password(&request.password)?;
    validate_email(&request.email)?;

    debug!("Signing up user: {}", request.email);

    let password_hash = hash_password(&request.password, state.hash_cost)?;

    let user = state
        .db
        .insert_user(NewUser {
            email: request.email,
            password_hash,
            role: UserRole::User,
        })
        .await?;

    metrics::counter!("roster_signups_total").increment(1);
    info!("Signed up user: {}", user.email);

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    debug!("Login attempt for user: {}", request.email);

    let Some(user) = state.db.get_user_by_email(&request.email).await? else {
        metrics::counter!("roster_logins_total", "outcome" => "unknown_user").increment(1);
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    // A stored value that is not a PHC string (see create-user) cannot match
    let matches = verify_password(&request.password, &user.password_hash)
        .unwrap_or_else(|e| {
            warn!("Unusable password hash for user {}: {}", user.email, e);
            false
        });

    if !matches {
        metrics::counter!("roster_logins_total", "outcome" => "rejected").increment(1);
        warn!("Wrong password for user: {}", user.email);
        return Err(ApiError::Unauthorized("Wrong email or password".to_string()));
    }

    let token = state.jwt.generate_token(&user.id, &user.email, user.role)?;

    metrics::counter!("roster_logins_total", "outcome" => "success").increment(1);
    info!("User {} logged in successfully", user.email);

    Ok(Json(LoginResponse { user, token }))
}

/// POST /profile
async fn profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

/// Create sign-up, login and profile routes
pub fn routes(state: &AppState) -> Router<AppState> {
    let authenticated = ServiceBuilder::new()
        .layer(from_fn_with_state(state.jwt.clone(), verify_token))
        .layer(from_fn_with_state(state.db.clone(), attach_current_user));

    Router::new()
        .route("/profile", post(profile))
        .route_layer(authenticated)
        .route("/sign-up", post(sign_up))
        .route("/login", post(login))
}
