//! Request/Response DTOs

use chrono::{DateTime, Utc};
use roster_db::{Task, User, UserRole};
use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Sign-up request
#[derive(Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

// ==================== User Types ====================

/// Create user request
///
/// `passwordHash` is stored exactly as given.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Update user request
///
/// Keys that are not user fields are ignored. `passwordHash`, like on
/// create, is stored exactly as given.
#[derive(Deserialize, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "passwordHash")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// User with its tasks populated
#[derive(Serialize)]
pub struct UserDetailResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserDetailResponse {
    pub fn new(user: User, tasks: Vec<Task>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            tasks,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
