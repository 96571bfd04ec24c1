//! Roster Authentication and Authorization
//!
//! This crate provides password hashing, JWT issuance and validation, and
//! the axum middleware stages that guard Roster's routes: token
//! verification, role checks and loading of the current user.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, JwtManager, TOKEN_TTL_HOURS};
pub use middleware::{CurrentUser, attach_current_user, require_admin, require_role, verify_token};
pub use password::{DEFAULT_HASH_COST, hash_password, verify_password};
