//! Roster REST API
//!
//! This crate provides the Axum-based HTTP API for Roster: sign-up, login,
//! profile and the user directory, plus health and metrics endpoints.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
