//! Roster Database Layer
//!
//! This crate provides the storage collaborator for Roster: users and the
//! tasks they own, persisted in SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
