//! Application state

use metrics_exporter_prometheus::PrometheusHandle;
use roster_auth::JwtManager;
use roster_db::Database;
use std::sync::Arc;

/// Handle used to render the Prometheus exposition
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    /// Work factor passed to the password hasher
    pub hash_cost: u32,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>, hash_cost: u32) -> Self {
        Self { db, jwt, hash_cost }
    }
}
