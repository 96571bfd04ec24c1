//! Shared helpers for API integration tests
//!
//! Every test gets its own in-memory database and a router built exactly as
//! the server builds it, driven with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use roster_api::{AppState, create_router};
use roster_auth::{JwtManager, hash_password};
use roster_db::{Database, NewUser, User, UserRole};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";
/// Lowest Argon2 time cost, keeps the suite fast
pub const TEST_HASH_COST: u32 = 1;

/// Test context containing the router and its backing store
pub struct TestContext {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub app: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = Database::in_memory().await.expect("in-memory database");
        let jwt = Arc::new(JwtManager::new(TEST_SECRET));
        let state = AppState::new(db.clone(), jwt.clone(), TEST_HASH_COST);
        let app = create_router(state, None);
        Self { db, jwt, app }
    }

    /// Send a request, returning status and parsed JSON body (`Null` if empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };
        (status, json)
    }

    /// Insert a user with a properly hashed password
    pub async fn seed_user(&self, email: &str, password: &str, role: UserRole) -> User {
        self.db
            .insert_user(NewUser {
                email: email.to_string(),
                password_hash: hash_password(password, TEST_HASH_COST).unwrap(),
                role,
            })
            .await
            .unwrap()
    }

    /// Token for a stored user, as login would issue it
    pub fn token_for(&self, user: &User) -> String {
        self.jwt
            .generate_token(&user.id, &user.email, user.role)
            .unwrap()
    }
}
