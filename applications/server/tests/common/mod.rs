//! Common test utilities and fixtures

#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use ballotbox_core::{LedgerStore, User, VotingLedger};
use ballotbox_server::{create_router, services::NewAccount, AppState, AuthService};
use ballotbox_storage::SqliteLedgerStore;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Application over a throwaway SQLite file, removed on drop
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

/// Create a file-backed test database with migrations applied
pub async fn create_test_store() -> Result<(Arc<dyn LedgerStore>, TempDir)> {
    let temp_dir = tempfile::tempdir()?;
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let pool = ballotbox_storage::create_pool(&db_url).await?;
    ballotbox_storage::run_migrations(&pool).await?;

    let store: Arc<dyn LedgerStore> = Arc::new(SqliteLedgerStore::new(pool));
    Ok((store, temp_dir))
}

/// Auth service with the cheapest bcrypt cost
pub fn create_test_auth_service() -> AuthService {
    AuthService::new("test-secret-key".to_string(), 1, 1).with_bcrypt_cost(4) // bcrypt minimum cost
}

impl TestApp {
    pub async fn new() -> Self {
        let (store, temp_dir) = create_test_store().await.expect("test database");
        let ledger = Arc::new(VotingLedger::new(store));
        let state = AppState::new(ledger, Arc::new(create_test_auth_service()));

        Self {
            router: create_router(state.clone()),
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Create an account directly, bypassing HTTP
    pub async fn create_user(&self, login: &str, password: &str, is_admin: bool) -> User {
        self.state
            .auth_service
            .create_account(
                self.state.store(),
                NewAccount {
                    login: login.to_string(),
                    email: format!("{}@test.com", login),
                    password: password.to_string(),
                    is_admin,
                },
            )
            .await
            .expect("Failed to create test user")
    }

    /// Access token for `user`
    pub fn token_for(&self, user: &User) -> String {
        self.state
            .auth_service
            .create_access_token(user)
            .expect("Failed to create token")
    }

    /// Send a request and decode the JSON response body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }
}

/// Test user credentials
pub mod fixtures {
    pub const TEST_LOGIN: &str = "testuser";
    pub const TEST_PASSWORD: &str = "TestPassword123!";

    pub const ADMIN_LOGIN: &str = "admin";
    pub const ADMIN_PASSWORD: &str = "AdminPassword456!";
}
