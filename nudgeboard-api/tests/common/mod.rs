/// Common test utilities for integration tests
///
/// Provides a TestContext that wires the full router to an in-memory
/// SQLite database, plus helpers for creating users, minting tokens, and
/// driving requests through the router with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use nudgeboard_api::app::{build_router, AppState};
use nudgeboard_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, SweepConfig};
use nudgeboard_shared::auth::jwt::{create_token, Claims};
use nudgeboard_shared::auth::password::hash_password;
use nudgeboard_shared::db::migrations::run_migrations;
use nudgeboard_shared::db::pool::{create_pool, DatabaseConfig as PoolConfig};
use nudgeboard_shared::models::user::{CreateUser, User};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing the router and its database
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a context with a fresh in-memory database
    pub async fn new() -> Self {
        let db = create_pool(PoolConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .expect("in-memory pool should connect");

        run_migrations(&db).await.expect("migrations should run");

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
            },
            sweep: SweepConfig {
                interval_seconds: 3600,
            },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Self { db, app }
    }

    /// Creates a user directly in the database and returns it with a
    /// valid bearer token
    pub async fn create_user(&self, name: &str, phone: &str, password: &str) -> (User, String) {
        let user = User::create(
            &self.db,
            CreateUser {
                name: name.to_string(),
                phone: phone.to_string(),
                birthdate: chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                password_hash: hash_password(password).expect("hash should succeed"),
                is_admin: false,
            },
        )
        .await
        .expect("user creation should succeed");

        let claims = Claims::new(user.id, &user.phone, user.is_admin);
        let token = create_token(&claims, TEST_SECRET).expect("token creation should succeed");

        (user, token)
    }

    /// Sends a request through the router and returns status + JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("request should build"),
            None => builder.body(Body::empty()).expect("request should build"),
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request should complete");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");

        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };

        (status, json)
    }
}
