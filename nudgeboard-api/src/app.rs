/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                          # Service index (public)
/// ├── GET  /health                    # Health check (public)
/// └── /api/
///     ├── POST /register              # Public
///     ├── POST /login                 # Public
///     ├── GET  /users                 # Authenticated from here down
///     ├── GET  /users/:id
///     ├── GET|POST /tasks
///     ├── GET|PUT|DELETE /tasks/:id
///     ├── PUT  /tasks/:id/complete
///     ├── POST /tasks/:id/nudge
///     ├── GET  /notifications
///     └── PUT  /notifications/:id/read
/// ```
///
/// # Middleware Stack
///
/// 1. Request tracing (tower-http TraceLayer)
/// 2. CORS (permissive, the clients are first-party mobile apps)
/// 3. Bearer-token authentication on the protected `/api` routes

use crate::config::Config;
use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; the pool
/// and config are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public probes
    let probe_routes = Router::new()
        .route("/", get(routes::health::index))
        .route("/health", get(routes::health::health_check));

    // Auth routes (public, no token required)
    let public_api = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything else requires a bearer token
    let protected_api = Router::new()
        .route("/users", get(routes::users::list_users))
        .route("/users/:id", get(routes::users::get_user))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/complete", put(routes::tasks::complete_task))
        .route("/tasks/:id/nudge", post(routes::tasks::nudge_task))
        .route("/notifications", get(routes::notifications::list_notifications))
        .route("/notifications/:id/read", put(routes::notifications::mark_read))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::require_auth,
        ));

    Router::new()
        .merge(probe_routes)
        .nest("/api", public_api.merge(protected_api))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
