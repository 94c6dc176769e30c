//! # Nudgeboard API Server
//!
//! The backend for the Nudgeboard task-assignment app: users create tasks,
//! assign workers, mark completion, and nudge assignees. A periodic
//! background sweep reminds workers of approaching deadlines.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p nudgeboard-api
//! ```

use nudgeboard_api::{app, config::Config};
use nudgeboard_shared::db::{migrations, pool};
use nudgeboard_shared::notify::deadline;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nudgeboard_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Nudgeboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database pool and run migrations
    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
    })
    .await?;
    migrations::run_migrations(&db).await?;

    // Spawn the deadline sweep
    let sweep_pool = db.clone();
    let sweep_interval = Duration::from_secs(config.sweep.interval_seconds);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let today = chrono::Utc::now().date_naive();
            if let Err(e) = deadline::run_sweep(&sweep_pool, today).await {
                tracing::error!(error = %e, "Deadline sweep failed");
            }
        }
    });

    // Build and serve the application
    let bind_address = config.bind_address();
    let state = app::AppState::new(db, config);
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
