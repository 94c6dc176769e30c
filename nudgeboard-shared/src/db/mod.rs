/// Database layer for Nudgeboard
///
/// This module provides connection pooling and migrations for the embedded
/// SQLite store. Models live in the `models` module at crate root level.
///
/// # Example
///
/// ```no_run
/// use nudgeboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use nudgeboard_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: "sqlite://nudgeboard.db".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
