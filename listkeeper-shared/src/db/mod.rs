/// Database layer for Listkeeper
///
/// This module provides SQLite connection pooling and migrations.
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `migrations`: Embedded migration runner
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use listkeeper_shared::db::migrations::{ensure_database_exists, run_migrations};
/// use listkeeper_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let url = "sqlite://db.sqlite3";
///     ensure_database_exists(url).await?;
///
///     let pool = create_pool(DatabaseConfig {
///         url: url.to_string(),
///         ..Default::default()
///     })
///     .await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
