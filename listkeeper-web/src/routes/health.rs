/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "migrations": {
///     "applied_migrations": 1,
///     "latest_version": 20240601000000,
///     "is_up_to_date": true
///   },
///   "pool": {
///     "active_connections": 1,
///     "idle_connections": 0,
///     "total_connections": 1
///   }
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use listkeeper_shared::db::{
    migrations::{self, MigrationStatus},
    pool::{self, PoolStats},
};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Applied schema migrations, absent when the database cannot be read
    pub migrations: Option<MigrationStatus>,

    /// Connection pool usage
    pub pool: PoolStats,
}

/// Health check handler
///
/// A failing database or a schema behind the embedded migrations turns the
/// status to "degraded" but still answers 200.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database_status = match pool::health_check(&state.db).await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "disconnected"
        }
    };

    let migrations = match migrations::get_migration_status(&state.db).await {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read migration status");
            None
        }
    };

    let healthy = database_status == "connected"
        && migrations.as_ref().is_some_and(|status| status.is_up_to_date);

    Ok(Json(HealthResponse {
        status: if healthy {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_status.to_string(),
        migrations,
        pool: pool::get_pool_stats(&state.db),
    }))
}
