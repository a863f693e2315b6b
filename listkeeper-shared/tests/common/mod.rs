#![allow(dead_code)]
/// Shared setup for the model and credential tests

use listkeeper_shared::auth::password::HashedPassword;
use listkeeper_shared::db::migrations::{ensure_database_exists, run_migrations};
use listkeeper_shared::db::pool::{create_pool, DatabaseConfig};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A migrated database in a temporary directory
///
/// The directory (and the database file) is removed when this is dropped.
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("test.sqlite3").display());

        ensure_database_exists(&url).await.expect("Failed to create database file");
        let pool = create_pool(DatabaseConfig {
            url,
            ..Default::default()
        })
        .await
        .expect("Failed to create pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        Self { pool, _dir: dir }
    }
}

pub fn hashed(password: &str) -> HashedPassword {
    HashedPassword::new(password).expect("Failed to hash password")
}
