/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     username VARCHAR(20) NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     created_at TEXT NOT NULL
/// );
/// ```
///
/// The `password_hash` column is not part of [`User`]. It is
/// only written by [`User::create`] and only read back inside this crate by
/// the credential store, as an opaque [`HashedPassword`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Connection, SqliteConnection};
use tracing::info;

use super::{item::Item, todo_list::TodoList};
use crate::auth::password::HashedPassword;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Unique login name
    pub username: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,

    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: HashedPassword,
}

/// A user row together with its stored hash, for verification only
#[derive(sqlx::FromRow)]
pub(crate) struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: HashedPassword,
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a database error if the username is already taken (unique
    /// constraint violation) or the connection fails.
    pub async fn create(conn: &mut SqliteConnection, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            RETURNING id, username, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .fetch_one(&mut *conn)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    /// Finds a user by exact username
    pub async fn find_by_username(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    pub(crate) async fn find_credentials(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT id, username, created_at, password_hash
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }

    /// Deletes a user and everything it owns
    ///
    /// Removes the user's items, then its todo lists, then the user row, in
    /// one transaction (a savepoint when `conn` is already inside one).
    ///
    /// # Returns
    ///
    /// True if the user existed and was deleted
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = conn.begin().await?;

        let items = Item::delete_by_user(&mut *tx, id).await?;
        let lists = TodoList::delete_by_user(&mut *tx, id).await?;
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(user_id = id, lists, items, "Deleted user and owned records");
        }
        Ok(deleted)
    }

    pub async fn count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }
}
