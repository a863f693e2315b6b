/// Todo list model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todolists (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name VARCHAR(200) NOT NULL,
///     user_id INTEGER NOT NULL REFERENCES users(id),
///     created_at TEXT NOT NULL
/// );
/// ```
///
/// Lookups that serve a request go through [`TodoList::find_owned`], which
/// only returns a list reachable from the given user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Connection, SqliteConnection};

use super::item::Item;

/// A named todo list owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TodoList {
    pub id: i64,
    pub name: String,

    /// Owning user
    pub user_id: i64,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new todo list
#[derive(Debug, Clone)]
pub struct CreateTodoList {
    pub name: String,
    pub user_id: i64,
}

impl TodoList {
    /// Creates a list owned by `data.user_id`
    ///
    /// # Errors
    ///
    /// Fails with a foreign key violation if the user does not exist.
    pub async fn create(conn: &mut SqliteConnection, data: CreateTodoList) -> Result<Self, sqlx::Error> {
        let list = sqlx::query_as::<_, TodoList>(
            r#"
            INSERT INTO todolists (name, user_id)
            VALUES (?, ?)
            RETURNING id, name, user_id, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(list)
    }

    /// Finds a list by ID, but only if `user_id` owns it
    ///
    /// Returns `None` both when the list does not exist and when it belongs to
    /// someone else.
    pub async fn find_owned(
        conn: &mut SqliteConnection,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let list = sqlx::query_as::<_, TodoList>(
            r#"
            SELECT id, name, user_id, created_at
            FROM todolists
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(list)
    }

    /// Lists a user's todo lists in creation order
    pub async fn list_by_user(conn: &mut SqliteConnection, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let lists = sqlx::query_as::<_, TodoList>(
            r#"
            SELECT id, name, user_id, created_at
            FROM todolists
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(lists)
    }

    /// Deletes a list and its items in one transaction
    ///
    /// # Returns
    ///
    /// True if the list existed and was deleted
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = conn.begin().await?;

        Item::delete_by_list(&mut *tx, id).await?;
        let result = sqlx::query("DELETE FROM todolists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes every list owned by a user
    ///
    /// Items must already be gone; the foreign key on `items.todolist_id`
    /// rejects the delete otherwise.
    pub(crate) async fn delete_by_user(conn: &mut SqliteConnection, user_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todolists WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_by_user(conn: &mut SqliteConnection, user_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todolists WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }
}
