/// Todo item model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE items (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     text TEXT NOT NULL,
///     complete BOOLEAN NOT NULL DEFAULT 0,
///     todolist_id INTEGER NOT NULL REFERENCES todolists(id),
///     created_at TEXT NOT NULL
/// );
/// ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

/// A single entry on a todo list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub text: String,
    pub complete: bool,

    /// Owning list
    pub todolist_id: i64,

    pub created_at: DateTime<Utc>,
}

/// Input for appending an item; new items always start incomplete
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub todolist_id: i64,
    pub text: String,
}

impl Item {
    pub async fn create(conn: &mut SqliteConnection, data: CreateItem) -> Result<Self, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (text, complete, todolist_id)
            VALUES (?, 0, ?)
            RETURNING id, text, complete, todolist_id, created_at
            "#,
        )
        .bind(data.text)
        .bind(data.todolist_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(item)
    }

    /// Lists the items of a list in creation order
    pub async fn list_by_list(conn: &mut SqliteConnection, todolist_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, text, complete, todolist_id, created_at
            FROM items
            WHERE todolist_id = ?
            ORDER BY id
            "#,
        )
        .bind(todolist_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(items)
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, text, complete, todolist_id, created_at
            FROM items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(item)
    }

    /// Overwrites the completion flag of every item on a list
    ///
    /// Items whose ID is in `completed` become complete; every other item on
    /// the list becomes incomplete. IDs that do not belong to the list are
    /// ignored.
    ///
    /// # Returns
    ///
    /// Number of items on the list that were written
    pub async fn overwrite_completion(
        conn: &mut SqliteConnection,
        todolist_id: i64,
        completed: &HashSet<i64>,
    ) -> Result<u64, sqlx::Error> {
        let items = Self::list_by_list(&mut *conn, todolist_id).await?;

        let mut written = 0;
        for item in items {
            let result = sqlx::query("UPDATE items SET complete = ? WHERE id = ?")
                .bind(completed.contains(&item.id))
                .bind(item.id)
                .execute(&mut *conn)
                .await?;
            written += result.rows_affected();
        }

        Ok(written)
    }

    pub(crate) async fn delete_by_list(conn: &mut SqliteConnection, todolist_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE todolist_id = ?")
            .bind(todolist_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Removes every item on every list owned by a user
    pub(crate) async fn delete_by_user(conn: &mut SqliteConnection, user_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM items
            WHERE todolist_id IN (SELECT id FROM todolists WHERE user_id = ?)
            "#,
        )
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_by_list(conn: &mut SqliteConnection, todolist_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items WHERE todolist_id = ?")
            .bind(todolist_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }
}
