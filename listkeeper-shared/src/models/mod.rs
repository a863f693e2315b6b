/// Database models for Listkeeper
///
/// The models form a three-level ownership graph:
///
/// ```text
/// User ──< TodoList ──< Item
/// ```
///
/// Every todo list has exactly one owning user and every item exactly one
/// owning list. The schema declares the foreign keys without `ON DELETE
/// CASCADE`; deleting a parent goes through [`user::User::delete`] or
/// [`todo_list::TodoList::delete`], which remove children first inside a
/// single transaction.
///
/// All operations take a `&mut SqliteConnection` so callers can run them on a
/// pooled connection or inside a request transaction.
///
/// # Example
///
/// ```no_run
/// use listkeeper_shared::models::todo_list::{CreateTodoList, TodoList};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
/// let mut tx = pool.begin().await?;
/// let list = TodoList::create(
///     &mut *tx,
///     CreateTodoList {
///         name: "Groceries".to_string(),
///         user_id,
///     },
/// )
/// .await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

pub mod item;
pub mod todo_list;
pub mod user;
