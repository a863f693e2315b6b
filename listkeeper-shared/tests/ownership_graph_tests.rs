/// Integration tests for the user -> todo list -> item ownership graph

mod common;

use std::collections::HashSet;

use common::{hashed, TestDb};
use listkeeper_shared::auth::credentials::register;
use listkeeper_shared::models::item::{CreateItem, Item};
use listkeeper_shared::models::todo_list::{CreateTodoList, TodoList};
use listkeeper_shared::models::user::User;
use sqlx::SqliteConnection;

async fn list_with_items(conn: &mut SqliteConnection, user_id: i64, name: &str, texts: &[&str]) -> TodoList {
    let list = TodoList::create(
        &mut *conn,
        CreateTodoList {
            name: name.to_string(),
            user_id,
        },
    )
    .await
    .unwrap();

    for text in texts {
        Item::create(
            &mut *conn,
            CreateItem {
                todolist_id: list.id,
                text: text.to_string(),
            },
        )
        .await
        .unwrap();
    }

    list
}

async fn row_count(conn: &mut SqliteConnection, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&mut *conn)
        .await
        .unwrap();
    count
}

#[tokio::test]
async fn test_find_owned_isolates_users() {
    let db = TestDb::new().await;
    let mut conn = db.pool.acquire().await.unwrap();

    let alice = register(&mut *conn, "alice", hashed("secret1")).await.unwrap();
    let bob = register(&mut *conn, "bob", hashed("secret2")).await.unwrap();
    let groceries = list_with_items(&mut *conn, alice.id, "Groceries", &["eggs"]).await;

    assert_eq!(
        TodoList::find_owned(&mut *conn, groceries.id, alice.id).await.unwrap(),
        Some(groceries.clone())
    );
    assert_eq!(TodoList::find_owned(&mut *conn, groceries.id, bob.id).await.unwrap(), None);
    assert_eq!(TodoList::find_owned(&mut *conn, 9999, alice.id).await.unwrap(), None);

    assert!(TodoList::list_by_user(&mut *conn, bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lists_and_items_keep_creation_order() {
    let db = TestDb::new().await;
    let mut conn = db.pool.acquire().await.unwrap();

    let alice = register(&mut *conn, "alice", hashed("secret1")).await.unwrap();
    let first = list_with_items(&mut *conn, alice.id, "Groceries", &["eggs", "milk", "bread"]).await;
    let second = list_with_items(&mut *conn, alice.id, "Chores", &[]).await;

    let lists = TodoList::list_by_user(&mut *conn, alice.id).await.unwrap();
    let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Groceries", "Chores"]);
    assert!(first.id < second.id);

    let items = Item::list_by_list(&mut *conn, first.id).await.unwrap();
    let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["eggs", "milk", "bread"]);
    assert!(items.iter().all(|i| !i.complete));
}

#[tokio::test]
async fn test_overwrite_completion_is_full_overwrite() {
    let db = TestDb::new().await;
    let mut conn = db.pool.acquire().await.unwrap();

    let alice = register(&mut *conn, "alice", hashed("secret1")).await.unwrap();
    let list = list_with_items(&mut *conn, alice.id, "Groceries", &["eggs", "milk", "bread"]).await;
    let items = Item::list_by_list(&mut *conn, list.id).await.unwrap();
    let (eggs, milk, bread) = (items[0].id, items[1].id, items[2].id);

    let written = Item::overwrite_completion(&mut *conn, list.id, &HashSet::from([eggs, milk]))
        .await
        .unwrap();
    assert_eq!(written, 3);

    // A later save that only names bread clears the other two
    Item::overwrite_completion(&mut *conn, list.id, &HashSet::from([bread]))
        .await
        .unwrap();

    let items = Item::list_by_list(&mut *conn, list.id).await.unwrap();
    let complete: Vec<(i64, bool)> = items.iter().map(|i| (i.id, i.complete)).collect();
    assert_eq!(complete, vec![(eggs, false), (milk, false), (bread, true)]);
}

#[tokio::test]
async fn test_overwrite_completion_ignores_foreign_items() {
    let db = TestDb::new().await;
    let mut conn = db.pool.acquire().await.unwrap();

    let alice = register(&mut *conn, "alice", hashed("secret1")).await.unwrap();
    let bob = register(&mut *conn, "bob", hashed("secret2")).await.unwrap();
    let alices = list_with_items(&mut *conn, alice.id, "Groceries", &["eggs"]).await;
    let bobs = list_with_items(&mut *conn, bob.id, "Tools", &["hammer"]).await;
    let hammer = Item::list_by_list(&mut *conn, bobs.id).await.unwrap()[0].id;

    Item::overwrite_completion(&mut *conn, alices.id, &HashSet::from([hammer]))
        .await
        .unwrap();

    let hammer = Item::find_by_id(&mut *conn, hammer).await.unwrap().unwrap();
    assert!(!hammer.complete);
}

#[tokio::test]
async fn test_item_requires_existing_list() {
    let db = TestDb::new().await;
    let mut conn = db.pool.acquire().await.unwrap();

    let orphan = Item::create(
        &mut *conn,
        CreateItem {
            todolist_id: 42,
            text: "floating".to_string(),
        },
    )
    .await;

    assert!(orphan.is_err());
    assert_eq!(row_count(&mut *conn, "items").await, 0);
}

#[tokio::test]
async fn test_raw_parent_delete_is_rejected() {
    let db = TestDb::new().await;
    let mut conn = db.pool.acquire().await.unwrap();

    let alice = register(&mut *conn, "alice", hashed("secret1")).await.unwrap();
    list_with_items(&mut *conn, alice.id, "Groceries", &["eggs"]).await;

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(alice.id)
        .execute(&mut *conn)
        .await;

    assert!(result.is_err(), "Foreign keys should block deleting a user who owns lists");
    assert_eq!(User::count(&mut *conn).await.unwrap(), 1);
}

#[tokio::test]
async fn test_user_delete_leaves_no_orphans() {
    let db = TestDb::new().await;
    let mut conn = db.pool.acquire().await.unwrap();

    let alice = register(&mut *conn, "alice", hashed("secret1")).await.unwrap();
    let bob = register(&mut *conn, "bob", hashed("secret2")).await.unwrap();
    list_with_items(&mut *conn, alice.id, "Groceries", &["eggs", "milk"]).await;
    list_with_items(&mut *conn, alice.id, "Chores", &["dishes"]).await;
    let bobs = list_with_items(&mut *conn, bob.id, "Tools", &["hammer"]).await;

    assert!(User::delete(&mut *conn, alice.id).await.unwrap());
    assert!(!User::delete(&mut *conn, alice.id).await.unwrap());

    assert_eq!(User::find_by_id(&mut *conn, alice.id).await.unwrap(), None);
    assert_eq!(row_count(&mut *conn, "todolists").await, 1);
    assert_eq!(row_count(&mut *conn, "items").await, 1);
    assert_eq!(Item::count_by_list(&mut *conn, bobs.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_delete_removes_items() {
    let db = TestDb::new().await;
    let mut conn = db.pool.acquire().await.unwrap();

    let alice = register(&mut *conn, "alice", hashed("secret1")).await.unwrap();
    let groceries = list_with_items(&mut *conn, alice.id, "Groceries", &["eggs", "milk"]).await;
    let chores = list_with_items(&mut *conn, alice.id, "Chores", &["dishes"]).await;

    assert!(TodoList::delete(&mut *conn, groceries.id).await.unwrap());

    assert_eq!(TodoList::count_by_user(&mut *conn, alice.id).await.unwrap(), 1);
    assert_eq!(Item::count_by_list(&mut *conn, groceries.id).await.unwrap(), 0);
    assert_eq!(Item::count_by_list(&mut *conn, chores.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_cascade_inside_outer_transaction_rolls_back() {
    let db = TestDb::new().await;

    let alice = {
        let mut conn = db.pool.acquire().await.unwrap();
        let alice = register(&mut *conn, "alice", hashed("secret1")).await.unwrap();
        list_with_items(&mut *conn, alice.id, "Groceries", &["eggs"]).await;
        alice
    };

    let mut tx = db.pool.begin().await.unwrap();
    assert!(User::delete(&mut *tx, alice.id).await.unwrap());
    tx.rollback().await.unwrap();

    let mut conn = db.pool.acquire().await.unwrap();
    assert_eq!(User::count(&mut *conn).await.unwrap(), 1);
    assert_eq!(TodoList::count_by_user(&mut *conn, alice.id).await.unwrap(), 1);
    assert_eq!(row_count(&mut *conn, "items").await, 1);
}
