/// Single list page
///
/// # Endpoints
///
/// - `GET /index/:id` - The list with its items
/// - `POST /index/:id` - Save completion checkboxes, or add an item
///
/// A list the logged-in user does not own is indistinguishable from one that
/// does not exist: both answer 404, as does a non-numeric id.

use std::collections::HashMap;

use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult},
    forms::{item_text_is_valid, ListAction, ListSubmission},
    session::Session,
    views,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use listkeeper_shared::{
    auth::session::FlashLevel,
    db::pool::begin_write,
    models::{
        item::{CreateItem, Item},
        todo_list::TodoList,
    },
};
use sqlx::SqliteConnection;
use tracing::{debug, info};

fn parse_list_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::NotFound(format!("Todo list {}", raw)))
}

async fn owned_list(conn: &mut SqliteConnection, id: i64, user: &CurrentUser) -> ApiResult<TodoList> {
    TodoList::find_owned(conn, id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Todo list {} for user {}", id, user.id)))
}

async fn render_list(conn: &mut SqliteConnection, mut session: Session, list: &TodoList) -> ApiResult<Response> {
    let items = Item::list_by_list(conn, list.id).await?;

    let frame = session.frame();
    Ok((session, views::list_page(&frame, list, &items)).into_response())
}

pub async fn show_list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_list_id(&id)?;

    let mut conn = state.db.acquire().await?;
    let list = owned_list(&mut *conn, id, &user).await?;

    render_list(&mut *conn, session, &list).await
}

/// Applies a list page submission
///
/// Saving overwrites the completion flag of every item: boxes left unticked
/// mark their items incomplete. A new item must be longer than two
/// characters; a shorter one is rolled back and reported with a flash.
pub async fn update_list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut session: Session,
    Path(id): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> ApiResult<Response> {
    let id = parse_list_id(&id)?;

    let mut tx = begin_write(&state.db).await?;
    let list = owned_list(&mut *tx, id, &user).await?;
    let back = Redirect::to(&format!("/index/{}", list.id));

    let submission = ListSubmission::from_fields(&fields);

    if submission.action != ListAction::Nothing && !session.verify_csrf(&submission.csrf_token) {
        debug!(todolist_id = list.id, "Rejected list update with bad CSRF token");
        session.flash(FlashLevel::Danger, "form expired, please try again");
        return Ok((session, back).into_response());
    }

    match submission.action {
        ListAction::Save { completed } => {
            let written = Item::overwrite_completion(&mut *tx, list.id, &completed).await?;
            tx.commit().await?;

            info!(todolist_id = list.id, items = written, completed = completed.len(), "Completion saved");
            session.flash(FlashLevel::Info, "item(s) updated");
            Ok((session, back).into_response())
        }
        ListAction::AddItem { text } => {
            if !item_text_is_valid(&text) {
                tx.rollback().await?;

                debug!(todolist_id = list.id, "Rejected item text that is too short");
                session.flash(FlashLevel::Danger, "error adding new item, please try again");
                return Ok((session, back).into_response());
            }

            let item = Item::create(
                &mut *tx,
                CreateItem {
                    todolist_id: list.id,
                    text,
                },
            )
            .await?;
            tx.commit().await?;

            info!(todolist_id = list.id, item_id = item.id, "Item added");
            session.flash(FlashLevel::Success, "new item added to the list");
            Ok((session, back).into_response())
        }
        ListAction::Nothing => render_list(&mut *tx, session, &list).await,
    }
}
