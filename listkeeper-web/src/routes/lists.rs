/// Todo list pages
///
/// # Endpoints
///
/// - `GET|POST /create/` - Create a list owned by the logged-in user
/// - `GET /view/` - All of the logged-in user's lists

use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
    forms::{CreateListForm, FieldErrors},
    session::Session,
    views,
};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use listkeeper_shared::{
    auth::session::FlashLevel,
    db::pool::begin_write,
    models::todo_list::{CreateTodoList, TodoList},
};
use tracing::info;

pub async fn create_form(mut session: Session) -> Response {
    let frame = session.frame();
    (session, views::create_page(&frame, "", &FieldErrors::new())).into_response()
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut session: Session,
    Form(form): Form<CreateListForm>,
) -> ApiResult<Response> {
    let errors = form.check(&session);

    if !errors.is_empty() {
        let frame = session.frame();
        return Ok((session, views::create_page(&frame, &form.name, &errors)).into_response());
    }

    let mut tx = begin_write(&state.db).await?;
    let list = TodoList::create(
        &mut *tx,
        CreateTodoList {
            name: form.name,
            user_id: user.id,
        },
    )
    .await?;
    tx.commit().await?;

    info!(user_id = user.id, todolist_id = list.id, "Todo list created");

    session.flash(FlashLevel::Success, "New Todo was created");
    Ok((session, Redirect::to("/view/")).into_response())
}

pub async fn view_lists(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut session: Session,
) -> ApiResult<Response> {
    let mut conn = state.db.acquire().await?;
    let lists = TodoList::list_by_user(&mut *conn, user.id).await?;

    let frame = session.frame();
    Ok((session, views::lists_page(&frame, &user.username, &lists)).into_response())
}
