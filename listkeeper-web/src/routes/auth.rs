/// Authentication pages
///
/// # Endpoints
///
/// - `GET|POST /register` - Create an account, then go to the login page
/// - `GET|POST /login` - Start an authenticated session
/// - `GET /logout` - End it
///
/// Visitors who are already logged in are sent to `/view/` from the register
/// and login pages.

use crate::{
    app::AppState,
    error::ApiResult,
    forms::{FieldErrors, LoginForm, RegisterForm, DUPLICATE_USERNAME},
    session::Session,
    views,
};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use listkeeper_shared::{
    auth::{
        credentials::{self, CredentialError},
        password::HashedPassword,
        session::FlashLevel,
    },
    db::pool::begin_write,
};
use tracing::info;

pub async fn register_form(mut session: Session) -> Response {
    if session.is_authenticated() {
        return Redirect::to("/view/").into_response();
    }

    let frame = session.frame();
    (session, views::register_page(&frame, "", &FieldErrors::new())).into_response()
}

/// Registers a new user
///
/// On success the visitor lands on the login page with a success flash. A
/// taken username is reported on the username field.
pub async fn register(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<RegisterForm>,
) -> ApiResult<Response> {
    if session.is_authenticated() {
        return Ok(Redirect::to("/view/").into_response());
    }

    let mut errors = form.check(&session);

    if errors.is_empty() {
        let password_hash = HashedPassword::new(&form.password)?;
        let mut tx = begin_write(&state.db).await?;

        match credentials::register(&mut *tx, &form.username, password_hash).await {
            Ok(user) => {
                tx.commit().await?;
                info!(user_id = user.id, "User registered");

                session.flash(FlashLevel::Success, "User registration successful");
                return Ok((session, Redirect::to("/login")).into_response());
            }
            Err(CredentialError::DuplicateUsername(_)) => {
                errors.add("username", DUPLICATE_USERNAME);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let frame = session.frame();
    Ok((session, views::register_page(&frame, &form.username, &errors)).into_response())
}

pub async fn login_form(mut session: Session) -> Response {
    if session.is_authenticated() {
        return Redirect::to("/view/").into_response();
    }

    let frame = session.frame();
    (session, views::login_page(&frame, "")).into_response()
}

/// Logs a user in
///
/// Any failure re-renders the form with the username filled in and no
/// explanation.
pub async fn login(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    if session.is_authenticated() {
        return Ok(Redirect::to("/view/").into_response());
    }

    if form.is_acceptable(&session) {
        let mut conn = state.db.acquire().await?;

        if let Some(user) = credentials::verify(&mut *conn, &form.username, &form.password).await? {
            info!(user_id = user.id, "User logged in");

            session.login(user.id);
            session.flash(FlashLevel::Success, format!("welcome {}", user.username));
            return Ok((session, Redirect::to("/view/")).into_response());
        }
    }

    let frame = session.frame();
    Ok((session, views::login_page(&frame, &form.username)).into_response())
}

pub async fn logout(mut session: Session) -> impl IntoResponse {
    if let Some(user_id) = session.user_id() {
        info!(user_id, "User logged out");
    }

    session.logout();
    (session, Redirect::to("/login"))
}
