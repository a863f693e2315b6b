/// Application state and router builder
///
/// This module defines the shared application state, the session gate that
/// protects the list pages, and the function that assembles the router.
///
/// # Example
///
/// ```no_run
/// use listkeeper_web::{app::AppState, config::Config};
/// use sqlx::SqlitePool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = SqlitePool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = listkeeper_web::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    middleware::security::SecurityHeadersLayer,
    session::Session,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use listkeeper_shared::{auth::session::generate_secret, models::user::User};
use sqlx::SqlitePool;
use std::{any::Any, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Key that signs session cookies
    pub session_secret: Arc<str>,
}

impl AppState {
    /// Creates new application state
    ///
    /// Without a configured session secret a random one is generated, so
    /// every restart logs all visitors out.
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let session_secret: Arc<str> = match &config.session.secret {
            Some(secret) => secret.as_str().into(),
            None => {
                tracing::warn!("SESSION_SECRET not set, generating a per-process secret");
                generate_secret().into()
            }
        };

        Self {
            db,
            config: Arc::new(config),
            session_secret,
        }
    }
}

/// The logged-in user, placed in request extensions by the session gate
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Decides whether a session may reach a protected page
///
/// # Errors
///
/// Returns the redirect to the login page for anonymous sessions
pub fn guard(session: &Session) -> Result<i64, Redirect> {
    session.user_id().ok_or_else(|| Redirect::to("/login"))
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET       /             # Redirect to /view/
/// ├── GET       /health       # Health check (JSON)
/// ├── GET|POST  /register
/// ├── GET|POST  /login
/// ├── GET       /logout
/// └── (session gate)
///     ├── GET|POST  /create/
///     ├── GET       /view/
///     └── GET|POST  /index/:id
/// ```
///
/// Anything else gets the 404 page.
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. Session gate (protected routes only)
/// 2. Panic recovery (tower-http CatchPanicLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(|| async { Redirect::to("/view/") }))
        .route("/health", get(routes::health::health_check))
        .route("/register", get(routes::auth::register_form).post(routes::auth::register))
        .route("/login", get(routes::auth::login_form).post(routes::auth::login))
        .route("/logout", get(routes::auth::logout));

    let list_routes = Router::new()
        .route("/create/", get(routes::lists::create_form).post(routes::lists::create))
        .route("/view/", get(routes::lists::view_lists))
        .route("/index/:id", get(routes::items::show_list).post(routes::items::update_list))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_login,
        ));

    let secure_cookies = state.config.session.secure_cookies;

    Router::new()
        .merge(public_routes)
        .merge(list_routes)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SecurityHeadersLayer::new(secure_cookies))
        .with_state(state)
}

/// Session gate for the list pages
///
/// Anonymous sessions are redirected to the login page without running the
/// handler. A session naming a user that no longer exists is cleared first.
async fn require_login(
    State(state): State<AppState>,
    mut session: Session,
    mut req: Request,
    next: Next,
) -> ApiResult<Response> {
    let user_id = match guard(&session) {
        Ok(user_id) => user_id,
        Err(redirect) => return Ok(redirect.into_response()),
    };

    let mut conn = state.db.acquire().await?;
    let Some(user) = User::find_by_id(&mut *conn, user_id).await? else {
        tracing::warn!(user_id, "Session refers to a missing user, clearing it");
        session.logout();
        return Ok((session, Redirect::to("/login")).into_response());
    };
    drop(conn);

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
    });

    Ok(next.run(req).await)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("No route".to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::InternalError(format!("Handler panicked: {}", detail)).into_response()
}
