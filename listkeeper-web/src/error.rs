/// Error handling for the web server
///
/// Handlers return `ApiResult<T>`. Validation problems never reach this type:
/// they are answered locally with a re-rendered form or a flash. What is left
/// is "not found" (a missing or foreign list, an unknown route) and
/// everything unexpected, which becomes a 500 page. Returning an error drops
/// the handler's open transaction, which rolls it back.
///
/// # Example
///
/// ```no_run
/// use axum::{extract::State, response::Html};
/// use listkeeper_web::{app::AppState, error::{ApiError, ApiResult}};
///
/// async fn handler(State(state): State<AppState>) -> ApiResult<Html<String>> {
///     let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todolists")
///         .fetch_one(&state.db)
///         .await?;
///     if count == 0 {
///         return Err(ApiError::NotFound("No todo lists".to_string()));
///     }
///     Ok(Html(format!("{count} lists")))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use listkeeper_shared::auth::{credentials::CredentialError, password::PasswordError, session::SessionError};
use std::fmt;

use crate::views;

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified handler error type
#[derive(Debug)]
pub enum ApiError {
    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, views::not_found_page()).into_response()
            }
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, views::server_error_page()).into_response()
            }
        }
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Row not found".to_string()),
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert session token errors to API errors
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::InternalError(format!("Session operation failed: {}", err))
    }
}

/// Convert credential store errors to API errors
///
/// Duplicate usernames are handled by the registration form before this
/// conversion is reached, so they count as internal errors here.
impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Database(e) => e.into(),
            CredentialError::Password(e) => e.into(),
            CredentialError::DuplicateUsername(name) => {
                ApiError::InternalError(format!("Unhandled duplicate username: {}", name))
            }
        }
    }
}
