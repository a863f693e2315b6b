/// Cookie-backed session extractor
///
/// Every request gets a [`Session`]: the decoded `session` cookie when it
/// carries a valid signature, an empty anonymous session otherwise. Handlers
/// that change the session hand it back as part of their response, which
/// re-signs it into a `Set-Cookie` header.
///
/// # Example
///
/// ```no_run
/// use axum::response::{IntoResponse, Redirect};
/// use listkeeper_web::session::Session;
///
/// async fn logout(mut session: Session) -> impl IntoResponse {
///     session.logout();
///     (session, Redirect::to("/login"))
/// }
/// ```

use std::{convert::Infallible, sync::Arc};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    response::{IntoResponseParts, ResponseParts},
};
use listkeeper_shared::auth::session::{
    decode_session, encode_session, Flash, FlashLevel, SessionClaims,
};
use tracing::debug;

use crate::{app::AppState, error::ApiError};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Per-request session state
#[derive(Clone)]
pub struct Session {
    claims: SessionClaims,
    secret: Arc<str>,
    secure: bool,
}

/// What every rendered page needs from the session
#[derive(Debug, Clone)]
pub struct PageFrame {
    /// Flashes consumed by this render
    pub flashes: Vec<Flash>,

    /// Whether the navigation shows the logged-in links
    pub authenticated: bool,

    pub csrf_token: String,
}

impl Session {
    pub fn user_id(&self) -> Option<i64> {
        self.claims.user_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims.is_authenticated()
    }

    pub fn login(&mut self, user_id: i64) {
        self.claims.login(user_id);
    }

    pub fn logout(&mut self) {
        self.claims.logout();
    }

    pub fn flash(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.claims.flash(level, message);
    }

    pub fn csrf_token(&mut self) -> String {
        self.claims.csrf_token().to_string()
    }

    pub fn verify_csrf(&self, submitted: &str) -> bool {
        self.claims.verify_csrf(submitted)
    }

    /// Consumes queued flashes and makes sure a CSRF token exists
    pub fn frame(&mut self) -> PageFrame {
        PageFrame {
            csrf_token: self.csrf_token(),
            authenticated: self.is_authenticated(),
            flashes: self.claims.take_flashes(),
        }
    }
}

/// Finds the session token among the request's cookies
fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            pair.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = match session_token(&parts.headers) {
            Some(token) => decode_session(token, &state.session_secret).unwrap_or_else(|e| {
                debug!(error = %e, "Discarding invalid session cookie");
                SessionClaims::new()
            }),
            None => SessionClaims::new(),
        };

        Ok(Self {
            claims,
            secret: state.session_secret.clone(),
            secure: state.config.session.secure_cookies,
        })
    }
}

impl IntoResponseParts for Session {
    type Error = ApiError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let token = encode_session(&self.claims, &self.secret)?;

        let mut cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/");
        if self.secure {
            cookie.push_str("; Secure");
        }

        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::InternalError(format!("Invalid session cookie: {}", e)))?;
        res.headers_mut().append(SET_COOKIE, value);

        Ok(res)
    }
}
