/// Signed session tokens
///
/// A browser session is a small set of claims signed with HS256 and stored
/// client-side in a cookie. The claims hold everything the server remembers
/// about a visitor between requests:
///
/// - `user_id`: present once the visitor has logged in (Authenticated state)
/// - `csrf`: the token every submitted form must echo back
/// - `flashes`: one-shot notices queued for the next rendered page
///
/// Sessions do not expire. Logging out clears `user_id`; a token that fails
/// signature or issuer validation is rejected by [`decode_session`] and the
/// caller starts over with [`SessionClaims::new`].
///
/// # Example
///
/// ```
/// use listkeeper_shared::auth::session::{decode_session, encode_session, FlashLevel, SessionClaims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-session-secret-of-at-least-32-chars";
///
/// let mut claims = SessionClaims::new();
/// claims.login(42);
/// claims.flash(FlashLevel::Success, "welcome alice");
///
/// let token = encode_session(&claims, secret)?;
/// let mut restored = decode_session(&token, secret)?;
///
/// assert_eq!(restored.user_id, Some(42));
/// assert_eq!(restored.take_flashes().len(), 1);
/// # Ok(())
/// # }
/// ```

use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Issuer written into and required from every session token
pub const SESSION_ISSUER: &str = "listkeeper";

/// Length of generated CSRF tokens (characters)
const CSRF_TOKEN_LENGTH: usize = 32;

/// Length of generated signing secrets (characters)
const SECRET_LENGTH: usize = 64;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to sign the token
    #[error("Failed to encode session: {0}")]
    EncodeError(String),

    /// Signature, issuer or payload check failed
    #[error("Failed to decode session: {0}")]
    DecodeError(String),
}

/// Flash message category, used for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Danger,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Danger => "danger",
        }
    }
}

/// A one-shot notice shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Issuer - always [`SESSION_ISSUER`]
    pub iss: String,

    /// Issued at (Unix timestamp), refreshed on every write
    pub iat: i64,

    /// Logged-in user, `None` while anonymous
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// CSRF token for form submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf: Option<String>,

    /// Pending flash messages, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<Flash>,
}

impl SessionClaims {
    /// Creates an empty anonymous session
    pub fn new() -> Self {
        Self {
            iss: SESSION_ISSUER.to_string(),
            iat: Utc::now().timestamp(),
            user_id: None,
            csrf: None,
            flashes: Vec::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Moves the session to the Authenticated state
    pub fn login(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
    }

    /// Moves the session back to the Anonymous state
    ///
    /// Queued flashes and the CSRF token survive.
    pub fn logout(&mut self) {
        self.user_id = None;
    }

    pub fn flash(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.flashes.push(Flash {
            level,
            message: message.into(),
        });
    }

    /// Removes and returns all queued flashes
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }

    /// Returns the session's CSRF token, generating one on first use
    pub fn csrf_token(&mut self) -> &str {
        self.csrf
            .get_or_insert_with(|| generate_random_string(CSRF_TOKEN_LENGTH))
            .as_str()
    }

    /// Checks a submitted CSRF token against the session's token
    ///
    /// Always false when the session has no token yet.
    pub fn verify_csrf(&self, submitted: &str) -> bool {
        match &self.csrf {
            Some(expected) => !submitted.is_empty() && expected == submitted,
            None => false,
        }
    }
}

impl Default for SessionClaims {
    fn default() -> Self {
        Self::new()
    }
}

/// Signs session claims into a token
///
/// # Errors
///
/// Returns `SessionError::EncodeError` if serialization or signing fails
pub fn encode_session(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    let mut claims = claims.clone();
    claims.iat = Utc::now().timestamp();

    encode(&header, &claims, &key)
        .map_err(|e| SessionError::EncodeError(format!("Token encoding failed: {}", e)))
}

/// Verifies a session token and extracts its claims
///
/// Checks the HS256 signature and the issuer. There is no expiry check:
/// sessions last until the visitor logs out.
///
/// # Errors
///
/// Returns `SessionError::DecodeError` for a bad signature, wrong issuer or
/// malformed token
pub fn decode_session(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.required_spec_claims = HashSet::from(["iss".to_string()]);
    validation.validate_exp = false;
    validation.validate_nbf = false;

    let token_data = decode::<SessionClaims>(token, &key, &validation)
        .map_err(|e| SessionError::DecodeError(format!("Token validation failed: {}", e)))?;

    Ok(token_data.claims)
}

/// Generates a random signing secret for when none is configured
pub fn generate_secret() -> String {
    generate_random_string(SECRET_LENGTH)
}

/// Generates a random alphanumeric string (A-Z, a-z, 0-9)
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
