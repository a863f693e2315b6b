/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id hashing behind the opaque [`password::HashedPassword`] type
/// - [`credentials`]: The credential store (`register` / `verify`)
/// - [`session`]: Signed session tokens carrying the login state, CSRF token and flash messages
///
/// # Example
///
/// ```
/// use listkeeper_shared::auth::password::HashedPassword;
/// use listkeeper_shared::auth::session::{decode_session, encode_session, SessionClaims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = HashedPassword::new("secret1")?;
/// assert!(hash.verify("secret1")?);
///
/// let mut claims = SessionClaims::new();
/// claims.login(7);
/// let token = encode_session(&claims, "session-secret")?;
/// assert_eq!(decode_session(&token, "session-secret")?.user_id, Some(7));
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod password;
pub mod session;
