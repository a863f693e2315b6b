/// Credential store
///
/// Registers users with a salted password hash and verifies login attempts.
/// Plaintext passwords are hashed before they reach the database and are never
/// stored; stored hashes never leave this module.
///
/// Hashing is slow on purpose, so callers hash before opening the write
/// transaction that [`register`] runs in.
///
/// # Example
///
/// ```no_run
/// use listkeeper_shared::auth::credentials::{register, verify};
/// use listkeeper_shared::auth::password::HashedPassword;
/// use listkeeper_shared::db::pool::begin_write;
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let password_hash = HashedPassword::new("secret1")?;
/// let mut tx = begin_write(&pool).await?;
/// let alice = register(&mut *tx, "alice", password_hash).await?;
/// tx.commit().await?;
///
/// let mut conn = pool.acquire().await?;
/// assert_eq!(verify(&mut *conn, "alice", "secret1").await?, Some(alice));
/// assert_eq!(verify(&mut *conn, "alice", "secret2").await?, None);
/// # Ok(())
/// # }
/// ```

use sqlx::SqliteConnection;
use tracing::debug;

use super::password::{HashedPassword, PasswordError};
use crate::models::user::{CreateUser, User};

/// Error type for credential store operations
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The username is already registered
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// Hashing or verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Registers a new user with an already hashed password
///
/// # Errors
///
/// - `CredentialError::DuplicateUsername` if the username is taken, including
///   when a concurrent registration wins the unique constraint
/// - `CredentialError::Database` for any other database failure
pub async fn register(
    conn: &mut SqliteConnection,
    username: &str,
    password_hash: HashedPassword,
) -> Result<User, CredentialError> {
    if User::find_by_username(&mut *conn, username).await?.is_some() {
        return Err(CredentialError::DuplicateUsername(username.to_string()));
    }

    let created = User::create(
        &mut *conn,
        CreateUser {
            username: username.to_string(),
            password_hash,
        },
    )
    .await;

    match created {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(CredentialError::DuplicateUsername(username.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Verifies a login attempt
///
/// # Returns
///
/// The user when `username` exists and `password` matches its stored hash,
/// `None` otherwise
///
/// # Errors
///
/// Returns an error if the stored hash is unreadable or the database fails
pub async fn verify(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<Option<User>, CredentialError> {
    let Some(credentials) = User::find_credentials(&mut *conn, username).await? else {
        debug!("Login attempt for unknown username");
        return Ok(None);
    };

    if credentials.password_hash.verify(password)? {
        Ok(Some(credentials.user))
    } else {
        debug!(user_id = credentials.user.id, "Password mismatch");
        Ok(None)
    }
}
