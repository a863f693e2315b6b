/// Password hashing using Argon2id
///
/// Passwords are stored as a [`HashedPassword`]: an opaque value that can be
/// created from a plaintext password and checked against a plaintext attempt,
/// but never read back. It has no accessor, no `Display`, and its `Debug`
/// output is redacted. The only place the encoded hash leaves this type is the
/// database column it is bound to.
///
/// # Parameters
///
/// - **Algorithm**: Argon2id, version 0x13
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Salt**: 16 random bytes per hash
///
/// # Example
///
/// ```
/// use listkeeper_shared::auth::password::HashedPassword;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = HashedPassword::new("secret1")?;
///
/// assert!(hash.verify("secret1")?);
/// assert!(!hash.verify("secret2")?);
/// # Ok(())
/// # }
/// ```

use std::fmt;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// The stored hash is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// A salted Argon2id password hash in PHC string format
///
/// Write-only by construction: build it with [`HashedPassword::new`], check
/// attempts with [`HashedPassword::verify`].
#[derive(Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(transparent)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hashes a plaintext password with a fresh random salt
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` if the Argon2 parameters are
    /// rejected or hashing fails.
    pub fn new(password: &str) -> Result<Self, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let params = ParamsBuilder::new()
            .m_cost(65536)
            .t_cost(3)
            .p_cost(4)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(Self(password_hash.to_string()))
    }

    /// Checks a plaintext attempt against this hash
    ///
    /// The comparison is constant-time. Returns `Ok(false)` on mismatch.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidHash` when the stored value is not a
    /// parseable PHC string, and `PasswordError::VerifyError` for any other
    /// verification failure.
    pub fn verify(&self, password: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(&self.0)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        // Parameters are embedded in the PHC string.
        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(<redacted>)")
    }
}
