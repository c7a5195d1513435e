use std::convert::Infallible;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use rand::rngs::OsRng;
use uuid::Uuid;

use crate::{error::ApiError, models::User, repository::UserRepositoryState};

/// Identity
///
/// The resolved, per-request representation of the caller: either an authenticated
/// user or anonymity. It is rebuilt from the bearer credential on every request and
/// passed as an explicit parameter into every service call — never read from
/// ambient or global state.
#[derive(Debug, Clone)]
pub enum Identity {
    Authenticated(User),
    Anonymous,
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }
}

/// Identity Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making Identity usable as a function
/// argument in any handler. This cleanly separates identity resolution
/// (middleware/extractor) from business logic (the handler).
///
/// The process:
/// 1. Dependency Resolution: accessing the user repository from the application state.
/// 2. Header Extraction: standard `Authorization: Bearer <token>` parsing.
/// 3. DB Lookup: matching the opaque credential against `users.token`.
///
/// Rejection: never. A missing, malformed or unknown credential degrades to
/// `Identity::Anonymous`; whether anonymity is acceptable is decided per operation
/// by the service layer. This is the one place a failure is locally swallowed.
impl<S> FromRequestParts<S> for Identity
where
    // S must allow sending across threads and sharing.
    S: Send + Sync,
    // Allows the extractor to pull the user repository from the app state.
    UserRepositoryState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let users = UserRepositoryState::from_ref(state);

        // No Authorization header, or a value that is not valid UTF-8: anonymous.
        let Some(auth_header) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Ok(Identity::Anonymous);
        };

        // A scheme other than Bearer is treated as no credential at all.
        let Some(token) = auth_header.strip_prefix("Bearer ") else {
            return Ok(Identity::Anonymous);
        };

        match users.find_by_token(token).await {
            Ok(Some(user)) => Ok(Identity::Authenticated(user)),
            // Unknown token: degrade gracefully instead of rejecting the request.
            Ok(None) => Ok(Identity::Anonymous),
            Err(e) => {
                tracing::warn!(error = %e, "token lookup failed, resolving as anonymous");
                Ok(Identity::Anonymous)
            }
        }
    }
}

/// hash_password
///
/// Produces a salted Argon2 hash of the plaintext credential. The stored value is
/// the PHC string, so the salt travels with the hash.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = %e, "argon2 hash_password error");
            ApiError::Internal(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// verify_password
///
/// Checks a plaintext credential against a stored PHC hash. A mismatch is `Ok(false)`;
/// only a corrupt stored hash is an error.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        tracing::error!(error = %e, "argon2 parse hash error");
        ApiError::Internal(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// generate_token
///
/// Issues a fresh opaque session credential. A v4 UUID draws from the OS CSPRNG,
/// which gives 122 bits of entropy per token.
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}
