//! Password hashing, login sessions, and the request extractors that
//! resolve the session cookie into a user.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};
use thiserror::Error;

use crate::api::response::PageError;
use crate::storage::models::{SessionRecord, UserRecord};
use crate::storage::DatabaseError;
use crate::AppState;

/// Name of the login session cookie.
pub const SESSION_COOKIE: &str = "bookshelf_session";

const PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const PBKDF2_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(n) => n,
    None => panic!("iterations must be non-zero"),
};
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = digest::SHA256_OUTPUT_LEN;
const TOKEN_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("System randomness unavailable")]
    Rng,
}

/// Derive a PBKDF2 hash for a new password. Returns `(hash, salt)`.
pub fn hash_password(password: &str) -> Result<(Vec<u8>, Vec<u8>), AuthError> {
    let mut salt = vec![0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| AuthError::Rng)?;

    let mut hash = vec![0u8; CREDENTIAL_LEN];
    pbkdf2::derive(
        PBKDF2_ALG,
        PBKDF2_ITERATIONS,
        &salt,
        password.as_bytes(),
        &mut hash,
    );
    Ok((hash, salt))
}

/// Constant-time check of a password attempt against a stored hash.
pub fn verify_password(user: &UserRecord, attempt: &str) -> bool {
    pbkdf2::verify(
        PBKDF2_ALG,
        PBKDF2_ITERATIONS,
        &user.password_salt,
        attempt.as_bytes(),
        &user.password_hash,
    )
    .is_ok()
}

/// Mint a session for `user_id` and persist it. The returned record's
/// token goes into the session cookie.
pub fn start_session(state: &AppState, user_id: u64) -> Result<SessionRecord, AuthError> {
    let mut bytes = vec![0u8; TOKEN_LEN];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AuthError::Rng)?;
    let token = URL_SAFE_NO_PAD.encode(&bytes);

    let expires_at = Utc::now() + Duration::seconds(state.config.session_ttl_secs as i64);
    let session = state.db.put_session(&token, user_id, expires_at)?;

    tracing::debug!(user_id, "Started session");
    Ok(session)
}

/// The authenticated requester. Rejects with a redirect to the login page
/// when no live session is attached to the request.
pub struct CurrentUser(pub UserRecord);

/// The requester, if logged in. Never rejects.
pub struct OptionalUser(pub Option<UserRecord>);

fn user_from_parts(parts: &Parts, state: &AppState) -> Result<Option<UserRecord>, DatabaseError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = match jar.get(SESSION_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => return Ok(None),
    };

    let session = match state.db.get_session(&token)? {
        Some(session) => session,
        None => return Ok(None),
    };

    state.db.get_user(session.user_id)
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = PageError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, PageError> {
        match user_from_parts(parts, state)? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(PageError::login_required(parts.uri.path())),
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match user_from_parts(parts, state) {
            Ok(user) => Ok(OptionalUser(user)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to resolve session; treating as anonymous");
                Ok(OptionalUser(None))
            }
        }
    }
}
