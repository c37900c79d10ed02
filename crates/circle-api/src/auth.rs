//! Credential issuing and the session guard.
//!
//! Passwords are stored as argon2 PHC strings. A successful login mints a
//! signed [`Claims`] token with a fixed lifetime; every protected handler takes
//! a [`Caller`], which only exists once the bearer token has been verified and
//! its identity is still on record.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use circle_core::{
  identity::Identity,
  store::SocialStore,
  token::{Claims, TokenError, TokenKey},
};
use rand_core::OsRng;

use crate::{AppState, error::ApiError};

// ─── Sessions ────────────────────────────────────────────────────────────────

/// The server's signing key and the lifetime given to every new token.
#[derive(Debug, Clone)]
pub struct Sessions {
  key: TokenKey,
  ttl: Duration,
}

impl Sessions {
  pub fn new(key: TokenKey, ttl: Duration) -> Self { Self { key, ttl } }

  pub fn ttl(&self) -> Duration { self.ttl }

  /// Mint a token for `identity`, valid from `now` for the configured ttl.
  pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, ApiError> {
    let claims = Claims::for_identity(identity, now, self.ttl);
    self
      .key
      .sign(&claims)
      .map_err(|e| ApiError::Store(Box::new(e)))
  }

  pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
    self.key.verify(token, now)
  }
}

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` with a fresh salt. Runs on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
  tokio::task::spawn_blocking(move || {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| ApiError::Store(format!("argon2 error: {e}").into()))
  })
  .await
  .map_err(ApiError::store)?
}

/// Check `password` against a stored PHC string. Any parse or verification
/// failure is a mismatch. Runs on the blocking pool.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, ApiError> {
  tokio::task::spawn_blocking(move || {
    let Ok(parsed) = PasswordHash::new(&password_hash) else {
      return false;
    };
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
  .await
  .map_err(ApiError::store)
}

// ─── Session guard ───────────────────────────────────────────────────────────

/// The authenticated caller: the stored identity behind a verified bearer
/// token.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl Caller {
  pub fn id(&self) -> uuid::Uuid { self.0.identity_id }

  pub fn name(&self) -> &str { &self.0.name }

  pub fn avatar(&self) -> &str { &self.0.avatar }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  let value = headers
    .get(header::AUTHORIZATION)
    .ok_or_else(|| ApiError::Unauthorized("missing authorization header".into()))?
    .to_str()
    .map_err(|_| ApiError::Unauthorized("authorization header is not ASCII".into()))?;

  value
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or_else(|| ApiError::Unauthorized("expected a bearer token".into()))
}

/// Verify the request's bearer token against `sessions` at time `now`.
pub fn authenticate(
  headers: &HeaderMap,
  sessions: &Sessions,
  now: DateTime<Utc>,
) -> Result<Claims, ApiError> {
  let token = bearer_token(headers)?;
  sessions
    .verify(token, now)
    .map_err(|e| ApiError::Unauthorized(e.to_string()))
}

/// Resolve verified claims to the identity they were issued for. A token
/// outlives a deleted account, so a missing identity is unauthorized.
pub async fn resolve<S: SocialStore>(store: &S, claims: &Claims) -> Result<Caller, ApiError> {
  store
    .get_identity(claims.id)
    .await
    .map_err(ApiError::store)?
    .map(Caller)
    .ok_or_else(|| ApiError::Unauthorized("identity no longer exists".into()))
}

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: SocialStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let claims = authenticate(&parts.headers, &state.sessions, Utc::now())?;
    resolve(state.store.as_ref(), &claims).await
  }
}
