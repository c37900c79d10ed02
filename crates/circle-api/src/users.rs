//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users/register` | Body: name, email, password, password2 |
//! | `POST` | `/users/login` | Body: email, password; returns a bearer token |
//! | `GET`  | `/users/current` | Requires a bearer token |

use axum::{Json, extract::State};
use chrono::Utc;
use circle_core::{
  form::{LoginForm, RegisterForm},
  identity::{NewIdentity, PublicIdentity, gravatar_url},
  store::SocialStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{Caller, hash_password, verify_password},
  error::ApiError,
  extract::JsonBody,
};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Registered {
  /// Where a browser client should go next.
  pub redirect: String,
  pub user:     PublicIdentity,
}

/// `POST /users/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  JsonBody(form): JsonBody<RegisterForm>,
) -> Result<Json<Registered>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let registration = form.validate().map_err(ApiError::Validation)?;

  let existing = state
    .store
    .find_identity_by_email(&registration.email)
    .await
    .map_err(ApiError::store)?;
  if existing.is_some() {
    return Err(ApiError::conflict("email", "Email already exists"));
  }

  let password_hash = hash_password(registration.password).await?;
  let identity = state
    .store
    .create_identity(NewIdentity {
      avatar: gravatar_url(&registration.email),
      name: registration.name,
      email: registration.email,
      password_hash,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(identity = %identity.identity_id, "registered identity");
  Ok(Json(Registered { redirect: "/login".into(), user: identity.public() }))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct LoggedIn {
  pub success: bool,
  pub token:   String,
}

/// `POST /users/login`
///
/// Unknown email and wrong password produce the same error.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  JsonBody(form): JsonBody<LoginForm>,
) -> Result<Json<LoggedIn>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let credentials = form.validate().map_err(ApiError::Validation)?;

  let Some(identity) = state
    .store
    .find_identity_by_email(&credentials.email)
    .await
    .map_err(ApiError::store)?
  else {
    tracing::debug!("login for unknown email");
    return Err(ApiError::Authentication);
  };

  if !verify_password(credentials.password, identity.password_hash.clone()).await? {
    tracing::debug!(identity = %identity.identity_id, "login with wrong password");
    return Err(ApiError::Authentication);
  }

  let token = state.sessions.issue(&identity, Utc::now())?;
  Ok(Json(LoggedIn { success: true, token }))
}

// ─── Current ──────────────────────────────────────────────────────────────────

/// `GET /users/current`
pub async fn current(caller: Caller) -> Json<PublicIdentity> { Json(caller.0.public()) }
