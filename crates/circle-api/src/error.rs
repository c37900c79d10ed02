//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body is a flat `{"field": "message"}` JSON object.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use circle_core::FieldErrors;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing or malformed input; 400 with one message per field.
  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  /// Wrong email or password. Deliberately does not say which.
  #[error("invalid credentials")]
  Authentication,

  /// Missing, malformed, mis-signed or expired session token.
  #[error("unauthorized: {0}")]
  Unauthorized(String),

  /// Authenticated, but not the owner of the record.
  #[error("caller does not own the record")]
  NotOwner,

  #[error("not found: {0}")]
  NotFound(FieldErrors),

  /// Duplicate handle, duplicate email, double like, unlike without like.
  #[error("conflict: {0}")]
  Conflict(FieldErrors),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self { Self::Store(Box::new(e)) }

  pub fn not_found(field: &str, message: &str) -> Self {
    Self::NotFound(FieldErrors::single(field, message))
  }

  pub fn conflict(field: &str, message: &str) -> Self {
    Self::Conflict(FieldErrors::single(field, message))
  }
}

impl From<circle_core::Error> for ApiError {
  fn from(e: circle_core::Error) -> Self {
    use circle_core::Error as E;
    match e {
      E::AlreadyLiked { .. } => Self::conflict("alreadyliked", "User already liked this post"),
      E::NotLiked { .. } => Self::conflict("notliked", "You have not yet liked this post"),
      E::CommentNotFound(_) => Self::not_found("commentnotexist", "Comment does not exist"),
      E::ExperienceNotFound(_) => {
        Self::not_found("experiencenotfound", "Specified experience not found")
      }
      E::EducationNotFound(_) => {
        Self::not_found("educationnotfound", "Specified education not found")
      }
      E::NotOwner { .. } => Self::NotOwner,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::Validation(FieldErrors::single("body", rejection.body_text()))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, errors),
      ApiError::Authentication => (
        StatusCode::BAD_REQUEST,
        FieldErrors::single("credentials", "Email or password is incorrect"),
      ),
      ApiError::Unauthorized(reason) => {
        tracing::debug!(%reason, "rejected session token");
        (
          StatusCode::UNAUTHORIZED,
          FieldErrors::single("unauthorized", "Missing, invalid or expired token"),
        )
      }
      ApiError::NotOwner => (
        StatusCode::UNAUTHORIZED,
        FieldErrors::single("notauthorized", "User not authorized"),
      ),
      ApiError::NotFound(errors) => (StatusCode::NOT_FOUND, errors),
      ApiError::Conflict(errors) => (StatusCode::BAD_REQUEST, errors),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          FieldErrors::single("server", "Internal server error"),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}
