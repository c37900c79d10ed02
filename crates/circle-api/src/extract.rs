//! Request extractors shared by the handlers.

use axum::extract::FromRequest;
use uuid::Uuid;

use crate::error::ApiError;

/// `axum::Json`, but a bad body becomes a 400 `{"body": "..."}` instead of
/// axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Parse a path id. Anything that is not a UUID cannot name a record, so it
/// is reported as not found under `field`.
pub fn parse_id(raw: &str, field: &str, message: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::not_found(field, message))
}
