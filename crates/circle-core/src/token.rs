//! Session tokens: `header.payload.signature`, each segment base64url without
//! padding, signed with HMAC-SHA256 (the JWT `HS256` shape).
//!
//! The server mints and verifies tokens with a [`TokenKey`]. Clients only ever
//! call [`decode_unverified`], which reads the claims for display and local
//! expiry decisions without checking the signature.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as B64};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

use crate::identity::Identity;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
  #[error("token is malformed")]
  Malformed,

  #[error("unsupported token algorithm: {0:?}")]
  UnsupportedAlgorithm(String),

  #[error("token signature does not match")]
  BadSignature,

  #[error("token expired at {0}")]
  Expired(i64),

  #[error("signing key must not be empty")]
  EmptyKey,

  #[error("could not encode token: {0}")]
  Encode(String),
}

#[derive(Debug, Deserialize)]
struct Header {
  alg: String,
}

const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// The payload carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// Identity id.
  pub id:     Uuid,
  pub name:   String,
  pub avatar: String,
  /// Issued-at, unix seconds.
  pub iat:    i64,
  /// Absolute expiry, unix seconds.
  pub exp:    i64,
}

impl Claims {
  pub fn for_identity(identity: &Identity, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
    Self {
      id:     identity.identity_id,
      name:   identity.name.clone(),
      avatar: identity.avatar.clone(),
      iat:    issued_at.timestamp(),
      exp:    (issued_at + ttl).timestamp(),
    }
  }

  /// A token is expired from its `exp` second onwards.
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool { now.timestamp() >= self.exp }

  pub fn expires_at(&self) -> Option<DateTime<Utc>> { DateTime::from_timestamp(self.exp, 0) }
}

/// Server-held HMAC key.
#[derive(Clone)]
pub struct TokenKey {
  mac: HmacSha256,
}

impl std::fmt::Debug for TokenKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("TokenKey(..)")
  }
}

impl TokenKey {
  pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
    let secret = secret.into();
    if secret.is_empty() {
      return Err(TokenError::EmptyKey);
    }
    let mac = <HmacSha256 as Mac>::new_from_slice(&secret).map_err(|_| TokenError::EmptyKey)?;
    Ok(Self { mac })
  }

  /// Encode and sign `claims`.
  pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
    let payload_json =
      serde_json::to_vec(claims).map_err(|e| TokenError::Encode(e.to_string()))?;

    let signing_input = format!("{}.{}", B64.encode(HEADER_JSON), B64.encode(payload_json));
    let mut mac = self.mac.clone();
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!("{signing_input}.{}", B64.encode(signature)))
  }

  /// Check the algorithm, signature, payload shape and expiry, in that order.
  pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
    let (header_b64, payload_b64, signature_b64) = split(token)?;

    let header: Header = decode_segment(header_b64)?;
    if header.alg != ALGORITHM {
      return Err(TokenError::UnsupportedAlgorithm(header.alg));
    }

    let signature = B64.decode(signature_b64).map_err(|_| TokenError::Malformed)?;
    let mut mac = self.mac.clone();
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());
    mac
      .verify_slice(&signature)
      .map_err(|_| TokenError::BadSignature)?;

    let claims: Claims = decode_segment(payload_b64)?;
    if claims.is_expired_at(now) {
      return Err(TokenError::Expired(claims.exp));
    }
    Ok(claims)
  }
}

/// Read the claims without checking the signature or expiry.
pub fn decode_unverified(token: &str) -> Result<Claims, TokenError> {
  let (_, payload_b64, _) = split(token)?;
  decode_segment(payload_b64)
}

fn split(token: &str) -> Result<(&str, &str, &str), TokenError> {
  let mut parts = token.split('.');
  match (parts.next(), parts.next(), parts.next(), parts.next()) {
    (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() && !s.is_empty() => {
      Ok((h, p, s))
    }
    _ => Err(TokenError::Malformed),
  }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
  let bytes = B64.decode(segment).map_err(|_| TokenError::Malformed)?;
  serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}
