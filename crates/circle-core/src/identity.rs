//! Identity — a registered user account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A registered account. The password hash never leaves the server; use
/// [`Identity::public`] or [`Identity::summary`] for anything sent to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub identity_id:   Uuid,
  pub name:          String,
  /// Trimmed, lower-cased; unique across identities.
  pub email:         String,
  pub avatar:        String,
  /// argon2 PHC string.
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::SocialStore::create_identity`].
/// The id and creation timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub name:          String,
  pub email:         String,
  pub avatar:        String,
  pub password_hash: String,
}

/// What the account owner sees about themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
  pub id:         Uuid,
  pub name:       String,
  pub email:      String,
  pub avatar:     String,
  pub created_at: DateTime<Utc>,
}

/// What everyone else sees; joined into profile views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub id:     Uuid,
  pub name:   String,
  pub avatar: String,
}

impl Identity {
  pub fn public(&self) -> PublicIdentity {
    PublicIdentity {
      id:         self.identity_id,
      name:       self.name.clone(),
      email:      self.email.clone(),
      avatar:     self.avatar.clone(),
      created_at: self.created_at,
    }
  }

  pub fn summary(&self) -> UserSummary {
    UserSummary {
      id:     self.identity_id,
      name:   self.name.clone(),
      avatar: self.avatar.clone(),
    }
  }
}

/// Gravatar URL for `email`: 200px, PG-rated, mystery-person fallback.
pub fn gravatar_url(email: &str) -> String {
  let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
  format!(
    "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
    hex::encode(digest)
  )
}
