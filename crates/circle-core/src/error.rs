//! Error types for `circle-core`.

use thiserror::Error;
use uuid::Uuid;

/// A rejected mutation of a profile or post record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("user {user} already liked post {post}")]
  AlreadyLiked { post: Uuid, user: Uuid },

  #[error("user {user} has not liked post {post}")]
  NotLiked { post: Uuid, user: Uuid },

  #[error("comment not found: {0}")]
  CommentNotFound(Uuid),

  #[error("experience entry not found: {0}")]
  ExperienceNotFound(Uuid),

  #[error("education entry not found: {0}")]
  EducationNotFound(Uuid),

  /// The caller is authenticated but does not own the record.
  #[error("user {caller} does not own this record")]
  NotOwner { caller: Uuid },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
