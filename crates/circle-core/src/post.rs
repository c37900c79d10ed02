//! Post records and the mutations applied to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  entries::{Entry, EntryList},
};

// ─── Likes ───────────────────────────────────────────────────────────────────

/// One identity's like; at most one per identity per post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
  pub user_id: Uuid,
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  /// The commenting identity.
  pub user_id:    Uuid,
  pub text:       String,
  pub name:       String,
  pub avatar:     String,
  pub created_at: DateTime<Utc>,
}

impl Entry for Comment {
  fn entry_id(&self) -> Uuid { self.comment_id }
}

/// Author-supplied content for a post or a comment. Name and avatar come from
/// the caller's session, not from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewText {
  pub text:   String,
  pub name:   String,
  pub avatar: String,
}

// ─── Post ────────────────────────────────────────────────────────────────────

/// A post, owned by exactly one identity, with its likes and comments
/// embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub post_id:    Uuid,
  pub owner_id:   Uuid,
  pub text:       String,
  pub name:       String,
  pub avatar:     String,
  pub likes:      Vec<Like>,
  pub comments:   EntryList<Comment>,
  pub created_at: DateTime<Utc>,
}

impl Post {
  pub fn new(owner_id: Uuid, content: NewText, now: DateTime<Utc>) -> Self {
    Self {
      post_id: Uuid::new_v4(),
      owner_id,
      text: content.text,
      name: content.name,
      avatar: content.avatar,
      likes: Vec::new(),
      comments: EntryList::new(),
      created_at: now,
    }
  }

  /// Fails with [`Error::NotOwner`] unless `caller` owns this post.
  pub fn ensure_owned_by(&self, caller: Uuid) -> Result<()> {
    if self.owner_id == caller {
      Ok(())
    } else {
      Err(Error::NotOwner { caller })
    }
  }

  pub fn is_liked_by(&self, user_id: Uuid) -> bool {
    self.likes.iter().any(|l| l.user_id == user_id)
  }

  pub fn like(&mut self, user_id: Uuid) -> Result<()> {
    if self.is_liked_by(user_id) {
      return Err(Error::AlreadyLiked { post: self.post_id, user: user_id });
    }
    self.likes.push(Like { user_id });
    Ok(())
  }

  pub fn unlike(&mut self, user_id: Uuid) -> Result<()> {
    let before = self.likes.len();
    self.likes.retain(|l| l.user_id != user_id);
    if self.likes.len() == before {
      return Err(Error::NotLiked { post: self.post_id, user: user_id });
    }
    Ok(())
  }

  /// Add a comment at the front of the comment list.
  pub fn add_comment(
    &mut self,
    user_id: Uuid,
    content: NewText,
    now: DateTime<Utc>,
  ) -> &Comment {
    self.comments.push_front(Comment {
      comment_id: Uuid::new_v4(),
      user_id,
      text: content.text,
      name: content.name,
      avatar: content.avatar,
      created_at: now,
    })
  }

  /// Remove a comment written by `caller`.
  ///
  /// A missing comment is reported before authorship is considered; on any
  /// error the comment list is left unchanged.
  pub fn remove_comment(&mut self, comment_id: Uuid, caller: Uuid) -> Result<Comment> {
    let comment = self
      .comments
      .get(comment_id)
      .ok_or(Error::CommentNotFound(comment_id))?;
    if comment.user_id != caller {
      return Err(Error::NotOwner { caller });
    }
    self
      .comments
      .remove(comment_id)
      .ok_or(Error::CommentNotFound(comment_id))
  }
}
