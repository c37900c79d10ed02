//! The `SocialStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `circle-store-sqlite`).
//! Higher layers (`circle-api`, `circle-server`) depend on this abstraction,
//! not on any concrete backend.
//!
//! Profiles and posts are whole documents: callers load one, mutate it in
//! memory, and hand the whole record back to `save_*`. A single save is the
//! only atomicity the store promises; nothing spans two records.

use std::future::Future;

use uuid::Uuid;

use crate::{
  identity::{Identity, NewIdentity},
  post::Post,
  profile::Profile,
};

/// Abstraction over a Circle store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SocialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Identities ────────────────────────────────────────────────────────

  /// Persist a new identity. Fails if the email is already registered.
  fn create_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  fn get_identity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Look up an identity by its (already normalised) email.
  fn find_identity_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  /// Returns `true` if an identity was removed.
  fn delete_identity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  fn find_profile_by_owner(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn find_profile_by_handle<'a>(
    &'a self,
    handle: &'a str,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Insert or replace the profile with `profile.profile_id`.
  ///
  /// Fails if another profile already holds the same handle or owner.
  fn save_profile<'a>(
    &'a self,
    profile: &'a Profile,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Returns `true` if a profile was removed.
  fn delete_profile_by_owner(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// All posts, newest first.
  fn list_posts(&self) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Insert or replace the post with `post.post_id`.
  fn save_post<'a>(
    &'a self,
    post: &'a Post,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Returns `true` if a post was removed.
  fn delete_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
