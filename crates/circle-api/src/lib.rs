//! JSON REST API for Circle.
//!
//! Exposes an axum [`Router`] backed by any [`circle_core::store::SocialStore`].
//! Transport, TLS and process concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", circle_api::api_router(state.clone()))
//! ```

pub mod auth;
pub mod error;
pub mod extract;
pub mod posts;
pub mod profile;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use circle_core::store::SocialStore;

pub use auth::{Caller, Sessions};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S: SocialStore> {
  pub store:    Arc<S>,
  pub sessions: Arc<Sessions>,
}

impl<S: SocialStore> AppState<S> {
  pub fn new(store: S, sessions: Sessions) -> Self {
    Self { store: Arc::new(store), sessions: Arc::new(sessions) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: SocialStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Users
    .route("/users/register", post(users::register::<S>))
    .route("/users/login", post(users::login::<S>))
    .route("/users/current", get(users::current))
    // Posts
    .route("/posts", get(posts::list::<S>).post(posts::create::<S>))
    .route("/posts/{id}", get(posts::get_one::<S>).delete(posts::delete_one::<S>))
    .route("/posts/like/{id}", post(posts::like::<S>))
    .route("/posts/unlike/{id}", post(posts::unlike::<S>))
    .route("/posts/comment/{id}", post(posts::comment::<S>))
    .route("/posts/comment/{id}/{comment_id}", delete(posts::uncomment::<S>))
    // Profiles
    .route(
      "/profile",
      get(profile::current::<S>)
        .post(profile::upsert::<S>)
        .delete(profile::delete_account::<S>),
    )
    .route("/profile/all", get(profile::list::<S>))
    .route("/profile/handle/{handle}", get(profile::by_handle::<S>))
    .route("/profile/user/{user_id}", get(profile::by_user::<S>))
    .route("/profile/experience", post(profile::add_experience::<S>))
    .route("/profile/experience/{id}", delete(profile::remove_experience::<S>))
    .route("/profile/education", post(profile::add_education::<S>))
    .route("/profile/education/{id}", delete(profile::remove_education::<S>))
    .with_state(state)
}
