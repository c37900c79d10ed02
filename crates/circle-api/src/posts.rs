//! Handlers for `/posts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | Newest first |
//! | `GET`    | `/posts/{id}` | 404 if not found |
//! | `POST`   | `/posts` | Auth; body: `{"text": "..."}` |
//! | `DELETE` | `/posts/{id}` | Auth; owner only |
//! | `POST`   | `/posts/like/{id}` | Auth; 400 if already liked |
//! | `POST`   | `/posts/unlike/{id}` | Auth; 400 if not liked |
//! | `POST`   | `/posts/comment/{id}` | Auth; body: `{"text": "..."}` |
//! | `DELETE` | `/posts/comment/{id}/{comment_id}` | Auth; comment author only |
//!
//! Every mutation is load, change in memory, save. Two concurrent mutations
//! of the same post are last-writer-wins.

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::Utc;
use circle_core::{form::TextForm, post::Post, store::SocialStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  auth::Caller,
  error::ApiError,
  extract::{JsonBody, parse_id},
};

/// `{"success": true}`, returned by deletions.
#[derive(Debug, Serialize, Deserialize)]
pub struct Success {
  pub success: bool,
}

fn post_not_found() -> ApiError { ApiError::not_found("postnotfound", "No post found") }

async fn load<S>(state: &AppState<S>, raw_id: &str) -> Result<Post, ApiError>
where
  S: SocialStore,
{
  let id: Uuid = parse_id(raw_id, "postnotfound", "No post found")?;
  state
    .store
    .get_post(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(post_not_found)
}

async fn save<S>(state: &AppState<S>, post: Post) -> Result<Json<Post>, ApiError>
where
  S: SocialStore,
{
  state.store.save_post(&post).await.map_err(ApiError::store)?;
  Ok(Json(post))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /posts`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<Post>>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let posts = state.store.list_posts().await.map_err(ApiError::store)?;
  Ok(Json(posts))
}

/// `GET /posts/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Post>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  load(&state, &id).await.map(Json)
}

// ─── Create / delete ──────────────────────────────────────────────────────────

/// `POST /posts`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  JsonBody(form): JsonBody<TextForm>,
) -> Result<Json<Post>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let content = form
    .validate(caller.name(), caller.avatar())
    .map_err(ApiError::Validation)?;
  let post = Post::new(caller.id(), content, Utc::now());
  tracing::debug!(post = %post.post_id, owner = %caller.id(), "creating post");
  save(&state, post).await
}

/// `DELETE /posts/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<Json<Success>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let post = load(&state, &id).await?;
  if let Err(e) = post.ensure_owned_by(caller.id()) {
    tracing::warn!(post = %post.post_id, caller = %caller.id(), "refused to delete post");
    return Err(e.into());
  }
  if !state.store.delete_post(post.post_id).await.map_err(ApiError::store)? {
    return Err(post_not_found());
  }
  Ok(Json(Success { success: true }))
}

// ─── Likes ────────────────────────────────────────────────────────────────────

/// `POST /posts/like/{id}`
pub async fn like<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<Json<Post>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let mut post = load(&state, &id).await?;
  post.like(caller.id())?;
  save(&state, post).await
}

/// `POST /posts/unlike/{id}`
pub async fn unlike<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<Json<Post>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let mut post = load(&state, &id).await?;
  post.unlike(caller.id())?;
  save(&state, post).await
}

// ─── Comments ─────────────────────────────────────────────────────────────────

/// `POST /posts/comment/{id}`
pub async fn comment<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<String>,
  JsonBody(form): JsonBody<TextForm>,
) -> Result<Json<Post>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let content = form
    .validate(caller.name(), caller.avatar())
    .map_err(ApiError::Validation)?;
  let mut post = load(&state, &id).await?;
  post.add_comment(caller.id(), content, Utc::now());
  save(&state, post).await
}

/// `DELETE /posts/comment/{id}/{comment_id}`
pub async fn uncomment<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Post>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let mut post = load(&state, &id).await?;
  let comment_id = parse_id(&comment_id, "commentnotexist", "Comment does not exist")?;
  post.remove_comment(comment_id, caller.id())?;
  save(&state, post).await
}
