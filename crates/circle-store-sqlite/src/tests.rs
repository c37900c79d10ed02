//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use circle_core::{
  identity::NewIdentity,
  post::{NewText, Post},
  profile::{Profile, ProfilePatch, Social},
  store::SocialStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_identity(email: &str) -> NewIdentity {
  NewIdentity {
    name:          "Alice".into(),
    email:         email.into(),
    avatar:        "https://www.gravatar.com/avatar/x".into(),
    password_hash: "$argon2id$v=19$placeholder".into(),
  }
}

fn patch(handle: &str) -> ProfilePatch {
  ProfilePatch {
    handle:          handle.into(),
    status:          "Developer".into(),
    skills:          vec!["rust".into()],
    company:         None,
    website:         None,
    location:        None,
    bio:             None,
    github_username: None,
    social:          Social::default(),
  }
}

fn text(t: &str) -> NewText {
  NewText { text: t.into(), name: "Alice".into(), avatar: "av".into() }
}

// ─── Identities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_identity() {
  let s = store().await;

  let created = s.create_identity(new_identity("alice@example.com")).await.unwrap();
  let fetched = s.get_identity(created.identity_id).await.unwrap();
  assert_eq!(fetched.as_ref().map(|i| i.identity_id), Some(created.identity_id));

  let by_email = s.find_identity_by_email("alice@example.com").await.unwrap().unwrap();
  assert_eq!(by_email.identity_id, created.identity_id);
  assert_eq!(by_email.password_hash, created.password_hash);
}

#[tokio::test]
async fn get_identity_missing_returns_none() {
  let s = store().await;
  assert!(s.get_identity(Uuid::new_v4()).await.unwrap().is_none());
  assert!(s.find_identity_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.create_identity(new_identity("alice@example.com")).await.unwrap();
  assert!(s.create_identity(new_identity("alice@example.com")).await.is_err());
}

#[tokio::test]
async fn delete_identity_reports_removal() {
  let s = store().await;
  let created = s.create_identity(new_identity("alice@example.com")).await.unwrap();
  assert!(s.delete_identity(created.identity_id).await.unwrap());
  assert!(!s.delete_identity(created.identity_id).await.unwrap());
  assert!(s.get_identity(created.identity_id).await.unwrap().is_none());
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_find_profile() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let profile = Profile::new(owner, patch("alice"), Utc::now());
  s.save_profile(&profile).await.unwrap();

  let by_owner = s.find_profile_by_owner(owner).await.unwrap().unwrap();
  assert_eq!(by_owner, profile);

  let by_handle = s.find_profile_by_handle("alice").await.unwrap().unwrap();
  assert_eq!(by_handle.profile_id, profile.profile_id);
}

#[tokio::test]
async fn save_profile_replaces_document_and_handle() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let mut profile = Profile::new(owner, patch("alice"), Utc::now());
  s.save_profile(&profile).await.unwrap();

  profile.apply(patch("alice-renamed"));
  s.save_profile(&profile).await.unwrap();

  assert!(s.find_profile_by_handle("alice").await.unwrap().is_none());
  let renamed = s.find_profile_by_handle("alice-renamed").await.unwrap().unwrap();
  assert_eq!(renamed.owner_id, owner);
  assert_eq!(s.list_profiles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_handle_is_rejected_by_the_store() {
  let s = store().await;
  s.save_profile(&Profile::new(Uuid::new_v4(), patch("alice"), Utc::now()))
    .await
    .unwrap();
  let clash = Profile::new(Uuid::new_v4(), patch("alice"), Utc::now());
  assert!(s.save_profile(&clash).await.is_err());
  assert_eq!(s.list_profiles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_profile_by_owner() {
  let s = store().await;
  let owner = Uuid::new_v4();
  s.save_profile(&Profile::new(owner, patch("alice"), Utc::now()))
    .await
    .unwrap();

  assert!(s.delete_profile_by_owner(owner).await.unwrap());
  assert!(s.find_profile_by_owner(owner).await.unwrap().is_none());
  assert!(!s.delete_profile_by_owner(owner).await.unwrap());
}

// ─── Posts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_posts_newest_first() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let now = Utc::now();
  let older = Post::new(owner, text("an older post"), now - Duration::minutes(5));
  let newer = Post::new(owner, text("a newer post"), now);

  // Insert out of order; listing sorts by creation time.
  s.save_post(&newer).await.unwrap();
  s.save_post(&older).await.unwrap();

  let ids: Vec<Uuid> = s.list_posts().await.unwrap().iter().map(|p| p.post_id).collect();
  assert_eq!(ids, vec![newer.post_id, older.post_id]);
}

#[tokio::test]
async fn save_post_persists_embedded_changes() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let mut post = Post::new(owner, text("a post to like"), Utc::now());
  s.save_post(&post).await.unwrap();

  let fan = Uuid::new_v4();
  post.like(fan).unwrap();
  post.add_comment(fan, text("nice post, thanks"), Utc::now());
  s.save_post(&post).await.unwrap();

  let stored = s.get_post(post.post_id).await.unwrap().unwrap();
  assert_eq!(stored, post);
  assert!(stored.is_liked_by(fan));
  assert_eq!(stored.comments.len(), 1);
  assert_eq!(s.list_posts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_post() {
  let s = store().await;
  let post = Post::new(Uuid::new_v4(), text("short lived post"), Utc::now());
  s.save_post(&post).await.unwrap();

  assert!(s.delete_post(post.post_id).await.unwrap());
  assert!(s.get_post(post.post_id).await.unwrap().is_none());
  assert!(!s.delete_post(post.post_id).await.unwrap());
}
