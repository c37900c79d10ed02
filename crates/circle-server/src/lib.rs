//! HTTP server assembly for Circle.
//!
//! Mounts the JSON API under `/api`, adds a plain-text home route, and wraps
//! everything in a request trace layer. The binary in `main.rs` only loads
//! configuration and binds a listener.

use std::path::PathBuf;

use anyhow::Context as _;
use axum::{Router, routing::get};
use circle_api::{AppState, Sessions, api_router};
use circle_core::{store::SocialStore, token::TokenKey};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CIRCLE_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// HMAC key for session tokens. Generate one with `--generate-secret`.
  pub token_secret:   String,
  #[serde(default = "default_token_ttl_secs")]
  pub token_ttl_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("circle.db") }

fn default_token_ttl_secs() -> u64 { 3600 }

/// One year.
const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

impl ServerConfig {
  /// Token signing key and lifetime derived from this configuration.
  pub fn sessions(&self) -> anyhow::Result<Sessions> {
    anyhow::ensure!(
      (1..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs),
      "token_ttl_secs must be between 1 and {MAX_TOKEN_TTL_SECS}, got {}",
      self.token_ttl_secs
    );
    let key = TokenKey::new(self.token_secret.as_bytes()).context("invalid token_secret")?;
    let ttl = chrono::Duration::seconds(self.token_ttl_secs as i64);
    Ok(Sessions::new(key, ttl))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn app<S>(state: AppState<S>) -> Router
where
  S: SocialStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(home))
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn home() -> &'static str { "Circle API" }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::Utc;
  use circle_core::token::{Claims, decode_unverified};
  use circle_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  const SECRET: &str = "integration-test-secret";

  async fn make_app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let config = ServerConfig {
      host:           "127.0.0.1".to_string(),
      port:           5000,
      store_path:     PathBuf::from(":memory:"),
      token_secret:   SECRET.to_string(),
      token_ttl_secs: 3600,
    };
    app(AppState::new(store, config.sessions().unwrap()))
  }

  #[test]
  fn token_ttl_must_be_positive_and_bounded() {
    let mut config = ServerConfig {
      host:           default_host(),
      port:           default_port(),
      store_path:     default_store_path(),
      token_secret:   SECRET.to_string(),
      token_ttl_secs: 0,
    };
    assert!(config.sessions().is_err());
    config.token_ttl_secs = MAX_TOKEN_TTL_SECS + 1;
    assert!(config.sessions().is_err());
    config.token_ttl_secs = 60;
    assert_eq!(config.sessions().unwrap().ttl(), chrono::Duration::seconds(60));
    config.token_secret = String::new();
    assert!(config.sessions().is_err());
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
  }

  /// Register and log in; returns the identity id and a bearer token.
  async fn sign_up(app: &Router, name: &str, email: &str) -> (Uuid, String) {
    let (status, body) = send(
      app,
      "POST",
      "/api/users/register",
      None,
      Some(json!({
        "name": name, "email": email, "password": "secret123", "password2": "secret123"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();

    let (status, body) = send(
      app,
      "POST",
      "/api/users/login",
      None,
      Some(json!({ "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    (id, body["token"].as_str().unwrap().to_string())
  }

  fn profile_body(handle: &str) -> Value {
    json!({ "handle": handle, "status": "Developer", "skills": "rust, sql" })
  }

  // ── Users ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn home_route_responds() {
    let app = make_app().await;
    let (status, body) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Circle API".into()));
  }

  #[tokio::test]
  async fn register_then_login_yields_token_for_that_identity() {
    let app = make_app().await;
    let (id, token) = sign_up(&app, "Alice", "Alice@Example.com").await;

    let claims = decode_unverified(&token).unwrap();
    assert_eq!(claims.id, id);
    assert_eq!(claims.name, "Alice");
    assert_eq!(claims.exp - claims.iat, 3600);

    let (status, me) = send(&app, "GET", "/api/users/current", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], json!(id.to_string()));
    assert_eq!(me["email"], "alice@example.com");
    assert!(me.get("password_hash").is_none());
  }

  #[tokio::test]
  async fn register_reports_every_invalid_field() {
    let app = make_app().await;
    let (status, body) = send(
      &app,
      "POST",
      "/api/users/register",
      None,
      Some(json!({ "name": "A", "email": "nope", "password": "123", "password2": "456" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["name", "email", "password", "password2"] {
      assert!(body.get(field).is_some(), "missing {field} in {body}");
    }
  }

  #[tokio::test]
  async fn duplicate_email_is_a_conflict() {
    let app = make_app().await;
    sign_up(&app, "Alice", "alice@example.com").await;
    let (status, body) = send(
      &app,
      "POST",
      "/api/users/register",
      None,
      Some(json!({
        "name": "Other", "email": "ALICE@example.com", "password": "secret123", "password2": "secret123"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "email": "Email already exists" }));
  }

  #[tokio::test]
  async fn login_failures_are_indistinguishable() {
    let app = make_app().await;
    sign_up(&app, "Alice", "alice@example.com").await;

    let wrong_password = send(
      &app,
      "POST",
      "/api/users/login",
      None,
      Some(json!({ "email": "alice@example.com", "password": "not-it" })),
    )
    .await;
    let unknown_email = send(
      &app,
      "POST",
      "/api/users/login",
      None,
      Some(json!({ "email": "bob@example.com", "password": "secret123" })),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.1, json!({ "credentials": "Email or password is incorrect" }));
  }

  #[tokio::test]
  async fn expired_token_is_rejected() {
    let app = make_app().await;
    let (id, _) = sign_up(&app, "Alice", "alice@example.com").await;

    let now = Utc::now().timestamp();
    let stale = TokenKey::new(SECRET)
      .unwrap()
      .sign(&Claims {
        id,
        name: "Alice".into(),
        avatar: String::new(),
        iat: now - 7200,
        exp: now - 3600,
      })
      .unwrap();

    let (status, body) = send(&app, "GET", "/api/users/current", Some(&stale), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("unauthorized").is_some());
  }

  #[tokio::test]
  async fn protected_routes_require_a_token() {
    let app = make_app().await;
    for (method, uri) in [
      ("GET", "/api/users/current"),
      ("POST", "/api/posts"),
      ("GET", "/api/profile"),
      ("DELETE", "/api/profile"),
    ] {
      let (status, _) = send(&app, method, uri, None, Some(json!({}))).await;
      assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
    let (status, _) = send(&app, "GET", "/api/users/current", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn malformed_json_body_is_a_validation_error() {
    let app = make_app().await;
    let req = Request::builder()
      .method("POST")
      .uri("/api/users/login")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Posts ───────────────────────────────────────────────────────────────────

  async fn create_post(app: &Router, token: &str, text: &str) -> Value {
    let (status, post) =
      send(app, "POST", "/api/posts", Some(token), Some(json!({ "text": text }))).await;
    assert_eq!(status, StatusCode::OK, "{post}");
    post
  }

  #[tokio::test]
  async fn posts_are_listed_newest_first() {
    let app = make_app().await;
    let (_, token) = sign_up(&app, "Alice", "alice@example.com").await;
    let first = create_post(&app, &token, "the very first post").await;
    let second = create_post(&app, &token, "the second post here").await;

    assert_eq!(first["name"], "Alice");
    let (status, posts) = send(&app, "GET", "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&Value> = posts.as_array().unwrap().iter().map(|p| &p["post_id"]).collect();
    assert_eq!(ids, vec![&second["post_id"], &first["post_id"]]);
  }

  #[tokio::test]
  async fn short_post_is_rejected() {
    let app = make_app().await;
    let (_, token) = sign_up(&app, "Alice", "alice@example.com").await;
    let (status, body) =
      send(&app, "POST", "/api/posts", Some(&token), Some(json!({ "text": "short" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("text").is_some());
  }

  #[tokio::test]
  async fn missing_post_is_not_found() {
    let app = make_app().await;
    let (status, body) = send(&app, "GET", &format!("/api/posts/{}", Uuid::new_v4()), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "postnotfound": "No post found" }));

    let (status, _) = send(&app, "GET", "/api/posts/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn liking_twice_is_rejected_and_count_is_unchanged() {
    let app = make_app().await;
    let (_, token) = sign_up(&app, "Alice", "alice@example.com").await;
    let post = create_post(&app, &token, "a post worth liking").await;
    let uri = format!("/api/posts/like/{}", post["post_id"].as_str().unwrap());

    let (status, liked) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["likes"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "alreadyliked": "User already liked this post" }));

    let (_, stored) =
      send(&app, "GET", &format!("/api/posts/{}", post["post_id"].as_str().unwrap()), None, None).await;
    assert_eq!(stored["likes"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn unliking_without_a_like_is_rejected() {
    let app = make_app().await;
    let (_, token) = sign_up(&app, "Alice", "alice@example.com").await;
    let post = create_post(&app, &token, "a post nobody liked").await;
    let id = post["post_id"].as_str().unwrap();

    let (status, body) = send(&app, "POST", &format!("/api/posts/unlike/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("notliked").is_some());

    send(&app, "POST", &format!("/api/posts/like/{id}"), Some(&token), None).await;
    let (status, unliked) =
      send(&app, "POST", &format!("/api/posts/unlike/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(unliked["likes"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn only_the_owner_may_delete_a_post() {
    let app = make_app().await;
    let (_, alice) = sign_up(&app, "Alice", "alice@example.com").await;
    let (_, bob) = sign_up(&app, "Bob", "bob@example.com").await;
    let post = create_post(&app, &alice, "alice wrote this one").await;
    let uri = format!("/api/posts/{}", post["post_id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "notauthorized": "User not authorized" }));

    let (status, body) = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn deleting_a_comment_removes_exactly_that_one() {
    let app = make_app().await;
    let (_, alice) = sign_up(&app, "Alice", "alice@example.com").await;
    let (_, bob) = sign_up(&app, "Bob", "bob@example.com").await;
    let post = create_post(&app, &alice, "please comment on this").await;
    let post_id = post["post_id"].as_str().unwrap().to_string();
    let comment_uri = format!("/api/posts/comment/{post_id}");

    for text in ["first comment text", "second comment text", "third comment text"] {
      let (status, _) = send(&app, "POST", &comment_uri, Some(&bob), Some(json!({ "text": text }))).await;
      assert_eq!(status, StatusCode::OK);
    }
    let (_, post) = send(&app, "GET", &format!("/api/posts/{post_id}"), None, None).await;
    let ids: Vec<String> = post["comments"]
      .as_array()
      .unwrap()
      .iter()
      .map(|c| c["comment_id"].as_str().unwrap().to_string())
      .collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(post["comments"][0]["name"], "Bob");

    // Not the author.
    let (status, _) =
      send(&app, "DELETE", &format!("{comment_uri}/{}", ids[1]), Some(&alice), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, updated) =
      send(&app, "DELETE", &format!("{comment_uri}/{}", ids[1]), Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    let remaining: Vec<&str> = updated["comments"]
      .as_array()
      .unwrap()
      .iter()
      .map(|c| c["comment_id"].as_str().unwrap())
      .collect();
    assert_eq!(remaining, vec![ids[0].as_str(), ids[2].as_str()]);

    let (status, body) =
      send(&app, "DELETE", &format!("{comment_uri}/{}", ids[1]), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "commentnotexist": "Comment does not exist" }));

    let (_, after) = send(&app, "GET", &format!("/api/posts/{post_id}"), None, None).await;
    assert_eq!(after["comments"].as_array().unwrap().len(), 2);
  }

  // ── Profiles ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn profile_upsert_creates_then_updates() {
    let app = make_app().await;
    let (id, token) = sign_up(&app, "Alice", "alice@example.com").await;

    let (status, _) = send(&app, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut body = profile_body("alice");
    body["company"] = json!("Acme");
    let (status, created) = send(&app, "POST", "/api/profile", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["skills"], json!(["rust", "sql"]));
    assert_eq!(created["user"]["id"], json!(id.to_string()));
    assert_eq!(created["user"]["name"], "Alice");

    let mut body = profile_body("alice2");
    body["website"] = json!("https://alice.dev");
    let (status, updated) = send(&app, "POST", "/api/profile", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["profile_id"], created["profile_id"]);
    assert_eq!(updated["handle"], "alice2");
    assert_eq!(updated["company"], "Acme");
    assert_eq!(updated["website"], "https://alice.dev");

    let (status, by_handle) = send(&app, "GET", "/api/profile/handle/alice2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_handle["profile_id"], created["profile_id"]);

    let (status, by_user) = send(&app, "GET", &format!("/api/profile/user/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_user["handle"], "alice2");
  }

  #[tokio::test]
  async fn duplicate_handle_is_rejected_and_nothing_is_stored() {
    let app = make_app().await;
    let (_, alice) = sign_up(&app, "Alice", "alice@example.com").await;
    let (_, bob) = sign_up(&app, "Bob", "bob@example.com").await;

    send(&app, "POST", "/api/profile", Some(&alice), Some(profile_body("taken"))).await;
    let (status, body) = send(&app, "POST", "/api/profile", Some(&bob), Some(profile_body("taken"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "handle": "That handle already exists" }));

    let (status, _) = send(&app, "GET", "/api/profile", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, all) = send(&app, "GET", "/api/profile/all", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn changing_handle_to_one_held_by_another_owner_is_rejected() {
    let app = make_app().await;
    let (_, alice) = sign_up(&app, "Alice", "alice@example.com").await;
    let (_, bob) = sign_up(&app, "Bob", "bob@example.com").await;

    send(&app, "POST", "/api/profile", Some(&alice), Some(profile_body("taken"))).await;
    let (status, _) = send(&app, "POST", "/api/profile", Some(&bob), Some(profile_body("bob"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/api/profile", Some(&bob), Some(profile_body("taken"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "handle": "That handle already exists" }));

    let (_, profile) = send(&app, "GET", "/api/profile", Some(&bob), None).await;
    assert_eq!(profile["handle"], "bob");
    let (_, held) = send(&app, "GET", "/api/profile/handle/taken", None, None).await;
    assert_eq!(held["user"]["name"], "Alice");
  }

  #[tokio::test]
  async fn profile_list_is_not_found_when_empty() {
    let app = make_app().await;
    let (status, body) = send(&app, "GET", "/api/profile/all", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("noprofile").is_some());
  }

  #[tokio::test]
  async fn experience_requires_a_profile() {
    let app = make_app().await;
    let (_, token) = sign_up(&app, "Alice", "alice@example.com").await;
    let (status, _) = send(
      &app,
      "POST",
      "/api/profile/experience",
      Some(&token),
      Some(json!({ "title": "Engineer", "company": "Acme", "from": "2020-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn removing_experience_and_education_drops_exactly_one() {
    let app = make_app().await;
    let (_, token) = sign_up(&app, "Alice", "alice@example.com").await;
    send(&app, "POST", "/api/profile", Some(&token), Some(profile_body("alice"))).await;

    for title in ["Engineer", "Lead"] {
      let (status, _) = send(
        &app,
        "POST",
        "/api/profile/experience",
        Some(&token),
        Some(json!({ "title": title, "company": "Acme", "from": "2020-01-01", "current": true })),
      )
      .await;
      assert_eq!(status, StatusCode::OK);
    }
    let (status, profile) = send(
      &app,
      "POST",
      "/api/profile/education",
      Some(&token),
      Some(json!({
        "school": "MIT", "degree": "BSc", "field_of_study": "CS", "from": "2014-09-01", "to": "2018-06-30"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let experience = profile["experience"].as_array().unwrap();
    assert_eq!(experience.len(), 2);
    assert_eq!(experience[0]["title"], "Lead");
    let target = experience[1]["experience_id"].as_str().unwrap().to_string();

    let uri = format!("/api/profile/experience/{target}");
    let (status, profile) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let experience = profile["experience"].as_array().unwrap();
    assert_eq!(experience.len(), 1);
    assert!(experience.iter().all(|e| e["experience_id"] != json!(target)));

    let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("experiencenotfound").is_some());

    let education_id = profile["education"][0]["education_id"].as_str().unwrap().to_string();
    let (status, profile) =
      send(&app, "DELETE", &format!("/api/profile/education/{education_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(profile["education"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn deleting_the_account_removes_profile_and_identity() {
    let app = make_app().await;
    let (_, token) = sign_up(&app, "Alice", "alice@example.com").await;
    send(&app, "POST", "/api/profile", Some(&token), Some(profile_body("alice"))).await;

    let (status, body) = send(&app, "DELETE", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = send(&app, "GET", "/api/profile/handle/alice", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/api/users/current", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
      &app,
      "POST",
      "/api/users/login",
      None,
      Some(json!({ "email": "alice@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn token_of_a_deleted_account_cannot_write() {
    let app = make_app().await;
    let (_, token) = sign_up(&app, "Alice", "alice@example.com").await;
    let (status, _) = send(&app, "DELETE", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
      send(&app, "POST", "/api/profile", Some(&token), Some(profile_body("alice"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("unauthorized").is_some());

    let (status, _) =
      send(&app, "POST", "/api/posts", Some(&token), Some(json!({ "text": "still here?" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/profile/all", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, posts) = send(&app, "GET", "/api/posts", None, None).await;
    assert!(posts.as_array().unwrap().is_empty());
  }
}
