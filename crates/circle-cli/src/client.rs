//! Async HTTP client wrapping the Circle JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use circle_core::{
  FieldErrors,
  form::{EducationForm, ExperienceForm, LoginForm, ProfileForm, RegisterForm, TextForm},
  identity::PublicIdentity,
  post::Post,
  profile::ProfileView,
};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

#[derive(Deserialize)]
struct Registered {
  user: PublicIdentity,
}

#[derive(Deserialize)]
struct LoggedIn {
  token: String,
}

#[derive(Deserialize)]
struct Success {
  success: bool,
}

/// Async HTTP client for the Circle JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
  token:    Option<String>,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into(), token })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  /// Build `/api/<segments>` under the base URL, percent-encoding each
  /// segment so user-supplied values stay within one path component.
  fn endpoint(&self, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(&self.base_url)
      .with_context(|| format!("invalid server url {}", self.base_url))?;
    url
      .path_segments_mut()
      .map_err(|()| anyhow!("server url {} cannot have a path", self.base_url))?
      .pop_if_empty()
      .push("api")
      .extend(segments);
    Ok(url)
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self.authed(self.client.request(method, self.url(path)))
  }

  fn authed(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  /// Send `req` and decode a JSON success body. Error bodies are the server's
  /// field-keyed maps and are folded into the returned error.
  async fn call<T: DeserializeOwned>(&self, label: &str, req: RequestBuilder) -> Result<T> {
    let resp = req.send().await.with_context(|| format!("{label} failed"))?;
    let resp = check(label, resp).await?;
    resp
      .json()
      .await
      .with_context(|| format!("deserialising {label} response"))
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    self
      .call(&format!("GET {path}"), self.request(Method::GET, path))
      .await
  }

  async fn post<T: DeserializeOwned>(&self, path: &str, body: &impl serde::Serialize) -> Result<T> {
    self
      .call(&format!("POST {path}"), self.request(Method::POST, path).json(body))
      .await
  }

  async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    self
      .call(&format!("POST {path}"), self.request(Method::POST, path))
      .await
  }

  async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    self
      .call(&format!("DELETE {path}"), self.request(Method::DELETE, path))
      .await
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `POST /api/users/register`
  pub async fn register(&self, form: &RegisterForm) -> Result<PublicIdentity> {
    let registered: Registered = self.post("/users/register", form).await?;
    Ok(registered.user)
  }

  /// `POST /api/users/login`; returns the bare token.
  pub async fn login(&self, form: &LoginForm) -> Result<String> {
    let logged_in: LoggedIn = self.post("/users/login", form).await?;
    Ok(logged_in.token)
  }

  /// `GET /api/users/current`
  pub async fn current_user(&self) -> Result<PublicIdentity> { self.get("/users/current").await }

  // ── Posts ─────────────────────────────────────────────────────────────────

  pub async fn list_posts(&self) -> Result<Vec<Post>> { self.get("/posts").await }

  pub async fn get_post(&self, id: Uuid) -> Result<Post> { self.get(&format!("/posts/{id}")).await }

  pub async fn create_post(&self, text: String) -> Result<Post> {
    self.post("/posts", &TextForm { text: Some(text) }).await
  }

  pub async fn delete_post(&self, id: Uuid) -> Result<()> {
    let done: Success = self.delete(&format!("/posts/{id}")).await?;
    ensure_success(done)
  }

  pub async fn like(&self, id: Uuid) -> Result<Post> {
    self.post_empty(&format!("/posts/like/{id}")).await
  }

  pub async fn unlike(&self, id: Uuid) -> Result<Post> {
    self.post_empty(&format!("/posts/unlike/{id}")).await
  }

  pub async fn comment(&self, id: Uuid, text: String) -> Result<Post> {
    self
      .post(&format!("/posts/comment/{id}"), &TextForm { text: Some(text) })
      .await
  }

  pub async fn uncomment(&self, id: Uuid, comment_id: Uuid) -> Result<Post> {
    self.delete(&format!("/posts/comment/{id}/{comment_id}")).await
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  pub async fn my_profile(&self) -> Result<ProfileView> { self.get("/profile").await }

  pub async fn profile_by_handle(&self, handle: &str) -> Result<ProfileView> {
    let url = self.endpoint(&["profile", "handle", handle])?;
    self
      .call(
        &format!("GET /profile/handle/{handle}"),
        self.authed(self.client.get(url)),
      )
      .await
  }

  pub async fn profile_by_user(&self, user_id: Uuid) -> Result<ProfileView> {
    self.get(&format!("/profile/user/{user_id}")).await
  }

  pub async fn all_profiles(&self) -> Result<Vec<ProfileView>> { self.get("/profile/all").await }

  pub async fn upsert_profile(&self, form: &ProfileForm) -> Result<ProfileView> {
    self.post("/profile", form).await
  }

  pub async fn add_experience(&self, form: &ExperienceForm) -> Result<ProfileView> {
    self.post("/profile/experience", form).await
  }

  pub async fn add_education(&self, form: &EducationForm) -> Result<ProfileView> {
    self.post("/profile/education", form).await
  }

  pub async fn remove_experience(&self, id: Uuid) -> Result<ProfileView> {
    self.delete(&format!("/profile/experience/{id}")).await
  }

  pub async fn remove_education(&self, id: Uuid) -> Result<ProfileView> {
    self.delete(&format!("/profile/education/{id}")).await
  }

  /// `DELETE /api/profile`: removes the profile and the account.
  pub async fn delete_account(&self) -> Result<()> {
    let done: Success = self.delete("/profile").await?;
    ensure_success(done)
  }
}

async fn check(label: &str, resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  match serde_json::from_str::<FieldErrors>(&body) {
    Ok(errors) if !errors.is_empty() => Err(anyhow!("{label} → {status}: {errors}")),
    _ => Err(anyhow!("{label} → {status}")),
  }
}

fn ensure_success(done: Success) -> Result<()> {
  if done.success { Ok(()) } else { Err(anyhow!("server did not confirm the deletion")) }
}
