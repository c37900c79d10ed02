//! Handlers for `/profile` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/profile` | Auth; the caller's own profile |
//! | `POST`   | `/profile` | Auth; create or update |
//! | `DELETE` | `/profile` | Auth; removes the profile, then the identity |
//! | `GET`    | `/profile/all` | 404 if there are none |
//! | `GET`    | `/profile/handle/{handle}` | |
//! | `GET`    | `/profile/user/{user_id}` | |
//! | `POST`   | `/profile/experience` | Auth; 404 if the caller has no profile |
//! | `DELETE` | `/profile/experience/{id}` | Auth |
//! | `POST`   | `/profile/education` | Auth; 404 if the caller has no profile |
//! | `DELETE` | `/profile/education/{id}` | Auth |
//!
//! Read views join the owner's `{id, name, avatar}` as `user`.

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::Utc;
use circle_core::{
  form::{EducationForm, ExperienceForm, ProfileForm},
  profile::{Profile, ProfileView},
  store::SocialStore,
};
use uuid::Uuid;

use crate::{
  AppState,
  auth::Caller,
  error::ApiError,
  extract::{JsonBody, parse_id},
  posts::Success,
};

fn no_profile() -> ApiError {
  ApiError::not_found("noprofile", "There is no profile for this user")
}

async fn view<S>(state: &AppState<S>, profile: Profile) -> Result<ProfileView, ApiError>
where
  S: SocialStore,
{
  let user = state
    .store
    .get_identity(profile.owner_id)
    .await
    .map_err(ApiError::store)?
    .map(|identity| identity.summary());
  Ok(ProfileView { profile, user })
}

async fn own_profile<S>(state: &AppState<S>, caller: &Caller) -> Result<Profile, ApiError>
where
  S: SocialStore,
{
  state
    .store
    .find_profile_by_owner(caller.id())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(no_profile)
}

async fn save_and_view<S>(state: &AppState<S>, profile: Profile) -> Result<Json<ProfileView>, ApiError>
where
  S: SocialStore,
{
  state.store.save_profile(&profile).await.map_err(ApiError::store)?;
  view(state, profile).await.map(Json)
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /profile`
pub async fn current<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
) -> Result<Json<ProfileView>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let profile = own_profile(&state, &caller).await?;
  view(&state, profile).await.map(Json)
}

/// `GET /profile/all`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<ProfileView>>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let profiles = state.store.list_profiles().await.map_err(ApiError::store)?;
  if profiles.is_empty() {
    return Err(ApiError::not_found("noprofile", "There are no profiles"));
  }
  let mut views = Vec::with_capacity(profiles.len());
  for profile in profiles {
    views.push(view(&state, profile).await?);
  }
  Ok(Json(views))
}

/// `GET /profile/handle/{handle}`
pub async fn by_handle<S>(
  State(state): State<AppState<S>>,
  Path(handle): Path<String>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let profile = state
    .store
    .find_profile_by_handle(&handle)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(no_profile)?;
  view(&state, profile).await.map(Json)
}

/// `GET /profile/user/{user_id}`
pub async fn by_user<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let owner: Uuid = parse_id(&user_id, "noprofile", "There is no profile for this user")?;
  let profile = state
    .store
    .find_profile_by_owner(owner)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(no_profile)?;
  view(&state, profile).await.map(Json)
}

// ─── Upsert ───────────────────────────────────────────────────────────────────

/// `POST /profile`
///
/// Updates the caller's profile if one exists, otherwise creates it. A handle
/// held by another identity's profile is a conflict and nothing is written.
pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  JsonBody(form): JsonBody<ProfileForm>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let patch = form.validate().map_err(ApiError::Validation)?;

  let holder = state
    .store
    .find_profile_by_handle(&patch.handle)
    .await
    .map_err(ApiError::store)?;
  if holder.is_some_and(|p| p.owner_id != caller.id()) {
    tracing::debug!(handle = %patch.handle, caller = %caller.id(), "handle already taken");
    return Err(ApiError::conflict("handle", "That handle already exists"));
  }

  let existing = state
    .store
    .find_profile_by_owner(caller.id())
    .await
    .map_err(ApiError::store)?;
  let profile = match existing {
    Some(mut profile) => {
      profile.apply(patch);
      profile
    }
    None => Profile::new(caller.id(), patch, Utc::now()),
  };
  save_and_view(&state, profile).await
}

// ─── Experience / education ───────────────────────────────────────────────────

/// `POST /profile/experience`
pub async fn add_experience<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  JsonBody(form): JsonBody<ExperienceForm>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let entry = form.validate().map_err(ApiError::Validation)?;
  let mut profile = own_profile(&state, &caller).await?;
  profile.add_experience(entry);
  save_and_view(&state, profile).await
}

/// `DELETE /profile/experience/{id}`
pub async fn remove_experience<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let mut profile = own_profile(&state, &caller).await?;
  let id = parse_id(&id, "experiencenotfound", "Specified experience not found")?;
  profile.remove_experience(id)?;
  save_and_view(&state, profile).await
}

/// `POST /profile/education`
pub async fn add_education<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  JsonBody(form): JsonBody<EducationForm>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let entry = form.validate().map_err(ApiError::Validation)?;
  let mut profile = own_profile(&state, &caller).await?;
  profile.add_education(entry);
  save_and_view(&state, profile).await
}

/// `DELETE /profile/education/{id}`
pub async fn remove_education<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  let mut profile = own_profile(&state, &caller).await?;
  let id = parse_id(&id, "educationnotfound", "Specified education not found")?;
  profile.remove_education(id)?;
  save_and_view(&state, profile).await
}

// ─── Account deletion ─────────────────────────────────────────────────────────

/// `DELETE /profile`
///
/// Two writes, profile first. If the profile removal fails the identity is
/// left alone; if the identity removal fails the profile is already gone.
pub async fn delete_account<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
) -> Result<Json<Success>, ApiError>
where
  S: SocialStore + Clone + 'static,
{
  state
    .store
    .delete_profile_by_owner(caller.id())
    .await
    .map_err(ApiError::store)?;
  state
    .store
    .delete_identity(caller.id())
    .await
    .map_err(ApiError::store)?;
  tracing::info!(identity = %caller.id(), "deleted account");
  Ok(Json(Success { success: true }))
}
