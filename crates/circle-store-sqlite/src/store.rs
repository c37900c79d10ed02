//! [`SqliteStore`] — the SQLite implementation of [`SocialStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use circle_core::{
  identity::{Identity, NewIdentity},
  post::Post,
  profile::Profile,
  store::SocialStore,
};

use crate::{
  Result,
  encode::{RawIdentity, decode_document, encode_document, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Circle store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-key lookup whose query selects one identity row.
  async fn query_identity(&self, sql: String, key: String) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![key], RawIdentity::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }

  /// Run a single-key lookup whose query selects one `document` column.
  async fn query_document<T: DeserializeOwned>(
    &self,
    sql: &'static str,
    key: String,
  ) -> Result<Option<T>> {
    let doc: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![key], |row| row.get(0))
            .optional()?,
        )
      })
      .await?;

    doc.as_deref().map(decode_document).transpose()
  }

  /// Run a query selecting a `document` column across many rows.
  async fn query_documents<T: DeserializeOwned>(&self, sql: &'static str) -> Result<Vec<T>> {
    let docs: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    docs.iter().map(|d| decode_document(d)).collect()
  }

  /// Run a single-key `DELETE`; returns whether a row was removed.
  async fn delete_by_key(&self, sql: &'static str, key: String) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![key])?))
      .await?;
    Ok(removed > 0)
  }
}

// ─── SocialStore impl ────────────────────────────────────────────────────────

impl SocialStore for SqliteStore {
  type Error = crate::Error;

  // ── Identities ────────────────────────────────────────────────────────────

  async fn create_identity(&self, input: NewIdentity) -> Result<Identity> {
    let identity = Identity {
      identity_id:   Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      avatar:        input.avatar,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(identity.identity_id);
    let name     = identity.name.clone();
    let email    = identity.email.clone();
    let avatar   = identity.avatar.clone();
    let hash     = identity.password_hash.clone();
    let at_str   = encode_dt(identity.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO identities (identity_id, name, email, avatar, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, email, avatar, hash, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(identity)
  }

  async fn get_identity(&self, id: Uuid) -> Result<Option<Identity>> {
    self
      .query_identity(
        format!("SELECT {} FROM identities WHERE identity_id = ?1", RawIdentity::COLUMNS),
        encode_uuid(id),
      )
      .await
  }

  async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>> {
    self
      .query_identity(
        format!("SELECT {} FROM identities WHERE email = ?1", RawIdentity::COLUMNS),
        email.to_owned(),
      )
      .await
  }

  async fn delete_identity(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_key("DELETE FROM identities WHERE identity_id = ?1", encode_uuid(id))
      .await
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn find_profile_by_owner(&self, owner_id: Uuid) -> Result<Option<Profile>> {
    self
      .query_document(
        "SELECT document FROM profiles WHERE owner_id = ?1",
        encode_uuid(owner_id),
      )
      .await
  }

  async fn find_profile_by_handle(&self, handle: &str) -> Result<Option<Profile>> {
    self
      .query_document("SELECT document FROM profiles WHERE handle = ?1", handle.to_owned())
      .await
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    self
      .query_documents("SELECT document FROM profiles ORDER BY created_at, rowid")
      .await
  }

  async fn save_profile(&self, profile: &Profile) -> Result<()> {
    let id_str    = encode_uuid(profile.profile_id);
    let owner_str = encode_uuid(profile.owner_id);
    let handle    = profile.handle.clone();
    let at_str    = encode_dt(profile.created_at);
    let document  = encode_document(profile)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (profile_id, owner_id, handle, created_at, document)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (profile_id) DO UPDATE
             SET handle = excluded.handle, document = excluded.document",
          rusqlite::params![id_str, owner_str, handle, at_str, document],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_profile_by_owner(&self, owner_id: Uuid) -> Result<bool> {
    self
      .delete_by_key("DELETE FROM profiles WHERE owner_id = ?1", encode_uuid(owner_id))
      .await
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
    self
      .query_document("SELECT document FROM posts WHERE post_id = ?1", encode_uuid(id))
      .await
  }

  async fn list_posts(&self) -> Result<Vec<Post>> {
    self
      .query_documents("SELECT document FROM posts ORDER BY created_at DESC, rowid DESC")
      .await
  }

  async fn save_post(&self, post: &Post) -> Result<()> {
    let id_str    = encode_uuid(post.post_id);
    let owner_str = encode_uuid(post.owner_id);
    let at_str    = encode_dt(post.created_at);
    let document  = encode_document(post)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, owner_id, created_at, document)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (post_id) DO UPDATE SET document = excluded.document",
          rusqlite::params![id_str, owner_str, at_str, document],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_post(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_key("DELETE FROM posts WHERE post_id = ?1", encode_uuid(id))
      .await
  }
}
