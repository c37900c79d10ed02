//! The client session cache.
//!
//! Holds the bearer token between invocations in a small TOML file. The token
//! is decoded locally, without a signature check, to show who is logged in
//! and to drop sessions that have already expired. The server still verifies
//! every request.

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use circle_core::token::{Claims, decode_unverified};
use serde::{Deserialize, Serialize};

/// On-disk shape of the session file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
  token: Option<String>,
}

/// What [`SessionCache::init`] found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
  /// No stored token.
  Empty,
  /// A live token for the decoded caller.
  Active(Claims),
  /// A token was stored but had expired or could not be decoded; it has
  /// been cleared and the user needs to log in again.
  Discarded,
}

#[derive(Debug)]
pub struct SessionCache {
  path:   PathBuf,
  token:  Option<String>,
  claims: Option<Claims>,
}

impl SessionCache {
  /// Load the session stored at `path`, discarding it if it is unreadable or
  /// expired at `now`.
  pub fn init(path: impl Into<PathBuf>, now: DateTime<Utc>) -> Result<(Self, Loaded)> {
    let mut cache = Self { path: path.into(), token: None, claims: None };

    let Some(token) = cache.read_token()? else {
      return Ok((cache, Loaded::Empty));
    };

    match decode_unverified(&token) {
      Ok(claims) if !claims.is_expired_at(now) => {
        cache.token = Some(token);
        cache.claims = Some(claims.clone());
        Ok((cache, Loaded::Active(claims)))
      }
      Ok(claims) => {
        tracing::debug!(exp = claims.exp, "stored session has expired");
        cache.clear()?;
        Ok((cache, Loaded::Discarded))
      }
      Err(e) => {
        tracing::debug!(error = %e, "stored session token is unreadable");
        cache.clear()?;
        Ok((cache, Loaded::Discarded))
      }
    }
  }

  pub fn path(&self) -> &Path { &self.path }

  pub fn token(&self) -> Option<&str> { self.token.as_deref() }

  pub fn claims(&self) -> Option<&Claims> { self.claims.as_ref() }

  /// Remember a freshly issued token and persist it.
  pub fn store(&mut self, token: String) -> Result<&Claims> {
    let claims = decode_unverified(&token).context("server returned an unreadable token")?;

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)
        .with_context(|| format!("creating session directory {}", parent.display()))?;
    }
    let raw = toml::to_string(&SessionFile { token: Some(token.clone()) })
      .context("serialising session file")?;
    fs::write(&self.path, raw)
      .with_context(|| format!("writing session file {}", self.path.display()))?;

    self.token = Some(token);
    let claims = self.claims.insert(claims);
    Ok(&*claims)
  }

  /// Forget the token and remove the session file.
  pub fn clear(&mut self) -> Result<()> {
    self.token = None;
    self.claims = None;
    match fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => {
        Err(e).with_context(|| format!("removing session file {}", self.path.display()))
      }
    }
  }

  fn read_token(&self) -> Result<Option<String>> {
    let raw = match fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => {
        return Err(e)
          .with_context(|| format!("reading session file {}", self.path.display()));
      }
    };
    // A corrupt file is treated like an unreadable token.
    let file: SessionFile = toml::from_str(&raw).unwrap_or_else(|_| SessionFile {
      token: Some(String::new()),
    });
    Ok(file.token)
  }
}
