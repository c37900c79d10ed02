//! Request forms, exactly as submitted, and their validators.
//!
//! Every form has a `validate` method that either yields the typed value the
//! rest of the system works with, or a [`FieldErrors`] map keyed by the
//! offending field name. Validation never stops at the first problem.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
  post::NewText,
  profile::{NewEducation, NewExperience, ProfilePatch, Social},
};

// ─── Field errors ────────────────────────────────────────────────────────────

/// Flat `field → message` map; the body of every error response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
  pub fn new() -> Self { Self::default() }

  /// A map with a single entry.
  pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.insert(field, message);
    errors
  }

  /// Record `message` for `field` unless the field already has one.
  pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_insert_with(|| message.into());
  }

  pub fn get(&self, field: &str) -> Option<&str> { self.0.get(field).map(String::as_str) }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// `Ok(value)` if no errors were recorded.
  fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
    if self.is_empty() { Ok(value()) } else { Err(self) }
  }
}

impl std::fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    f.write_str(&parts.join("; "))
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Trimmed value, or `None` when missing or blank.
fn present(value: &Option<String>) -> Option<String> {
  value
    .as_deref()
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_owned)
}

fn required(
  errors: &mut FieldErrors,
  field: &str,
  value: &Option<String>,
  message: &str,
) -> String {
  present(value).unwrap_or_else(|| {
    errors.insert(field, message);
    String::new()
  })
}

fn length_between(value: &str, min: usize, max: usize) -> bool {
  let n = value.chars().count();
  (min..=max).contains(&n)
}

/// A deliberately loose address check: one `@`, a non-empty local part, and a
/// dotted domain without empty labels.
pub fn is_email(value: &str) -> bool {
  if value.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = value.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && domain.contains('.')
    && domain.split('.').all(|label| !label.is_empty())
}

/// Accepts absolute http(s) URLs, and bare hosts such as `example.com/me`.
pub fn is_url(value: &str) -> bool {
  let candidate = if value.contains("://") {
    value.to_owned()
  } else {
    format!("http://{value}")
  };
  match url::Url::parse(&candidate) {
    Ok(parsed) => {
      matches!(parsed.scheme(), "http" | "https")
        && parsed.host_str().is_some_and(|h| h.contains('.'))
    }
    Err(_) => false,
  }
}

/// `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp.
fn parse_date(value: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d")
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

fn required_date(
  errors: &mut FieldErrors,
  field: &str,
  value: &Option<String>,
  missing: &str,
) -> Option<NaiveDate> {
  let raw = required(errors, field, value, missing);
  if raw.is_empty() {
    return None;
  }
  let parsed = parse_date(&raw);
  if parsed.is_none() {
    errors.insert(field, format!("{} date is invalid", capitalise(field)));
  }
  parsed
}

fn optional_date(errors: &mut FieldErrors, field: &str, value: &Option<String>) -> Option<NaiveDate> {
  let raw = present(value)?;
  let parsed = parse_date(&raw);
  if parsed.is_none() {
    errors.insert(field, format!("{} date is invalid", capitalise(field)));
  }
  parsed
}

fn capitalise(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

// ─── Registration ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterForm {
  pub name:      Option<String>,
  pub email:     Option<String>,
  pub password:  Option<String>,
  pub password2: Option<String>,
}

/// A validated registration; the email is trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
  pub name:     String,
  pub email:    String,
  pub password: String,
}

impl RegisterForm {
  pub fn validate(self) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required(&mut errors, "name", &self.name, "Name field is required");
    if !name.is_empty() && !length_between(&name, 2, 30) {
      errors.insert("name", "Name must be between 2 and 30 characters");
    }

    let email = required(&mut errors, "email", &self.email, "Email field is required")
      .to_lowercase();
    if !email.is_empty() && !is_email(&email) {
      errors.insert("email", "Email is invalid");
    }

    // Passwords are not trimmed.
    let password = self.password.unwrap_or_default();
    if password.is_empty() {
      errors.insert("password", "Password field is required");
    } else if !length_between(&password, 6, 30) {
      errors.insert("password", "Password must be between 6 and 30 characters");
    }

    let password2 = self.password2.unwrap_or_default();
    if password2.is_empty() {
      errors.insert("password2", "Confirm password field is required");
    } else if password2 != password {
      errors.insert("password2", "Passwords must match");
    }

    errors.into_result(|| Registration { name, email, password })
  }
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
  pub email:    Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

impl LoginForm {
  pub fn validate(self) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = required(&mut errors, "email", &self.email, "Email field is required")
      .to_lowercase();
    if !email.is_empty() && !is_email(&email) {
      errors.insert("email", "Email is invalid");
    }

    let password = self.password.unwrap_or_default();
    if password.is_empty() {
      errors.insert("password", "Password field is required");
    }

    errors.into_result(|| Credentials { email, password })
  }
}

// ─── Posts and comments ──────────────────────────────────────────────────────

/// Body of `POST /posts` and `POST /posts/comment/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextForm {
  pub text: Option<String>,
}

impl TextForm {
  /// Validate the text and attach the author's display `name` and `avatar`.
  pub fn validate(self, name: &str, avatar: &str) -> Result<NewText, FieldErrors> {
    let mut errors = FieldErrors::new();

    let text = required(&mut errors, "text", &self.text, "Text field is required");
    if !text.is_empty() && !length_between(&text, 10, 300) {
      errors.insert("text", "Post must be between 10 and 300 characters");
    }

    errors.into_result(|| NewText {
      text,
      name: name.to_owned(),
      avatar: avatar.to_owned(),
    })
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
  pub handle:          Option<String>,
  pub status:          Option<String>,
  /// Comma-separated.
  pub skills:          Option<String>,
  pub company:         Option<String>,
  pub website:         Option<String>,
  pub location:        Option<String>,
  pub bio:             Option<String>,
  pub github_username: Option<String>,
  pub youtube:         Option<String>,
  pub twitter:         Option<String>,
  pub facebook:        Option<String>,
  pub linkedin:        Option<String>,
  pub instagram:       Option<String>,
}

impl ProfileForm {
  pub fn validate(self) -> Result<ProfilePatch, FieldErrors> {
    let mut errors = FieldErrors::new();

    let handle = required(&mut errors, "handle", &self.handle, "Profile handle is required");
    if !handle.is_empty() && !length_between(&handle, 2, 40) {
      errors.insert("handle", "Handle needs to be between 2 and 40 characters");
    }

    let status = required(&mut errors, "status", &self.status, "Status field is required");

    let skills: Vec<String> = required(&mut errors, "skills", &self.skills, "Skills field is required")
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
      .collect();

    let mut url_field = |field: &str, value: &Option<String>| {
      let v = present(value)?;
      if !is_url(&v) {
        errors.insert(field, "Not a valid URL");
      }
      Some(v)
    };
    let website = url_field("website", &self.website);
    let social = Social {
      youtube:   url_field("youtube", &self.youtube),
      twitter:   url_field("twitter", &self.twitter),
      facebook:  url_field("facebook", &self.facebook),
      linkedin:  url_field("linkedin", &self.linkedin),
      instagram: url_field("instagram", &self.instagram),
    };

    let company = present(&self.company);
    let location = present(&self.location);
    let bio = present(&self.bio);
    let github_username = present(&self.github_username);

    errors.into_result(|| ProfilePatch {
      handle,
      status,
      skills,
      company,
      website,
      location,
      bio,
      github_username,
      social,
    })
  }
}

// ─── Experience / education ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceForm {
  pub title:       Option<String>,
  pub company:     Option<String>,
  pub location:    Option<String>,
  pub from:        Option<String>,
  pub to:          Option<String>,
  #[serde(default)]
  pub current:     bool,
  pub description: Option<String>,
}

impl ExperienceForm {
  /// A `current` entry drops any submitted `to` date.
  pub fn validate(self) -> Result<NewExperience, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = required(&mut errors, "title", &self.title, "Job title field is required");
    let company = required(&mut errors, "company", &self.company, "Company field is required");
    let from = required_date(&mut errors, "from", &self.from, "From date field is required");
    let to = optional_date(&mut errors, "to", &self.to).filter(|_| !self.current);

    match from {
      Some(from) if errors.is_empty() => Ok(NewExperience {
        title,
        company,
        location: present(&self.location),
        from,
        to,
        current: self.current,
        description: present(&self.description),
      }),
      _ => Err(errors),
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationForm {
  pub school:         Option<String>,
  pub degree:         Option<String>,
  #[serde(alias = "fieldofstudy")]
  pub field_of_study: Option<String>,
  pub from:           Option<String>,
  pub to:             Option<String>,
  #[serde(default)]
  pub current:        bool,
  pub description:    Option<String>,
}

impl EducationForm {
  pub fn validate(self) -> Result<NewEducation, FieldErrors> {
    let mut errors = FieldErrors::new();

    let school = required(&mut errors, "school", &self.school, "School field is required");
    let degree = required(&mut errors, "degree", &self.degree, "Degree field is required");
    let field_of_study = required(
      &mut errors,
      "field_of_study",
      &self.field_of_study,
      "Field of study field is required",
    );
    let from = required_date(&mut errors, "from", &self.from, "From date field is required");
    let to = optional_date(&mut errors, "to", &self.to).filter(|_| !self.current);

    match from {
      Some(from) if errors.is_empty() => Ok(NewEducation {
        school,
        degree,
        field_of_study,
        from,
        to,
        current: self.current,
        description: present(&self.description),
      }),
      _ => Err(errors),
    }
  }
}
