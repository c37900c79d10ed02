//! Profile records, their typed patch, and the experience/education entries
//! embedded in them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  entries::{Entry, EntryList},
  identity::UserSummary,
};

// ─── Social links ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
  pub youtube:   Option<String>,
  pub twitter:   Option<String>,
  pub facebook:  Option<String>,
  pub linkedin:  Option<String>,
  pub instagram: Option<String>,
}

// ─── Experience ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
  pub experience_id: Uuid,
  pub title:         String,
  pub company:       String,
  pub location:      Option<String>,
  pub from:          NaiveDate,
  /// Always `None` while `current` is set.
  pub to:            Option<NaiveDate>,
  pub current:       bool,
  pub description:   Option<String>,
}

impl Entry for Experience {
  fn entry_id(&self) -> Uuid { self.experience_id }
}

/// A validated experience entry, before it is given an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExperience {
  pub title:       String,
  pub company:     String,
  pub location:    Option<String>,
  pub from:        NaiveDate,
  pub to:          Option<NaiveDate>,
  pub current:     bool,
  pub description: Option<String>,
}

// ─── Education ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
  pub education_id:   Uuid,
  pub school:         String,
  pub degree:         String,
  pub field_of_study: String,
  pub from:           NaiveDate,
  pub to:             Option<NaiveDate>,
  pub current:        bool,
  pub description:    Option<String>,
}

impl Entry for Education {
  fn entry_id(&self) -> Uuid { self.education_id }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEducation {
  pub school:         String,
  pub degree:         String,
  pub field_of_study: String,
  pub from:           NaiveDate,
  pub to:             Option<NaiveDate>,
  pub current:        bool,
  pub description:    Option<String>,
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// A validated create-or-edit request for a profile.
///
/// | Field | Effect |
/// |-------|--------|
/// | `handle`, `status`, `skills` | always replace the stored value |
/// | `company`, `website`, `location`, `bio`, `github_username` | `Some` replaces, `None` leaves untouched |
/// | `social` | replaces the whole social block |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePatch {
  pub handle:          String,
  pub status:          String,
  pub skills:          Vec<String>,
  pub company:         Option<String>,
  pub website:         Option<String>,
  pub location:        Option<String>,
  pub bio:             Option<String>,
  pub github_username: Option<String>,
  pub social:          Social,
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// One per identity. Handles are unique across all profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id:      Uuid,
  pub owner_id:        Uuid,
  pub handle:          String,
  pub status:          String,
  pub skills:          Vec<String>,
  pub company:         Option<String>,
  pub website:         Option<String>,
  pub location:        Option<String>,
  pub bio:             Option<String>,
  pub github_username: Option<String>,
  pub social:          Social,
  pub experience:      EntryList<Experience>,
  pub education:       EntryList<Education>,
  pub created_at:      DateTime<Utc>,
}

impl Profile {
  /// Build a fresh profile for `owner_id` from a validated patch.
  pub fn new(owner_id: Uuid, patch: ProfilePatch, now: DateTime<Utc>) -> Self {
    Self {
      profile_id: Uuid::new_v4(),
      owner_id,
      handle: patch.handle,
      status: patch.status,
      skills: patch.skills,
      company: patch.company,
      website: patch.website,
      location: patch.location,
      bio: patch.bio,
      github_username: patch.github_username,
      social: patch.social,
      experience: EntryList::new(),
      education: EntryList::new(),
      created_at: now,
    }
  }

  /// Apply `patch` field by field; see [`ProfilePatch`] for the rules.
  pub fn apply(&mut self, patch: ProfilePatch) {
    self.handle = patch.handle;
    self.status = patch.status;
    self.skills = patch.skills;
    self.social = patch.social;

    let optional = [
      (&mut self.company, patch.company),
      (&mut self.website, patch.website),
      (&mut self.location, patch.location),
      (&mut self.bio, patch.bio),
      (&mut self.github_username, patch.github_username),
    ];
    for (slot, value) in optional {
      if value.is_some() {
        *slot = value;
      }
    }
  }

  pub fn add_experience(&mut self, input: NewExperience) -> &Experience {
    self.experience.push_front(Experience {
      experience_id: Uuid::new_v4(),
      title:         input.title,
      company:       input.company,
      location:      input.location,
      from:          input.from,
      to:            input.to,
      current:       input.current,
      description:   input.description,
    })
  }

  pub fn remove_experience(&mut self, id: Uuid) -> Result<Experience> {
    self.experience.remove(id).ok_or(Error::ExperienceNotFound(id))
  }

  pub fn add_education(&mut self, input: NewEducation) -> &Education {
    self.education.push_front(Education {
      education_id:   Uuid::new_v4(),
      school:         input.school,
      degree:         input.degree,
      field_of_study: input.field_of_study,
      from:           input.from,
      to:             input.to,
      current:        input.current,
      description:    input.description,
    })
  }

  pub fn remove_education(&mut self, id: Uuid) -> Result<Education> {
    self.education.remove(id).ok_or(Error::EducationNotFound(id))
  }
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A profile joined with its owner's public summary. `user` is `None` when
/// the owning identity no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
  #[serde(flatten)]
  pub profile: Profile,
  pub user:    Option<UserSummary>,
}
