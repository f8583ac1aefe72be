//! Person — a collaborator record mirrored from a remote site.
//!
//! A person is keyed by `(site_id, user_id, kind)`: the same remote user can
//! appear once as a team member and once as a follower of the same site, and
//! the two records are independent.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// The category a person record belongs to.
///
/// Kinds partition the local mirror: reconciliation, queries, and deletions
/// always operate within a single kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
  /// A team member with a site role.
  User,
  /// A follower subscribed to the site.
  Follower,
  /// An email-only viewer of a private site.
  Viewer,
}

impl PersonKind {
  /// The stable string stored in the database and used in query parameters.
  /// Must match the `rename_all = "lowercase"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::User => "user",
      Self::Follower => "follower",
      Self::Viewer => "viewer",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "user" => Some(Self::User),
      "follower" => Some(Self::Follower),
      "viewer" => Some(Self::Viewer),
      _ => None,
    }
  }
}

impl fmt::Display for PersonKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A locally persisted collaborator record.
///
/// `role` is populated for [`PersonKind::User`] records only; followers and
/// viewers carry no site permission level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub site_id:        i64,
  pub user_id:        i64,
  pub kind:           PersonKind,
  pub login:          String,
  pub display_name:   String,
  pub first_name:     Option<String>,
  pub last_name:      Option<String>,
  pub email:          Option<String>,
  pub avatar_url:     Option<String>,
  pub role:           Option<Role>,
  pub is_super_admin: bool,
  /// Store-assigned timestamp; never changes after insertion.
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::PersonStore::insert_person`].
/// `created_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub site_id:        i64,
  pub user_id:        i64,
  pub kind:           PersonKind,
  pub login:          String,
  pub display_name:   String,
  pub first_name:     Option<String>,
  pub last_name:      Option<String>,
  pub email:          Option<String>,
  pub avatar_url:     Option<String>,
  pub role:           Option<Role>,
  pub is_super_admin: bool,
}

impl NewPerson {
  /// Convenience constructor with all optional fields empty.
  pub fn new(
    site_id: i64,
    user_id: i64,
    kind: PersonKind,
    login: impl Into<String>,
    display_name: impl Into<String>,
  ) -> Self {
    Self {
      site_id,
      user_id,
      kind,
      login: login.into(),
      display_name: display_name.into(),
      first_name: None,
      last_name: None,
      email: None,
      avatar_url: None,
      role: None,
      is_super_admin: false,
    }
  }
}
