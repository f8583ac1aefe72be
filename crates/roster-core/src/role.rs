//! Role — an enumerated site permission level.
//!
//! Roles travel as lowercase slugs on the wire and in the database. Sites can
//! define their own roles, so decoding is total: an unrecognised slug becomes
//! [`Role::Custom`] rather than an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A site permission level with a stable slug representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
  Administrator,
  Editor,
  Author,
  Contributor,
  Subscriber,
  /// A site-defined role not in the standard set. The inner string is the
  /// slug exactly as the remote reported it.
  Custom(String),
}

impl Role {
  /// The slug used for transport and storage.
  pub fn slug(&self) -> &str {
    match self {
      Self::Administrator => "administrator",
      Self::Editor => "editor",
      Self::Author => "author",
      Self::Contributor => "contributor",
      Self::Subscriber => "subscriber",
      Self::Custom(slug) => slug,
    }
  }

  /// Decode a slug. Never fails; unknown slugs map to [`Role::Custom`].
  pub fn from_slug(slug: &str) -> Self {
    match slug {
      "administrator" => Self::Administrator,
      "editor" => Self::Editor,
      "author" => Self::Author,
      "contributor" => Self::Contributor,
      "subscriber" => Self::Subscriber,
      other => Self::Custom(other.to_string()),
    }
  }
}

impl From<String> for Role {
  fn from(s: String) -> Self { Role::from_slug(&s) }
}

impl From<Role> for String {
  fn from(r: Role) -> Self { r.slug().to_string() }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.slug())
  }
}

/// A role as described by the remote roles endpoint: slug plus the
/// human-readable name shown in pickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDefinition {
  pub slug: Role,
  pub name: String,
}
