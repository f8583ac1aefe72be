//! Error types for `roster-core`.

use thiserror::Error;

use crate::person::PersonKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: site {site_id}, user {user_id}, kind {kind}")]
  PersonNotFound {
    site_id: i64,
    user_id: i64,
    kind:    PersonKind,
  },

  #[error("person already exists: site {site_id}, user {user_id}, kind {kind}")]
  DuplicatePerson {
    site_id: i64,
    user_id: i64,
    kind:    PersonKind,
  },

  #[error("invalid invitation: {0}")]
  InvalidInvitation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
