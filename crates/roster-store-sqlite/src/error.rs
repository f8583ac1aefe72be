//! Error type for `roster-store-sqlite`.

use roster_core::person::PersonKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("column decode error: {0}")]
  Decode(String),

  #[error("person already exists: site {site_id}, user {user_id}, kind {kind}")]
  DuplicatePerson {
    site_id: i64,
    user_id: i64,
    kind:    PersonKind,
  },

  #[error("person not found: site {site_id}, user {user_id}, kind {kind}")]
  PersonNotFound {
    site_id: i64,
    user_id: i64,
    kind:    PersonKind,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
