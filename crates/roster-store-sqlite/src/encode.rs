//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Kinds and roles are stored
//! as their stable lowercase slugs.

use chrono::{DateTime, Utc};
use roster_core::{
  person::{Person, PersonKind},
  role::Role,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── PersonKind ──────────────────────────────────────────────────────────────

pub fn encode_kind(k: PersonKind) -> &'static str { k.as_str() }

pub fn decode_kind(s: &str) -> Result<PersonKind> {
  PersonKind::parse(s)
    .ok_or_else(|| Error::Decode(format!("unknown person kind: {s:?}")))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: &Role) -> String { r.slug().to_string() }

// Decoding is total: unknown slugs become Role::Custom.
pub fn decode_role(s: &str) -> Role { Role::from_slug(s) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `people` row.
pub struct RawPerson {
  pub site_id:        i64,
  pub user_id:        i64,
  pub kind:           String,
  pub login:          String,
  pub display_name:   String,
  pub first_name:     Option<String>,
  pub last_name:      Option<String>,
  pub email:          Option<String>,
  pub avatar_url:     Option<String>,
  pub role:           Option<String>,
  pub is_super_admin: bool,
  pub created_at:     String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      site_id:        self.site_id,
      user_id:        self.user_id,
      kind:           decode_kind(&self.kind)?,
      login:          self.login,
      display_name:   self.display_name,
      first_name:     self.first_name,
      last_name:      self.last_name,
      email:          self.email,
      avatar_url:     self.avatar_url,
      role:           self.role.as_deref().map(decode_role),
      is_super_admin: self.is_super_admin,
      created_at:     decode_dt(&self.created_at)?,
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawPerson {
      site_id:        row.get(0)?,
      user_id:        row.get(1)?,
      kind:           row.get(2)?,
      login:          row.get(3)?,
      display_name:   row.get(4)?,
      first_name:     row.get(5)?,
      last_name:      row.get(6)?,
      email:          row.get(7)?,
      avatar_url:     row.get(8)?,
      role:           row.get(9)?,
      is_super_admin: row.get(10)?,
      created_at:     row.get(11)?,
    })
  }
}

/// The column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "site_id, user_id, kind, login, display_name, \
   first_name, last_name, email, avatar_url, role, is_super_admin, created_at";
