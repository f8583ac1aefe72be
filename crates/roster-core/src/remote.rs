//! The `RemoteGateway` trait and wire-shaped person records.
//!
//! The gateway performs network calls and returns decoded data; it never
//! touches the local store. Merging remote data into local state is the
//! reconciliation service's job.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  invitation::Invitation,
  person::{NewPerson, Person, PersonKind},
  role::{Role, RoleDefinition},
};

// ─── Wire types ──────────────────────────────────────────────────────────────

/// A person record as fetched from the remote, before it has a local
/// `created_at`. The kind is known from the endpoint the record came from and
/// is carried on the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePerson {
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

impl RemotePerson {
  /// Build the insert input for a record not yet present locally.
  pub fn into_new_person(self, site_id: i64) -> NewPerson {
    NewPerson {
      site_id,
      user_id: self.user_id,
      kind: self.kind,
      login: self.login,
      display_name: self.display_name,
      first_name: self.first_name,
      last_name: self.last_name,
      email: self.email,
      avatar_url: self.avatar_url,
      role: self.role,
      is_super_admin: self.is_super_admin,
    }
  }

  /// Overwrite the mutable fields of an existing local record with this
  /// remote copy. Identity and `created_at` are left untouched.
  pub fn apply_to(&self, person: &mut Person) {
    person.login = self.login.clone();
    person.display_name = self.display_name.clone();
    person.first_name = self.first_name.clone();
    person.last_name = self.last_name.clone();
    person.email = self.email.clone();
    person.avatar_url = self.avatar_url.clone();
    person.role = self.role.clone();
    person.is_super_admin = self.is_super_admin;
  }
}

/// One page of a remote people listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeoplePage {
  pub people:   Vec<RemotePerson>,
  /// Whether further pages exist beyond this one.
  pub has_more: bool,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the remote people API.
///
/// Every call is fallible with the implementation's typed error. "Not found"
/// style outcomes on mutations are the service's concern; the gateway reports
/// exactly what the remote said.
pub trait RemoteGateway: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch one page of people of `kind`, starting at `offset`.
  fn list_people(
    &self,
    site_id: i64,
    kind: PersonKind,
    offset: usize,
    count: usize,
  ) -> impl Future<Output = Result<PeoplePage, Self::Error>> + Send + '_;

  /// Change a team member's role. Ack only; the caller already knows the
  /// resulting record.
  fn update_role(
    &self,
    site_id: i64,
    user_id: i64,
    role: Role,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove a person from the site. The endpoint differs by kind.
  fn delete_person(
    &self,
    site_id: i64,
    user_id: i64,
    kind: PersonKind,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Role definitions available on the site.
  fn list_roles(
    &self,
    site_id: i64,
  ) -> impl Future<Output = Result<Vec<RoleDefinition>, Self::Error>> + Send + '_;

  /// Ask the remote whether an invitation would be accepted.
  fn validate_invitation(
    &self,
    site_id: i64,
    invitation: Invitation,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Send an invitation.
  fn send_invitation(
    &self,
    site_id: i64,
    invitation: Invitation,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
