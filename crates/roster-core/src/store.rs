//! The `PersonStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `roster-store-sqlite`). Higher layers (`roster-service`, `roster-api`)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  person::{NewPerson, Person, PersonKind},
  role::RoleDefinition,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`PersonStore::list_people`].
#[derive(Debug, Clone)]
pub struct PersonQuery {
  pub site_id: i64,
  /// Restrict to a specific kind; `None` returns every kind.
  pub kind:    Option<PersonKind>,
  /// Substring filter over login and display name.
  pub search:  Option<String>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}

impl PersonQuery {
  pub fn site(site_id: i64) -> Self {
    Self { site_id, kind: None, search: None, limit: None, offset: None }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the local mirror of a site's people.
///
/// All writes for person records flow through the reconciliation service; the
/// store itself enforces only the `(site_id, user_id, kind)` uniqueness
/// invariant.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  /// Point lookup by key. Returns `None` if not found.
  fn person(
    &self,
    site_id: i64,
    user_id: i64,
    kind: PersonKind,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List people matching `query`, ordered by display name.
  fn list_people(
    &self,
    query: PersonQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Persist a new record. The `created_at` timestamp is set by the store.
  /// Fails if the `(site_id, user_id, kind)` key is already taken.
  fn insert_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Overwrite an existing record in place, keyed by
  /// `(site_id, user_id, kind)`. Fails if the record does not exist.
  fn update_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Re-insert a previously deleted record verbatim, including its original
  /// `created_at`. Used by the rollback-of-delete path.
  fn restore_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete by key. Returns whether a record was removed.
  fn delete_person(
    &self,
    site_id: i64,
    user_id: i64,
    kind: PersonKind,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete every record of `kind` on `site_id` whose user id is not in
  /// `keep`. Returns the number of records removed.
  ///
  /// This is the full-set reconciliation primitive; a partial listing page
  /// must never be passed here.
  fn retain_people(
    &self,
    site_id: i64,
    kind: PersonKind,
    keep: Vec<i64>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Role cache ────────────────────────────────────────────────────────

  /// Replace the cached role definitions for a site.
  fn save_roles(
    &self,
    site_id: i64,
    roles: Vec<RoleDefinition>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Cached role definitions for a site, in name order.
  fn roles(
    &self,
    site_id: i64,
  ) -> impl Future<Output = Result<Vec<RoleDefinition>, Self::Error>> + Send + '_;
}
