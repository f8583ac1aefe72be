//! [`PeopleService`] — merge, reconciliation, and optimistic mutations.

use std::{collections::HashSet, sync::Arc};

use roster_core::{
  invitation::Invitation,
  person::{Person, PersonKind},
  remote::{RemoteGateway, RemotePerson},
  role::{Role, RoleDefinition},
  store::PersonStore,
};
use uuid::Uuid;

use crate::{
  Error, Result,
  mutation::{Mutation, MutationOutcome},
};

/// Page size used by [`PeopleService::sync`].
pub const FETCH_COUNT: usize = 20;

// ─── Reports ─────────────────────────────────────────────────────────────────

/// What a single [`PeopleService::merge_listing`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
  pub inserted: usize,
  pub updated:  usize,
}

/// What a full [`PeopleService::sync`] pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SyncReport {
  pub pages:  usize,
  pub merged: usize,
  pub pruned: usize,
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// The people reconciliation service.
///
/// Exclusively owns writes to the person store. The gateway is only ever
/// asked for data or acks; it never mutates local state.
pub struct PeopleService<S, R> {
  store:  Arc<S>,
  remote: Arc<R>,
}

impl<S, R> PeopleService<S, R>
where
  S: PersonStore + 'static,
  R: RemoteGateway + 'static,
{
  pub fn new(store: Arc<S>, remote: Arc<R>) -> Self {
    Self { store, remote }
  }

  fn store_err(e: S::Error) -> Error { Error::Store(Box::new(e)) }

  fn remote_err(e: R::Error) -> Error { Error::Remote(Box::new(e)) }

  // ── Reconciliation ────────────────────────────────────────────────────────

  /// Merge one page of remotely fetched people into the local store.
  ///
  /// Existing records (matched on `(site_id, user_id, kind)`) have their
  /// mutable fields overwritten, keeping `created_at`; unknown records are
  /// inserted. Idempotent: merging the same page twice changes nothing the
  /// second time. A partial page never implies deletions — use
  /// [`Self::reconcile`] for that.
  pub async fn merge_listing(
    &self,
    site_id: i64,
    items: Vec<RemotePerson>,
  ) -> Result<MergeStats> {
    let mut stats = MergeStats::default();

    for item in items {
      let existing = self
        .store
        .person(site_id, item.user_id, item.kind)
        .await
        .map_err(Self::store_err)?;

      match existing {
        Some(mut person) => {
          item.apply_to(&mut person);
          self
            .store
            .update_person(person)
            .await
            .map_err(Self::store_err)?;
          stats.updated += 1;
        }
        None => {
          self
            .store
            .insert_person(item.into_new_person(site_id))
            .await
            .map_err(Self::store_err)?;
          stats.inserted += 1;
        }
      }
    }

    Ok(stats)
  }

  /// Full-set reconciliation: remove local records of `kind` whose user id
  /// is absent from `seen`. Returns the number removed.
  ///
  /// `seen` must be the complete remote id set for the kind, not one page.
  pub async fn reconcile(
    &self,
    site_id: i64,
    kind: PersonKind,
    seen: HashSet<i64>,
  ) -> Result<usize> {
    let keep: Vec<i64> = seen.into_iter().collect();
    self
      .store
      .retain_people(site_id, kind, keep)
      .await
      .map_err(Self::store_err)
  }

  /// Pull every page of `kind` from the remote, merging as pages arrive,
  /// then prune local records the remote no longer lists.
  pub async fn sync(&self, site_id: i64, kind: PersonKind) -> Result<SyncReport> {
    let mut report = SyncReport::default();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut offset = 0;

    loop {
      let page = self
        .remote
        .list_people(site_id, kind, offset, FETCH_COUNT)
        .await
        .map_err(Self::remote_err)?;

      let fetched = page.people.len();
      seen.extend(page.people.iter().map(|p| p.user_id));
      self.merge_listing(site_id, page.people).await?;

      report.pages += 1;
      report.merged += fetched;
      offset += fetched;

      if !page.has_more || fetched == 0 {
        break;
      }
    }

    report.pruned = self.reconcile(site_id, kind, seen).await?;

    tracing::info!(
      site_id,
      %kind,
      pages = report.pages,
      merged = report.merged,
      pruned = report.pruned,
      "people sync finished"
    );
    Ok(report)
  }

  // ── Optimistic mutations ──────────────────────────────────────────────────

  /// Change a person's role, locally first.
  ///
  /// The returned [`Mutation`] carries the view with the new role already
  /// applied. If the remote rejects the change, the pre-call role is
  /// restored and the outcome is [`MutationOutcome::RolledBack`]. A record
  /// missing locally is a silent no-op ([`MutationOutcome::Skipped`]).
  ///
  /// Overlapping updates to the same person are not serialized; the last
  /// writer to the local store wins.
  pub async fn update_role(
    &self,
    person: &Person,
    new_role: Role,
  ) -> Result<Mutation<R::Error>> {
    let mutation_id = Uuid::new_v4();

    let current = self
      .store
      .person(person.site_id, person.user_id, person.kind)
      .await
      .map_err(Self::store_err)?;

    let Some(current) = current else {
      tracing::debug!(%mutation_id, user_id = person.user_id, "update_role: no local record, skipping");
      return Ok(Mutation::skipped(mutation_id, person.clone()));
    };

    let snapshot = current.clone();
    let previous_role = current.role.clone();

    let mut updated = current;
    updated.role = Some(new_role.clone());
    let updated = self
      .store
      .update_person(updated)
      .await
      .map_err(Self::store_err)?;

    let store = Arc::clone(&self.store);
    let remote = Arc::clone(&self.remote);
    let optimistic = updated.clone();

    let handle = tokio::spawn(async move {
      match remote
        .update_role(optimistic.site_id, optimistic.user_id, new_role)
        .await
      {
        Ok(()) => {
          tracing::debug!(%mutation_id, "role update confirmed");
          MutationOutcome::Confirmed
        }
        Err(error) => {
          tracing::warn!(%mutation_id, %error, "role update rejected, rolling back");
          revert_role(&*store, optimistic, snapshot, previous_role, error).await
        }
      }
    });

    Ok(Mutation { mutation_id, person: updated, remote: handle })
  }

  /// Remove a person, locally first.
  ///
  /// The returned view is the snapshot that was deleted. If the remote
  /// rejects the deletion, the snapshot is re-inserted verbatim — any
  /// local-only writes to the same key made in between are lost.
  pub async fn delete(&self, person: &Person) -> Result<Mutation<R::Error>> {
    let mutation_id = Uuid::new_v4();

    let snapshot = self
      .store
      .person(person.site_id, person.user_id, person.kind)
      .await
      .map_err(Self::store_err)?;

    let Some(snapshot) = snapshot else {
      tracing::debug!(%mutation_id, user_id = person.user_id, "delete: no local record, skipping");
      return Ok(Mutation::skipped(mutation_id, person.clone()));
    };

    self
      .store
      .delete_person(snapshot.site_id, snapshot.user_id, snapshot.kind)
      .await
      .map_err(Self::store_err)?;

    let store = Arc::clone(&self.store);
    let remote = Arc::clone(&self.remote);
    let deleted = snapshot.clone();

    let handle = tokio::spawn(async move {
      match remote
        .delete_person(deleted.site_id, deleted.user_id, deleted.kind)
        .await
      {
        Ok(()) => {
          tracing::debug!(%mutation_id, "delete confirmed");
          MutationOutcome::Confirmed
        }
        Err(error) => {
          tracing::warn!(%mutation_id, %error, "delete rejected, restoring record");
          match store.restore_person(deleted.clone()).await {
            Ok(()) => MutationOutcome::RolledBack { error, reverted: deleted },
            Err(store_error) => {
              tracing::error!(%mutation_id, %store_error, "rollback of delete failed");
              MutationOutcome::RollbackFailed {
                error,
                store_error: Box::new(store_error),
              }
            }
          }
        }
      }
    });

    Ok(Mutation { mutation_id, person: snapshot, remote: handle })
  }

  // ── Roles ─────────────────────────────────────────────────────────────────

  /// Fetch the site's role definitions and replace the local cache.
  pub async fn refresh_roles(&self, site_id: i64) -> Result<Vec<RoleDefinition>> {
    let definitions = self
      .remote
      .list_roles(site_id)
      .await
      .map_err(Self::remote_err)?;

    self
      .store
      .save_roles(site_id, definitions.clone())
      .await
      .map_err(Self::store_err)?;

    Ok(definitions)
  }

  // ── Invitations ───────────────────────────────────────────────────────────

  /// Ask the remote whether `invitation` would be accepted. Local sanity
  /// checks run first and fail without any network I/O.
  pub async fn validate_invitation(
    &self,
    site_id: i64,
    invitation: Invitation,
  ) -> Result<()> {
    invitation.validate()?;
    self
      .remote
      .validate_invitation(site_id, invitation)
      .await
      .map_err(Self::remote_err)
  }

  /// Send `invitation`.
  pub async fn send_invitation(
    &self,
    site_id: i64,
    invitation: Invitation,
  ) -> Result<()> {
    invitation.validate()?;
    tracing::info!(site_id, recipient = %invitation.recipient, "sending invitation");
    self
      .remote
      .send_invitation(site_id, invitation)
      .await
      .map_err(Self::remote_err)
  }
}

// ─── Rollback helpers ────────────────────────────────────────────────────────

/// Restore `previous_role` on the current local record after a remote
/// rejection. If the record vanished in the meantime there is nothing to
/// write; the pre-call snapshot stands in as the reverted view.
async fn revert_role<S, E>(
  store: &S,
  optimistic: Person,
  snapshot: Person,
  previous_role: Option<Role>,
  error: E,
) -> MutationOutcome<E>
where
  S: PersonStore,
{
  let current = store
    .person(optimistic.site_id, optimistic.user_id, optimistic.kind)
    .await;

  match current {
    Ok(Some(mut person)) => {
      person.role = previous_role;
      match store.update_person(person).await {
        Ok(reverted) => MutationOutcome::RolledBack { error, reverted },
        Err(store_error) => {
          tracing::error!(%store_error, "rollback of role update failed");
          MutationOutcome::RollbackFailed { error, store_error: Box::new(store_error) }
        }
      }
    }
    Ok(None) => MutationOutcome::RolledBack { error, reverted: snapshot },
    Err(store_error) => {
      tracing::error!(%store_error, "rollback of role update failed");
      MutationOutcome::RollbackFailed { error, store_error: Box::new(store_error) }
    }
  }
}
