//! The observable life of an optimistic mutation.
//!
//! A mutation is applied locally before the remote has seen it. The only
//! states a caller can observe are "applied locally" (the returned view) and
//! the terminal outcome reached when the remote answers. There is no
//! distinct pending state.

use roster_core::person::Person;
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

/// Terminal state of an optimistic mutation.
#[derive(Debug)]
pub enum MutationOutcome<E> {
  /// The remote accepted the mutation. The optimistic local state stands;
  /// no second local write was performed.
  Confirmed,

  /// The remote rejected the mutation and the pre-call local state was
  /// restored. `reverted` is the record as it reads after the rollback.
  RolledBack { error: E, reverted: Person },

  /// The remote rejected the mutation and the compensating local write
  /// failed as well. The local store may be inconsistent with the remote.
  RollbackFailed {
    error:       E,
    store_error: Box<dyn std::error::Error + Send + Sync>,
  },

  /// The record was not found locally. Nothing was written and no remote
  /// call was issued.
  Skipped,
}

impl<E> MutationOutcome<E> {
  pub fn is_confirmed(&self) -> bool { matches!(self, Self::Confirmed) }

  pub fn is_rolled_back(&self) -> bool {
    matches!(self, Self::RolledBack { .. })
  }
}

/// Handle to an in-flight optimistic mutation.
///
/// `person` reflects the local state right after the optimistic write (for a
/// delete, the snapshot that was removed). Awaiting `remote` yields the
/// terminal outcome; dropping the handle cancels nothing — the remote call
/// and any rollback still run to completion.
#[derive(Debug)]
pub struct Mutation<E> {
  /// Correlation id tying log lines of this mutation together.
  pub mutation_id: Uuid,
  pub person:      Person,
  pub remote:      JoinHandle<MutationOutcome<E>>,
}

impl<E: Send + 'static> Mutation<E> {
  /// Await the terminal outcome. Fails only if the background task panicked.
  pub async fn outcome(self) -> Result<MutationOutcome<E>, JoinError> {
    self.remote.await
  }

  pub(crate) fn skipped(mutation_id: Uuid, person: Person) -> Self {
    Self {
      mutation_id,
      person,
      remote: tokio::spawn(async { MutationOutcome::Skipped }),
    }
  }
}
