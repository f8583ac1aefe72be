//! People reconciliation service.
//!
//! The service owns all writes to the local person store. It merges remote
//! listings into local state and applies mutations optimistically: the local
//! write happens immediately, the remote call runs on a spawned task, and a
//! remote rejection triggers a compensating local write that restores the
//! pre-call state.

pub mod error;
pub mod mutation;
pub mod service;

pub use error::{Error, Result};
pub use mutation::{Mutation, MutationOutcome};
pub use service::{FETCH_COUNT, MergeStats, PeopleService, SyncReport};
