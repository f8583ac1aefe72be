//! Error type for `roster-service`.
//!
//! The service is generic over its store and gateway, so their concrete
//! error types are boxed here. Remote failures of optimistic mutations do
//! not surface through this type at all; they arrive typed inside
//! [`crate::MutationOutcome`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("remote error: {0}")]
  Remote(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Invitation(#[from] roster_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
