//! Error type for `roster-remote`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The request never produced a response (DNS, TLS, timeout, ...).
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// The response body did not parse as the expected shape.
  #[error("decode error: {0}")]
  Decode(String),

  /// The remote answered with a non-success status.
  #[error("remote returned {status}: {message}")]
  Http { status: u16, message: String },

  /// The invitation endpoints rejected one or more recipients.
  #[error("invitation rejected: {}", messages.join("; "))]
  Validation { messages: Vec<String> },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
