//! Invitations — adding a collaborator who does not yet follow the site.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, role::Role};

/// Maximum length the remote accepts for an invitation message.
pub const MAX_MESSAGE_LEN: usize = 500;

/// An invitation to join a site with a given role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
  /// A username or an email address.
  pub recipient: String,
  pub role:      Role,
  pub message:   Option<String>,
}

impl Invitation {
  pub fn new(recipient: impl Into<String>, role: Role) -> Self {
    Self { recipient: recipient.into(), role, message: None }
  }

  /// Local sanity checks applied before any network call.
  ///
  /// The remote performs its own validation (unknown usernames, already a
  /// member, etc.); this only rejects requests that can never succeed.
  pub fn validate(&self) -> Result<()> {
    if self.recipient.trim().is_empty() {
      return Err(Error::InvalidInvitation("recipient is empty".to_string()));
    }
    if let Some(message) = &self.message
      && message.chars().count() > MAX_MESSAGE_LEN
    {
      return Err(Error::InvalidInvitation(format!(
        "message exceeds {MAX_MESSAGE_LEN} characters"
      )));
    }
    Ok(())
  }
}
