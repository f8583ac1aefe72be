//! HTTP implementation of the Roster remote gateway.
//!
//! Talks to a WordPress.com-style people REST API using a configured bearer
//! token. The gateway only fetches and acknowledges; it never touches the
//! local store.

pub mod error;
mod wire;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use roster_core::{
  invitation::Invitation,
  person::PersonKind,
  remote::{PeoplePage, RemoteGateway, RemotePerson},
  role::{Role, RoleDefinition},
};
use serde_json::json;

use wire::{InviteResponse, ListResponse, RoleDto, RolesResponse};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection settings for the remote people API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
  pub base_url: String,
  /// OAuth2 bearer token. Obtaining it is the caller's problem.
  pub token:    String,
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Async HTTP client implementing [`RemoteGateway`].
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpGateway {
  client: Client,
  config: GatewayConfig,
}

impl HttpGateway {
  pub fn new(config: GatewayConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/rest/v1.1{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    req.bearer_auth(&self.config.token)
  }

  /// The path segment naming a kind's collection.
  fn segment(kind: PersonKind) -> &'static str {
    match kind {
      PersonKind::User => "users",
      PersonKind::Follower => "followers",
      PersonKind::Viewer => "viewers",
    }
  }

  /// Turn a non-success status into [`Error::Http`].
  async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(Error::Http { status: status.as_u16(), message })
  }

  /// Invitation endpoints report per-recipient failures inside a 200.
  async fn check_invite(resp: Response) -> Result<()> {
    let resp = Self::check(resp).await?;
    let body: InviteResponse =
      resp.json().await.map_err(|e| Error::Decode(e.to_string()))?;
    if body.errors.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation { messages: body.errors })
    }
  }
}

// ─── RemoteGateway impl ──────────────────────────────────────────────────────

impl RemoteGateway for HttpGateway {
  type Error = Error;

  async fn list_people(
    &self,
    site_id: i64,
    kind: PersonKind,
    offset: usize,
    count: usize,
  ) -> Result<PeoplePage> {
    let segment = Self::segment(kind);
    tracing::debug!(site_id, %kind, offset, count, "listing people");

    let resp = self
      .auth(self.client.get(self.url(&format!("/sites/{site_id}/{segment}"))))
      .query(&[("offset", offset.to_string()), ("number", count.to_string())])
      .send()
      .await?;
    let resp = Self::check(resp).await?;

    let body: ListResponse =
      resp.json().await.map_err(|e| Error::Decode(e.to_string()))?;

    let has_more = offset + body.people.len() < body.found;
    let people: Vec<RemotePerson> = body
      .people
      .into_iter()
      .map(|dto| dto.into_remote_person(kind))
      .collect();

    Ok(PeoplePage { people, has_more })
  }

  async fn update_role(&self, site_id: i64, user_id: i64, role: Role) -> Result<()> {
    tracing::debug!(site_id, user_id, %role, "updating role");

    let resp = self
      .auth(
        self
          .client
          .post(self.url(&format!("/sites/{site_id}/users/{user_id}/role"))),
      )
      .json(&json!({ "role": role.slug() }))
      .send()
      .await?;
    Self::check(resp).await?;
    Ok(())
  }

  async fn delete_person(
    &self,
    site_id: i64,
    user_id: i64,
    kind: PersonKind,
  ) -> Result<()> {
    let segment = Self::segment(kind);
    tracing::debug!(site_id, user_id, %kind, "deleting person");

    let resp = self
      .auth(
        self
          .client
          .post(self.url(&format!("/sites/{site_id}/{segment}/{user_id}/delete"))),
      )
      .send()
      .await?;
    Self::check(resp).await?;
    Ok(())
  }

  async fn list_roles(&self, site_id: i64) -> Result<Vec<RoleDefinition>> {
    let resp = self
      .auth(self.client.get(self.url(&format!("/sites/{site_id}/roles"))))
      .send()
      .await?;
    let resp = Self::check(resp).await?;

    let body: RolesResponse =
      resp.json().await.map_err(|e| Error::Decode(e.to_string()))?;
    Ok(body.roles.into_iter().map(RoleDto::into_definition).collect())
  }

  async fn validate_invitation(
    &self,
    site_id: i64,
    invitation: Invitation,
  ) -> Result<()> {
    let resp = self
      .auth(
        self
          .client
          .post(self.url(&format!("/sites/{site_id}/invites/validate"))),
      )
      .json(&json!({
        "invitees": [invitation.recipient],
        "role": invitation.role.slug(),
      }))
      .send()
      .await?;
    Self::check_invite(resp).await
  }

  async fn send_invitation(&self, site_id: i64, invitation: Invitation) -> Result<()> {
    tracing::debug!(site_id, recipient = %invitation.recipient, "sending invitation");

    let resp = self
      .auth(
        self
          .client
          .post(self.url(&format!("/sites/{site_id}/invites/new"))),
      )
      .json(&json!({
        "invitees": [invitation.recipient],
        "role": invitation.role.slug(),
        "message": invitation.message,
      }))
      .send()
      .await?;
    Self::check_invite(resp).await
  }
}
