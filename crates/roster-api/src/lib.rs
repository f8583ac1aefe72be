//! JSON REST surface for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`PersonStore`] and
//! [`RemoteGateway`] pair. Auth, TLS, and transport concerns are the
//! caller's responsibility. Mutating routes answer after the optimistic
//! local write; the remote confirmation happens in the background.

pub mod error;
pub mod invitations;
pub mod people;
pub mod roles;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use roster_core::{remote::RemoteGateway, store::PersonStore};
use roster_service::PeopleService;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  pub remote_base_url: String,
  pub remote_token:    String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
///
/// Reads go straight to the store; every write goes through the service.
pub struct AppState<S, R> {
  pub store:   Arc<S>,
  pub service: Arc<PeopleService<S, R>>,
}

// Manual impl: `#[derive(Clone)]` would demand `S: Clone` and `R: Clone`.
impl<S, R> Clone for AppState<S, R> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      service: Arc::clone(&self.service),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S, R>(state: AppState<S, R>) -> Router
where
  S: PersonStore + 'static,
  R: RemoteGateway + 'static,
{
  Router::new()
    // People
    .route("/sites/{site}/people", get(people::list::<S, R>))
    .route(
      "/sites/{site}/people/{user}/role",
      post(people::update_role::<S, R>),
    )
    .route("/sites/{site}/people/{user}", delete(people::remove::<S, R>))
    .route("/sites/{site}/sync", post(people::sync::<S, R>))
    // Roles
    .route("/sites/{site}/roles", get(roles::list::<S, R>))
    .route("/sites/{site}/roles/refresh", post(roles::refresh::<S, R>))
    // Invitations
    .route(
      "/sites/{site}/invitations/validate",
      post(invitations::validate::<S, R>),
    )
    .route("/sites/{site}/invitations", post(invitations::send::<S, R>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use roster_core::{
    invitation::Invitation,
    person::{NewPerson, PersonKind},
    remote::{PeoplePage, RemotePerson},
    role::{Role, RoleDefinition},
  };
  use roster_store_sqlite::SqlitePersonStore;
  use tower::ServiceExt as _;

  #[derive(Debug, thiserror::Error)]
  #[error("stub remote error")]
  struct StubError;

  /// Gateway that acknowledges every mutation and serves one canned page.
  struct StubGateway;

  fn canned_person() -> RemotePerson {
    RemotePerson {
      user_id:        7,
      kind:           PersonKind::User,
      login:          "alice".to_string(),
      display_name:   "Alice".to_string(),
      first_name:     None,
      last_name:      None,
      email:          None,
      avatar_url:     None,
      role:           Some(Role::Editor),
      is_super_admin: false,
    }
  }

  impl RemoteGateway for StubGateway {
    type Error = StubError;

    async fn list_people(
      &self,
      _site_id: i64,
      _kind: PersonKind,
      _offset: usize,
      _count: usize,
    ) -> Result<PeoplePage, StubError> {
      Ok(PeoplePage { people: vec![canned_person()], has_more: false })
    }

    async fn update_role(
      &self,
      _site_id: i64,
      _user_id: i64,
      _role: Role,
    ) -> Result<(), StubError> {
      Ok(())
    }

    async fn delete_person(
      &self,
      _site_id: i64,
      _user_id: i64,
      _kind: PersonKind,
    ) -> Result<(), StubError> {
      Ok(())
    }

    async fn list_roles(&self, _site_id: i64) -> Result<Vec<RoleDefinition>, StubError> {
      Ok(vec![RoleDefinition { slug: Role::Editor, name: "Editor".to_string() }])
    }

    async fn validate_invitation(
      &self,
      _site_id: i64,
      _invitation: Invitation,
    ) -> Result<(), StubError> {
      Ok(())
    }

    async fn send_invitation(
      &self,
      _site_id: i64,
      _invitation: Invitation,
    ) -> Result<(), StubError> {
      Ok(())
    }
  }

  async fn make_state() -> AppState<SqlitePersonStore, StubGateway> {
    let store = Arc::new(SqlitePersonStore::open_in_memory().await.unwrap());
    let gateway = Arc::new(StubGateway);
    let service = Arc::new(PeopleService::new(Arc::clone(&store), gateway));
    AppState { store, service }
  }

  async fn seed_editor(state: &AppState<SqlitePersonStore, StubGateway>) {
    let mut input = NewPerson::new(1, 7, PersonKind::User, "alice", "Alice");
    input.role = Some(Role::Editor);
    state.store.insert_person(input).await.unwrap();
  }

  async fn oneshot_json(
    state: AppState<SqlitePersonStore, StubGateway>,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── People ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_people_empty_returns_200() {
    let state = make_state().await;
    let resp = oneshot_json(state, "GET", "/sites/1/people", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!([]));
  }

  #[tokio::test]
  async fn update_role_returns_202_with_optimistic_view() {
    let state = make_state().await;
    seed_editor(&state).await;

    let resp = oneshot_json(
      state.clone(),
      "POST",
      "/sites/1/people/7/role",
      Some(serde_json::json!({ "role": "author" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let body = body_json(resp).await;
    assert_eq!(body["role"], "author");
  }

  #[tokio::test]
  async fn update_role_unknown_user_returns_404() {
    let state = make_state().await;
    let resp = oneshot_json(
      state,
      "POST",
      "/sites/1/people/999/role",
      Some(serde_json::json!({ "role": "author" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_returns_202_and_removes_locally() {
    let state = make_state().await;
    seed_editor(&state).await;

    let resp = oneshot_json(
      state.clone(),
      "DELETE",
      "/sites/1/people/7?kind=user",
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let gone = state.store.person(1, 7, PersonKind::User).await.unwrap();
    assert!(gone.is_none());
  }

  #[tokio::test]
  async fn sync_returns_report() {
    let state = make_state().await;
    let resp =
      oneshot_json(state.clone(), "POST", "/sites/1/sync?kind=user", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["merged"], 1);

    let merged = state.store.person(1, 7, PersonKind::User).await.unwrap();
    assert!(merged.is_some());
  }

  // ── Roles ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn refresh_then_list_roles() {
    let state = make_state().await;

    let refresh =
      oneshot_json(state.clone(), "POST", "/sites/1/roles/refresh", None).await;
    assert_eq!(refresh.status(), StatusCode::OK);

    let list = oneshot_json(state, "GET", "/sites/1/roles", None).await;
    assert_eq!(list.status(), StatusCode::OK);
    let body = body_json(list).await;
    assert_eq!(body[0]["slug"], "editor");
  }

  // ── Invitations ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn invitation_with_empty_recipient_returns_422() {
    let state = make_state().await;
    let resp = oneshot_json(
      state,
      "POST",
      "/sites/1/invitations",
      Some(serde_json::json!({ "recipient": "  ", "role": "editor" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn valid_invitation_returns_202() {
    let state = make_state().await;
    let resp = oneshot_json(
      state,
      "POST",
      "/sites/1/invitations",
      Some(serde_json::json!({
        "recipient": "bob@example.com",
        "role": "author",
        "message": "welcome aboard"
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
  }
}
