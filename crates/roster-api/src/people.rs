//! Handlers for `/sites/{site}/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/sites/{site}/people` | Optional `?kind=`, `?search=`, `?limit=`, `?offset=` |
//! | `POST`   | `/sites/{site}/people/{user}/role` | Body: `{"role":"editor"}`; 202 + optimistic view |
//! | `DELETE` | `/sites/{site}/people/{user}?kind=user` | 202 + removed snapshot |
//! | `POST`   | `/sites/{site}/sync?kind=user` | Blocking full sync; 200 + report |
//!
//! Mutating handlers answer as soon as the optimistic local write has landed;
//! they never wait for the remote confirmation.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  person::{Person, PersonKind},
  remote::RemoteGateway,
  role::Role,
  store::{PersonQuery, PersonStore},
};
use roster_service::SyncReport;
use serde::Deserialize;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub kind:   Option<PersonKind>,
  pub search: Option<String>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /sites/{site}/people`
pub async fn list<S, R>(
  State(state): State<AppState<S, R>>,
  Path(site_id): Path<i64>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore + 'static,
  R: RemoteGateway + 'static,
{
  let query = PersonQuery {
    site_id,
    kind: params.kind,
    search: params.search,
    limit: params.limit,
    offset: params.offset,
  };

  let people = state
    .store
    .list_people(query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(people))
}

// ─── Role update ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateRoleBody {
  pub role: Role,
}

/// `POST /sites/{site}/people/{user}/role` — body: `{"role":"editor"}`
pub async fn update_role<S, R>(
  State(state): State<AppState<S, R>>,
  Path((site_id, user_id)): Path<(i64, i64)>,
  Json(body): Json<UpdateRoleBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore + 'static,
  R: RemoteGateway + 'static,
{
  // Role changes only apply to team members.
  let person = state
    .store
    .person(site_id, user_id, PersonKind::User)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("user {user_id} on site {site_id}")))?;

  let mutation = state
    .service
    .update_role(&person, body.role)
    .await
    .map_err(ApiError::from_service)?;

  Ok((StatusCode::ACCEPTED, Json(mutation.person)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct KindParam {
  pub kind: PersonKind,
}

/// `DELETE /sites/{site}/people/{user}?kind=<kind>`
pub async fn remove<S, R>(
  State(state): State<AppState<S, R>>,
  Path((site_id, user_id)): Path<(i64, i64)>,
  Query(params): Query<KindParam>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore + 'static,
  R: RemoteGateway + 'static,
{
  let person = state
    .store
    .person(site_id, user_id, params.kind)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("{} {user_id} on site {site_id}", params.kind))
    })?;

  let mutation = state
    .service
    .delete(&person)
    .await
    .map_err(ApiError::from_service)?;

  Ok((StatusCode::ACCEPTED, Json(mutation.person)))
}

// ─── Sync ─────────────────────────────────────────────────────────────────────

/// `POST /sites/{site}/sync?kind=<kind>`
pub async fn sync<S, R>(
  State(state): State<AppState<S, R>>,
  Path(site_id): Path<i64>,
  Query(params): Query<KindParam>,
) -> Result<Json<SyncReport>, ApiError>
where
  S: PersonStore + 'static,
  R: RemoteGateway + 'static,
{
  let report = state
    .service
    .sync(site_id, params.kind)
    .await
    .map_err(ApiError::from_service)?;
  Ok(Json(report))
}
