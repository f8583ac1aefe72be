//! Handlers for `/sites/{site}/roles` endpoints.

use axum::{
  Json,
  extract::{Path, State},
};
use roster_core::{remote::RemoteGateway, role::RoleDefinition, store::PersonStore};

use crate::{AppState, error::ApiError};

/// `GET /sites/{site}/roles` — the locally cached definitions.
pub async fn list<S, R>(
  State(state): State<AppState<S, R>>,
  Path(site_id): Path<i64>,
) -> Result<Json<Vec<RoleDefinition>>, ApiError>
where
  S: PersonStore + 'static,
  R: RemoteGateway + 'static,
{
  let roles = state
    .store
    .roles(site_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(roles))
}

/// `POST /sites/{site}/roles/refresh` — refetch from the remote, replace the
/// cache, return the fresh set.
pub async fn refresh<S, R>(
  State(state): State<AppState<S, R>>,
  Path(site_id): Path<i64>,
) -> Result<Json<Vec<RoleDefinition>>, ApiError>
where
  S: PersonStore + 'static,
  R: RemoteGateway + 'static,
{
  let roles = state
    .service
    .refresh_roles(site_id)
    .await
    .map_err(ApiError::from_service)?;
  Ok(Json(roles))
}
