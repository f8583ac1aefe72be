//! Handlers for `/sites/{site}/invitations` endpoints.

use axum::{
  extract::{Path, State},
  http::StatusCode,
  Json,
};
use roster_core::{invitation::Invitation, remote::RemoteGateway, store::PersonStore};

use crate::{AppState, error::ApiError};

/// `POST /sites/{site}/invitations/validate` — 204 if the invitation would
/// be accepted.
pub async fn validate<S, R>(
  State(state): State<AppState<S, R>>,
  Path(site_id): Path<i64>,
  Json(invitation): Json<Invitation>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore + 'static,
  R: RemoteGateway + 'static,
{
  state
    .service
    .validate_invitation(site_id, invitation)
    .await
    .map_err(ApiError::from_service)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /sites/{site}/invitations` — 202 once the remote has queued it.
pub async fn send<S, R>(
  State(state): State<AppState<S, R>>,
  Path(site_id): Path<i64>,
  Json(invitation): Json<Invitation>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore + 'static,
  R: RemoteGateway + 'static,
{
  state
    .service
    .send_invitation(site_id, invitation)
    .await
    .map_err(ApiError::from_service)?;
  Ok(StatusCode::ACCEPTED)
}
