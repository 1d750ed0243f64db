//! Handler for `GET /subjects/{token}`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use szl_core::{store::MainframeStore, subject::Subject};

use crate::error::ApiError;

/// `GET /subjects/{token}` — 404 if the token is not registered.
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(token): Path<String>,
) -> Result<Json<Subject>, ApiError>
where
  S: MainframeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let subject = store
    .find_subject(&token)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("subject {token} not found")))?;
  Ok(Json(subject))
}
