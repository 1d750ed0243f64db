//! Handlers for `/transmissions`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/transmissions` | Optional `?limit=`, capped at the feed limit |
//! | `POST` | `/transmissions` | Body: `{"content":"...", "subjectToken":...}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use szl_core::{
  store::{FEED_LIMIT, MainframeStore},
  transmission::{LedgerRef, NewTransmission, TransmissionView},
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /transmissions[?limit=<n>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<TransmissionView>>, ApiError>
where
  S: MainframeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let feed = store
    .list_recent(params.limit.unwrap_or(FEED_LIMIT))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(feed))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub content:        String,
  #[serde(default)]
  pub subject_token:  Option<String>,
  #[serde(default)]
  pub tx_signature:   Option<String>,
  #[serde(default)]
  pub wallet_address: Option<String>,
}

/// `POST /transmissions`
///
/// A `subjectToken` that is not registered posts the transmission unlinked
/// rather than failing; a stale token is not the poster's problem.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MainframeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ledger = match (body.tx_signature, body.wallet_address) {
    (Some(tx_signature), Some(wallet_address)) => {
      Some(LedgerRef { tx_signature, wallet_address })
    }
    (None, None) => None,
    _ => {
      return Err(ApiError::BadRequest(
        "txSignature and walletAddress must be provided together".into(),
      ));
    }
  };

  let subject_id = match body.subject_token.as_deref() {
    Some(token) => store
      .find_subject(token)
      .await
      .map_err(ApiError::store)?
      .map(|s| s.id),
    None => None,
  };

  let record = NewTransmission::new(&body.content, subject_id, ledger)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let view = store
    .append_transmission(record)
    .await
    .map_err(ApiError::store)?;

  Ok((StatusCode::CREATED, Json(view)))
}
