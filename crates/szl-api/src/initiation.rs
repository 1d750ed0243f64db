//! Handler for `POST /initiation`.
//!
//! The browser mirrors a completed initiation to the mainframe here. The
//! operation is a get-or-create: replaying the request (or racing it from two
//! tabs) returns the already-registered subject unchanged.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use szl_core::{
  store::MainframeStore,
  subject::{Division, NewSubject, Subject},
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiationBody {
  pub subject_token:  String,
  pub division:       Division,
  pub answers:        Vec<u8>,
  #[serde(default)]
  pub wallet_address: Option<String>,
}

/// `POST /initiation` — body:
/// `{"subjectToken":"SZL-AB3KQ","division":"VOID WALKERS","answers":[0,2,1,3,0]}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<InitiationBody>,
) -> Result<Json<Subject>, ApiError>
where
  S: MainframeStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.subject_token.trim().is_empty() {
    return Err(ApiError::BadRequest("subjectToken must not be empty".into()));
  }
  if body.answers.is_empty() {
    return Err(ApiError::BadRequest("answers must not be empty".into()));
  }

  let subject = store
    .get_or_create_subject(NewSubject {
      subject_token:  body.subject_token,
      division:       body.division,
      answers:        body.answers,
      wallet_address: body.wallet_address,
    })
    .await
    .map_err(ApiError::store)?;

  Ok(Json(subject))
}
