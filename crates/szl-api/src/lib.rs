//! JSON HTTP API for SZL.
//!
//! Exposes an axum [`Router`] backed by any [`szl_core::store::MainframeStore`].
//! There is no authentication: identity is self-asserted by the client, and
//! holding a subject token grants nothing beyond feed attribution. TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", szl_api::api_router(store.clone()))
//! ```

pub mod config;
pub mod error;
pub mod initiation;
pub mod subjects;
pub mod transmissions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use szl_core::store::MainframeStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: MainframeStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Initiation (subject directory)
    .route("/initiation", post(initiation::create::<S>))
    .route("/subjects/{token}", get(subjects::get_one::<S>))
    // Transmission feed
    .route(
      "/transmissions",
      get(transmissions::list::<S>).post(transmissions::create::<S>),
    )
    .with_state(store)
}
