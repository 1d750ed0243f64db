//! The `MainframeStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `szl-store-sqlite`).
//! Higher layers (`szl-api`, the submission flow in `szl-ledger`) depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  subject::{NewSubject, Subject},
  transmission::{NewTransmission, TransmissionView},
};

/// Hard cap on a single feed read. `list_recent` never returns more rows than
/// this even when asked to.
pub const FEED_LIMIT: usize = 100;

/// Abstraction over the subject directory and transmission feed backend.
///
/// Subjects are written once and never mutated; transmissions are append-only.
/// Reads never fail on absence — a missing subject is `None` and an empty feed
/// is an empty vec.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MainframeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Subject directory ─────────────────────────────────────────────────

  /// Idempotent create: if a subject with `input.subject_token` already
  /// exists, return it unchanged and ignore every other field of `input`.
  ///
  /// Must be safe under concurrent calls with the same token — at most one
  /// record per token is ever persisted, enforced by a uniqueness constraint
  /// at the storage boundary rather than application-level locking.
  fn get_or_create_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  /// Look a subject up by token. Returns `None` if not found.
  fn find_subject<'a>(
    &'a self,
    subject_token: &'a str,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + 'a;

  // ── Transmission feed ─────────────────────────────────────────────────

  /// Persist a transmission with a store-assigned timestamp and return it
  /// with its subject display fields resolved.
  fn append_transmission(
    &self,
    input: NewTransmission,
  ) -> impl Future<Output = Result<TransmissionView, Self::Error>> + Send + '_;

  /// Up to `min(limit, FEED_LIMIT)` transmissions, newest first, ties broken
  /// by insertion order.
  fn list_recent(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<TransmissionView>, Self::Error>> + Send + '_;
}

/// Shared ownership delegates to the underlying store.
impl<T: MainframeStore> MainframeStore for std::sync::Arc<T> {
  type Error = T::Error;

  fn get_or_create_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_ {
    (**self).get_or_create_subject(input)
  }

  fn find_subject<'a>(
    &'a self,
    subject_token: &'a str,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + 'a {
    (**self).find_subject(subject_token)
  }

  fn append_transmission(
    &self,
    input: NewTransmission,
  ) -> impl Future<Output = Result<TransmissionView, Self::Error>> + Send + '_ {
    (**self).append_transmission(input)
  }

  fn list_recent(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<TransmissionView>, Self::Error>> + Send + '_ {
    (**self).list_recent(limit)
  }
}
