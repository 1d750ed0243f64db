//! Error taxonomy for the submission flow.
//!
//! Every failure a user can hit is classified into one of these variants at
//! the flow boundary; the `Display` string is the user-visible reason.

use thiserror::Error;

/// A submission-flow failure.
#[derive(Debug, Error)]
pub enum Error {
  /// Bad input shape or length. User-correctable; surfaced verbatim.
  #[error(transparent)]
  Validation(#[from] szl_core::Error),

  /// The freshness reference or the confirmation could not be obtained.
  /// Retryable by re-running the whole flow from idle.
  #[error("ledger unavailable: {0}")]
  UpstreamUnavailable(String),

  /// The user rejected the signature request in their wallet. Not a fault.
  #[error("transmission cancelled by user")]
  UserDeclined,

  /// Persistence failed after the ledger already confirmed the transaction.
  /// The on-chain effect exists; the feed record does not. This window is
  /// surfaced, not hidden — there is no compensating action.
  #[error("mainframe store unavailable: {0}")]
  StoreUnavailable(String),

  /// A submission is already in flight in this session; the new attempt was
  /// refused without touching the one in progress.
  #[error("a transmission is already in flight")]
  SubmissionInFlight,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
