//! Error type for `szl-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown division label: {0:?}")]
  UnknownDivision(String),

  /// A transmission row carried a signature without an address or vice
  /// versa. The CHECK constraint makes this unreachable for rows we wrote.
  #[error("transmission {0} has a half-populated ledger reference")]
  HalfLedgerRef(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
