//! Transmission — a single posted message in the feed.
//!
//! Transmissions are strictly append-only: created once, never updated, never
//! deleted. Content validation happens at construction so no invalid payload
//! can reach a store backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  subject::{Division, Subject},
};

/// Maximum content length, in characters, after trimming.
pub const MAX_CONTENT_LEN: usize = 280;

/// Trim `content` and check the length bounds.
///
/// Returns the trimmed slice so callers never persist surrounding whitespace.
pub fn validate_content(content: &str) -> Result<&str> {
  let trimmed = content.trim();
  if trimmed.is_empty() {
    return Err(Error::EmptyContent);
  }
  let len = trimmed.chars().count();
  if len > MAX_CONTENT_LEN {
    return Err(Error::ContentTooLong { len, max: MAX_CONTENT_LEN });
  }
  Ok(trimmed)
}

// ─── Ledger linkage ──────────────────────────────────────────────────────────

/// Proof that a transmission went over the ledger before it was persisted.
///
/// The confirmation signature and the posting account always travel together;
/// a transmission either has both or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRef {
  /// Opaque transaction signature as reported by the account capability.
  pub tx_signature:   String,
  /// Address of the account that signed and paid for the transaction.
  pub wallet_address: String,
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A validated, not-yet-persisted transmission.
#[derive(Debug, Clone)]
pub struct NewTransmission {
  content:        String,
  pub subject_id: Option<Uuid>,
  pub ledger:     Option<LedgerRef>,
}

impl NewTransmission {
  /// Validate `content` per [`validate_content`] and build the record.
  pub fn new(
    content: &str,
    subject_id: Option<Uuid>,
    ledger: Option<LedgerRef>,
  ) -> Result<Self> {
    let trimmed = validate_content(content)?;
    Ok(Self { content: trimmed.to_owned(), subject_id, ledger })
  }

  pub fn content(&self) -> &str { &self.content }
}

/// A persisted transmission. Immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transmission {
  pub id:         Uuid,
  pub content:    String,
  /// Weak reference into the subject directory. Carries no ownership; feed
  /// entries outlive any future notion of subject removal.
  pub subject_id: Option<Uuid>,
  #[serde(flatten)]
  pub ledger:     Option<LedgerRef>,
  /// Server-assigned at persistence time; feed order is descending on this,
  /// with insertion order breaking ties.
  pub created_at: DateTime<Utc>,
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// The subject fields shown next to a feed entry, denormalised at write time
/// so reads never fan out into the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectDisplay {
  pub subject_token: String,
  pub division:      Division,
}

impl From<&Subject> for SubjectDisplay {
  fn from(s: &Subject) -> Self {
    Self { subject_token: s.subject_token.clone(), division: s.division }
  }
}

/// A transmission bundled with its resolved subject display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmissionView {
  #[serde(flatten)]
  pub transmission: Transmission,
  pub subject:      Option<SubjectDisplay>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn whitespace_only_content_is_rejected() {
    assert_eq!(validate_content("  "), Err(Error::EmptyContent));
    assert_eq!(validate_content(""), Err(Error::EmptyContent));
    assert_eq!(validate_content("\n\t "), Err(Error::EmptyContent));
  }

  #[test]
  fn over_limit_content_is_rejected() {
    let long = "x".repeat(MAX_CONTENT_LEN + 1);
    assert_eq!(
      validate_content(&long),
      Err(Error::ContentTooLong { len: 281, max: MAX_CONTENT_LEN })
    );
  }

  #[test]
  fn content_at_the_limit_is_accepted() {
    let max = "x".repeat(MAX_CONTENT_LEN);
    assert_eq!(validate_content(&max), Ok(max.as_str()));
  }

  #[test]
  fn surrounding_whitespace_is_trimmed() {
    let tx = NewTransmission::new("  hello \n", None, None).unwrap();
    assert_eq!(tx.content(), "hello");
  }

  #[test]
  fn length_is_measured_after_trimming() {
    // 280 x's padded with whitespace is still a valid payload.
    let padded = format!("  {}  ", "x".repeat(MAX_CONTENT_LEN));
    assert!(NewTransmission::new(&padded, None, None).is_ok());
  }
}
