//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Answers are stored as a
//! compact JSON array. UUIDs are stored as hyphenated lowercase strings.
//! Divisions are stored as their display labels.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use szl_core::{
  subject::{Division, Subject},
  transmission::{LedgerRef, Transmission},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Division ────────────────────────────────────────────────────────────────

pub fn encode_division(d: Division) -> String { d.to_string() }

pub fn decode_division(s: &str) -> Result<Division> {
  Division::from_str(s).map_err(|_| Error::UnknownDivision(s.to_owned()))
}

// ─── Answers ─────────────────────────────────────────────────────────────────

pub fn encode_answers(answers: &[u8]) -> Result<String> {
  Ok(serde_json::to_string(answers)?)
}

pub fn decode_answers(s: &str) -> Result<Vec<u8>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row shells ──────────────────────────────────────────────────────────────

/// Column values for a `subjects` row, before decoding.
pub struct RawSubject {
  pub id:             String,
  pub subject_token:  String,
  pub division:       String,
  pub answers:        String,
  pub wallet_address: Option<String>,
  pub created_at:     String,
}

impl RawSubject {
  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      id:             decode_uuid(&self.id)?,
      subject_token:  self.subject_token,
      division:       decode_division(&self.division)?,
      answers:        decode_answers(&self.answers)?,
      wallet_address: self.wallet_address,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Column values for a `transmissions` row, before decoding.
pub struct RawTransmission {
  pub id:             String,
  pub content:        String,
  pub subject_id:     Option<String>,
  pub tx_signature:   Option<String>,
  pub wallet_address: Option<String>,
  pub created_at:     String,
}

impl RawTransmission {
  pub fn into_transmission(self) -> Result<Transmission> {
    let ledger = match (self.tx_signature, self.wallet_address) {
      (Some(tx_signature), Some(wallet_address)) => {
        Some(LedgerRef { tx_signature, wallet_address })
      }
      (None, None) => None,
      _ => return Err(Error::HalfLedgerRef(self.id)),
    };

    Ok(Transmission {
      id: decode_uuid(&self.id)?,
      content: self.content,
      subject_id: self.subject_id.as_deref().map(decode_uuid).transpose()?,
      ledger,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
