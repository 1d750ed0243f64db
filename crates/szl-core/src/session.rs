//! Session-scoped identity context.
//!
//! Who the current user claims to be is an explicit value handed to the
//! components that need it, not ambient state reached into from arbitrary
//! call sites. The record mirrors what the browser keeps locally after
//! initiation; the directory copy (when one exists) is authoritative for the
//! database id.

use serde::{Deserialize, Serialize};

use crate::subject::Division;

/// The locally retained outcome of a completed initiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiationRecord {
  pub subject_token:  String,
  pub division:       Division,
  pub answers:        Vec<u8>,
  pub wallet_address: Option<String>,
}

/// Identity context for one user session.
///
/// Identity is self-asserted: holding a token proves nothing and grants
/// nothing beyond feed attribution.
#[derive(Debug, Clone, Default)]
pub struct SessionIdentity {
  initiation: Option<InitiationRecord>,
}

impl SessionIdentity {
  /// A session that has not completed initiation.
  pub fn anonymous() -> Self { Self { initiation: None } }

  pub fn initiated(record: InitiationRecord) -> Self {
    Self { initiation: Some(record) }
  }

  pub fn subject_token(&self) -> Option<&str> {
    self.initiation.as_ref().map(|r| r.subject_token.as_str())
  }

  pub fn initiation(&self) -> Option<&InitiationRecord> {
    self.initiation.as_ref()
  }
}
