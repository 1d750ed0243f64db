//! The submission flow: one user-initiated post, from raw text to a
//! persisted, ledger-confirmed feed record.
//!
//! Phase diagram (terminal phases reset to `Idle` after a cooldown):
//!
//! ```text
//! Idle → Signing → Confirming → Saving → Success
//!          ╰─────────┴────────────┴────→ Failed(reason)
//! ```
//!
//! Persistence is only ever attempted after the ledger confirms the
//! transaction, and a single in-flight submission is persisted at most once.
//! At-most-one-in-flight holds per flow instance (one per user session), not
//! across sessions.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use uuid::Uuid;

use szl_core::{
  session::SessionIdentity,
  store::MainframeStore,
  transmission::{LedgerRef, NewTransmission, TransmissionView, validate_content},
};

use crate::{
  Error, Result,
  client::{LedgerClient, WalletError, WalletSession},
  memo::build_memo_transaction,
};

// ─── Phases ──────────────────────────────────────────────────────────────────

/// Observable progress of the submission flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitPhase {
  #[default]
  Idle,
  /// The memo transaction is being built and the wallet prompted to sign.
  Signing,
  /// Waiting on the ledger to confirm the submitted transaction.
  Confirming,
  /// Confirmed; persisting the feed record.
  Saving,
  Success,
  /// Terminal for this attempt; carries the user-visible reason.
  Failed(String),
}

impl SubmitPhase {
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Success | Self::Failed(_))
  }
}

/// How long a terminal phase is displayed before the flow resets to idle.
#[derive(Debug, Clone, Copy)]
pub struct Cooldowns {
  pub success: Duration,
  pub error:   Duration,
}

impl Default for Cooldowns {
  fn default() -> Self {
    Self { success: Duration::from_secs(2), error: Duration::from_secs(4) }
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// A successful submission, plus any non-fatal warnings raised along the way.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
  pub view: TransmissionView,
  /// Set when the session's subject could not be resolved and the
  /// transmission was persisted unlinked. Non-fatal by design.
  pub warning: Option<String>,
}

// ─── Flow ────────────────────────────────────────────────────────────────────

/// Drives submissions for one user session over a connected wallet, a ledger
/// client, and a mainframe store.
pub struct SubmitFlow<W, L, S> {
  wallet:    W,
  ledger:    L,
  store:     S,
  phase:     Arc<watch::Sender<SubmitPhase>>,
  cooldowns: Cooldowns,
}

impl<W, L, S> SubmitFlow<W, L, S>
where
  W: WalletSession,
  L: LedgerClient,
  S: MainframeStore,
{
  pub fn new(wallet: W, ledger: L, store: S) -> Self {
    Self::with_cooldowns(wallet, ledger, store, Cooldowns::default())
  }

  pub fn with_cooldowns(
    wallet: W,
    ledger: L,
    store: S,
    cooldowns: Cooldowns,
  ) -> Self {
    let (phase, _) = watch::channel(SubmitPhase::Idle);
    Self { wallet, ledger, store, phase: Arc::new(phase), cooldowns }
  }

  /// Subscribe to phase transitions.
  pub fn subscribe(&self) -> watch::Receiver<SubmitPhase> {
    self.phase.subscribe()
  }

  pub fn phase(&self) -> SubmitPhase { self.phase.borrow().clone() }

  /// Submit `content` as the identity in `session`.
  ///
  /// Refused with [`Error::SubmissionInFlight`] unless the flow is idle;
  /// the refusal leaves any in-flight attempt untouched. Content validation
  /// happens before the idle gate so a bad payload never occupies the flow.
  pub async fn submit(
    &self,
    content: &str,
    session: &SessionIdentity,
  ) -> Result<SubmitOutcome> {
    let trimmed = validate_content(content)?.to_owned();

    // Atomic Idle → Signing gate; at most one submission in flight.
    let entered = self.phase.send_if_modified(|p| {
      if *p == SubmitPhase::Idle {
        *p = SubmitPhase::Signing;
        true
      } else {
        false
      }
    });
    if !entered {
      return Err(Error::SubmissionInFlight);
    }

    match self.run(&trimmed, session).await {
      Ok(outcome) => {
        self.phase.send_replace(SubmitPhase::Success);
        self.reset_after(self.cooldowns.success);
        Ok(outcome)
      }
      Err(err) => {
        tracing::warn!(error = %err, "transmission failed");
        self.phase.send_replace(SubmitPhase::Failed(err.to_string()));
        self.reset_after(self.cooldowns.error);
        Err(err)
      }
    }
  }

  /// The phase body; assumes the flow already holds the Signing slot.
  async fn run(
    &self,
    content: &str,
    session: &SessionIdentity,
  ) -> Result<SubmitOutcome> {
    let (subject_id, warning) = self.resolve_subject(session).await;

    let address = self.wallet.address().to_owned();
    let tx = build_memo_transaction(&self.ledger, &address, content).await?;

    let signature = self.wallet.sign_and_send(&tx).await.map_err(|e| match e {
      WalletError::Declined => Error::UserDeclined,
      WalletError::Wallet(msg) => Error::UpstreamUnavailable(msg),
    })?;
    tracing::debug!(%signature, "transaction submitted; awaiting confirmation");
    self.phase.send_replace(SubmitPhase::Confirming);

    self
      .ledger
      .confirm_transaction(&signature)
      .await
      .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;
    self.phase.send_replace(SubmitPhase::Saving);

    let record = NewTransmission::new(
      content,
      subject_id,
      Some(LedgerRef { tx_signature: signature, wallet_address: address }),
    )?;
    let view = self
      .store
      .append_transmission(record)
      .await
      .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

    tracing::info!(id = %view.transmission.id, "transmission persisted");
    Ok(SubmitOutcome { view, warning })
  }

  /// Resolve the session's subject token to a directory id.
  ///
  /// A lookup failure is a non-fatal side-channel: the transmission goes out
  /// unlinked and the outcome carries a warning the caller can surface.
  async fn resolve_subject(
    &self,
    session: &SessionIdentity,
  ) -> (Option<Uuid>, Option<String>) {
    let Some(token) = session.subject_token() else {
      return (None, None);
    };
    match self.store.find_subject(token).await {
      Ok(Some(subject)) => (Some(subject.id), None),
      Ok(None) => (
        None,
        Some(format!("subject {token} is not registered; posting unlinked")),
      ),
      Err(e) => {
        tracing::warn!(error = %e, token, "subject lookup failed");
        (None, Some(format!("subject lookup failed: {e}; posting unlinked")))
      }
    }
  }

  fn reset_after(&self, cooldown: Duration) {
    let phase = Arc::clone(&self.phase);
    tokio::spawn(async move {
      tokio::time::sleep(cooldown).await;
      phase.send_replace(SubmitPhase::Idle);
    });
  }
}
