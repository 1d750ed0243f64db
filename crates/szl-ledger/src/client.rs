//! Capability interfaces for the two external collaborators: the ledger RPC
//! node and the user's wallet.
//!
//! Both are defined as traits and consumed generically. Timeout policy lives
//! entirely behind these interfaces — the submission flow imposes no deadline
//! of its own.

use std::future::Future;

use thiserror::Error;

use crate::memo::{Blockhash, MemoTransaction};

// ─── Ledger client ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LedgerError {
  #[error("rpc error: {0}")]
  Rpc(String),

  #[error("transaction {signature} failed confirmation: {reason}")]
  ConfirmationFailed { signature: String, reason: String },
}

/// A JSON-RPC-style ledger endpoint.
pub trait LedgerClient: Send + Sync {
  /// Fetch the current freshness reference used to bound a transaction's
  /// validity window.
  fn latest_blockhash(
    &self,
  ) -> impl Future<Output = Result<Blockhash, LedgerError>> + Send + '_;

  /// Suspend until the transaction identified by `signature` is confirmed,
  /// or fail. The flow holds in its confirming phase for the duration.
  fn confirm_transaction<'a>(
    &'a self,
    signature: &'a str,
  ) -> impl Future<Output = Result<(), LedgerError>> + Send + 'a;
}

// ─── Wallet session ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum WalletError {
  /// The user declined the signature prompt.
  #[error("user rejected the request")]
  Declined,

  #[error("wallet error: {0}")]
  Wallet(String),
}

/// A connected wallet: an account address plus sign-and-send.
///
/// A value of this type implies a live connection; connect/disconnect
/// handshakes happen before a session is handed to the submission flow.
pub trait WalletSession: Send + Sync {
  /// Address of the connected account.
  fn address(&self) -> &str;

  /// Ask the wallet to sign `tx` and submit it to the ledger. Resolves to
  /// the transaction signature usable as a confirmation handle.
  fn sign_and_send<'a>(
    &'a self,
    tx: &'a MemoTransaction,
  ) -> impl Future<Output = Result<String, WalletError>> + Send + 'a;
}
