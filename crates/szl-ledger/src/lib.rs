//! Ledger-side plumbing for SZL: capability interfaces for the external
//! wallet and RPC node, the memo transaction builder, and the submission
//! flow that drives one post from raw text to a persisted, on-ledger-confirmed
//! record.
//!
//! Nothing in this crate talks to a real chain. The wallet and the RPC node
//! are collaborators consumed through the [`client`] traits; callers wire in
//! whatever implementation their environment provides.

// Native `async fn` in traits; see szl-core for rationale.
#![allow(async_fn_in_trait)]

pub mod client;
pub mod error;
pub mod explorer;
pub mod memo;
pub mod submit;

pub use error::{Error, Result};
pub use memo::{Blockhash, MemoTransaction, build_memo_transaction};
pub use submit::{Cooldowns, SubmitFlow, SubmitOutcome, SubmitPhase};

#[cfg(test)]
mod tests;
