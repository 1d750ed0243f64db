//! Memo transaction construction.
//!
//! Builds the unsigned transaction that carries a transmission's content as
//! an on-ledger memo. Construction is pure apart from fetching the freshness
//! reference; nothing is submitted here.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  client::LedgerClient,
};

/// Freshness reference fetched from the ledger immediately before a
/// transaction is built. Bounds how long the transaction stays submittable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blockhash {
  pub hash:                    String,
  pub last_valid_block_height: u64,
}

/// An unsigned memo transaction, ready for the wallet to sign and send.
///
/// The memo is attributed to `fee_payer`, which is also the account that
/// signs and pays for the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoTransaction {
  pub fee_payer:        String,
  pub memo:             String,
  pub recent_blockhash: Blockhash,
}

/// Build an unsigned memo transaction for `fee_payer` carrying `memo`.
///
/// Fails with [`Error::UpstreamUnavailable`] when the freshness reference
/// cannot be obtained.
pub async fn build_memo_transaction<L: LedgerClient>(
  ledger: &L,
  fee_payer: &str,
  memo: &str,
) -> Result<MemoTransaction> {
  let recent_blockhash = ledger
    .latest_blockhash()
    .await
    .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

  Ok(MemoTransaction {
    fee_payer: fee_payer.to_owned(),
    memo:      memo.to_owned(),
    recent_blockhash,
  })
}
