//! Display helpers for linking a confirmed transmission back to the chain.

use serde::{Deserialize, Serialize};

/// Which cluster a signature should link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
  #[default]
  Devnet,
  MainnetBeta,
}

/// Explorer URL for a confirmed transaction signature.
pub fn explorer_url(signature: &str, cluster: Cluster) -> String {
  let base = "https://explorer.solana.com/tx";
  match cluster {
    Cluster::MainnetBeta => format!("{base}/{signature}"),
    Cluster::Devnet => format!("{base}/{signature}?cluster=devnet"),
  }
}

/// Shorten an account address for display: `chars` from each end around an
/// ellipsis.
pub fn truncate_address(address: &str, chars: usize) -> String {
  if address.len() <= chars * 2 {
    return address.to_owned();
  }
  format!("{}...{}", &address[..chars], &address[address.len() - chars..])
}
