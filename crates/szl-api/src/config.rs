//! Server configuration for the `szl-server` binary.

use std::path::PathBuf;

use serde::Deserialize;

/// Deserialised from `config.toml` plus `SZL_*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:    String,
  #[serde(default = "default_port")]
  pub port:    u16,
  /// Path to the SQLite database file.
  #[serde(default = "default_db_path")]
  pub db_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:    default_host(),
      port:    default_port(),
      db_path: default_db_path(),
    }
  }
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8200 }

fn default_db_path() -> PathBuf { PathBuf::from("szl.db") }
