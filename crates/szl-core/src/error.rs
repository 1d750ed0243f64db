//! Error types for `szl-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("transmission content is empty")]
  EmptyContent,

  #[error("transmission content is {len} characters; the limit is {max}")]
  ContentTooLong { len: usize, max: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
