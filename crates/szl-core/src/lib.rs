//! Core types and trait definitions for the SZL mainframe.
//!
//! This crate is deliberately free of HTTP, database, and async-runtime
//! dependencies. All other crates depend on it; it depends on nothing
//! proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod reaction;
pub mod session;
pub mod store;
pub mod subject;
pub mod transmission;

pub use error::{Error, Result};
