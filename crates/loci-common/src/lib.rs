//! Loci Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the loci ingestion workspace.
//!
//! - **Error Handling**: [`LociError`] and the crate-wide [`Result`] alias
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]

pub mod error;
pub mod logging;

pub use error::{LociError, Result};
