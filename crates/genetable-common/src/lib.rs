//! genetable common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging setup, and error handling for the genetable workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`GeneTableError`] and the [`Result`] alias
//! - **Logging**: structured `tracing` setup shared by every binary
//! - **Types**: record identifiers and taxonomic ranks
//!
//! # Example
//!
//! ```no_run
//! use genetable_common::{Result, types::RecordId};
//!
//! fn first_id(raw: &str) -> Result<RecordId> {
//!     raw.parse()
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{GeneTableError, Result};
