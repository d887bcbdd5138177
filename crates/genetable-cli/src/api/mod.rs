//! Entrez E-utilities client
//!
//! URL builders, response types, and the retrying HTTP client.

pub mod client;
pub mod endpoints;
pub mod retry;
pub mod types;

pub use client::EntrezClient;
pub use types::ESearchResult;
