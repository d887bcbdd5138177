//! Error types shared across genetable crates

use thiserror::Error;

/// Result type alias for shared operations
pub type Result<T> = std::result::Result<T, GeneTableError>;

/// Main error type for genetable
#[derive(Error, Debug)]
pub enum GeneTableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record identifier: '{0}'")]
    InvalidRecordId(String),

    #[error("Invalid taxonomic rank: '{0}'")]
    InvalidRank(String),
}
