//! Error types for the genetable CLI
//!
//! Messages are user-facing: each one says what went wrong and, where there
//! is one, what to try next.

use genetable_common::GeneTableError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Transport-level HTTP failure
    #[error("Network request failed: {0}. Check your internet connection and the E-utilities base URL.")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Request to {url} failed with HTTP {status}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    /// A transient failure persisted through every retry
    #[error("Giving up after {attempts} attempts (NCBI may be rate limiting; set NCBI_API_KEY or retry later). Last error: {last}")]
    RetriesExhausted { attempts: u32, last: Box<CliError> },

    /// One efetch batch failed; the run stops there
    #[error("Fetching batch {batch} of {batches} failed: {source}")]
    Batch {
        batch: usize,
        batches: usize,
        source: Box<CliError>,
    },

    /// Entrez reported an error inside a successful response
    #[error("Entrez rejected the request: {0}. Check the search term and database name.")]
    Entrez(String),

    /// Response body could not be understood
    #[error("Malformed response from Entrez: {0}")]
    MalformedResponse(String),

    /// Chart could not be written
    #[error("Failed to write chart: {0}")]
    Chart(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your command-line flags and environment variables.")]
    Config(String),

    /// File system or stdout failure
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the shared library
    #[error(transparent)]
    Common(#[from] GeneTableError),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a chart error
    pub fn chart(msg: impl Into<String>) -> Self {
        Self::Chart(msg.into())
    }

    /// Whether retrying the same request could succeed.
    ///
    /// Connection failures, timeouts, HTTP 429 and 5xx are transient. Every
    /// other failure is permanent and retrying would only repeat it.
    pub fn is_transient(&self) -> bool {
        match self {
            CliError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_some_and(is_transient_status)
            },
            CliError::HttpStatus { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }
}

fn is_transient_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
