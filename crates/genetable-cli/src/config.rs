//! Configuration for a genetable run
//!
//! Settings are layered: compiled defaults, then `.env`, then environment
//! variables, then command-line flags. [`RunConfig`] is the fully resolved
//! result handed to [`crate::run`].

use crate::error::{CliError, Result};
use crate::query::SearchQuery;
use genetable_common::types::TaxonomicRank;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default E-utilities base URL.
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default timeout for a single HTTP request in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of attempts for a transient failure.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry, doubled on each further attempt.
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;

/// Default number of identifiers per efetch request.
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Tool name reported to NCBI with every request.
pub const DEFAULT_TOOL: &str = "genetable";

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never less than 1.
    pub max_retries: u32,

    /// Delay before the second attempt
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            initial_backoff,
        }
    }

    /// Delay after the given failed attempt (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_RETRIES,
            Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
        )
    }
}

/// Connection settings for the Entrez E-utilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrezConfig {
    /// Base URL, without trailing slash
    pub base_url: String,

    /// NCBI API key (raises the rate limit from 3 to 10 requests/s)
    pub api_key: Option<String>,

    /// Contact email reported to NCBI
    pub email: Option<String>,

    /// Tool name reported to NCBI
    pub tool: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    pub retry: RetryPolicy,
}

impl Default for EntrezConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            email: None,
            tool: DEFAULT_TOOL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }
}

impl EntrezConfig {
    /// Load config from environment variables
    ///
    /// - `ENTREZ_BASE_URL`
    /// - `NCBI_API_KEY`, `NCBI_EMAIL`
    /// - `ENTREZ_TIMEOUT_SECS`, `ENTREZ_MAX_RETRIES`, `ENTREZ_BACKOFF_MS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("ENTREZ_BASE_URL") {
            config.set_base_url(url);
        }
        config.api_key = non_empty(std::env::var("NCBI_API_KEY").ok());
        config.email = non_empty(std::env::var("NCBI_EMAIL").ok());

        if let Some(secs) = parse_env::<u64>("ENTREZ_TIMEOUT_SECS")? {
            config.timeout_secs = secs;
        }

        let max_retries = parse_env::<u32>("ENTREZ_MAX_RETRIES")?;
        let backoff_ms = parse_env::<u64>("ENTREZ_BACKOFF_MS")?;
        if max_retries.is_some() || backoff_ms.is_some() {
            config.retry = RetryPolicy::new(
                max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
                Duration::from_millis(backoff_ms.unwrap_or(DEFAULT_INITIAL_BACKOFF_MS)),
            );
        }

        Ok(config)
    }

    /// Set the base URL, dropping any trailing slash
    pub fn set_base_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CliError::config(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

// ============================================================================
// Run Configuration
// ============================================================================

/// How a frequency table is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for TableFormat {
    type Err = CliError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(TableFormat::Table),
            "json" => Ok(TableFormat::Json),
            _ => Err(CliError::config(format!(
                "Unknown table format '{}', expected 'table' or 'json'",
                s
            ))),
        }
    }
}

/// Species-level GenBank filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesFilter {
    pub rank: TaxonomicRank,
    pub output: PathBuf,
}

/// What a run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print matching record identifiers, one per line
    Ids,

    /// Stream fetched records to stdout
    Sequences,

    /// Write species-level GenBank records to a file
    SpeciesRecords(SpeciesFilter),

    /// Tally feature labels; optionally save a bar chart
    FeatureTable {
        keywords: Vec<String>,
        plot: bool,
        format: TableFormat,
    },
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub query: SearchQuery,
    pub mode: Mode,
    pub batch_size: usize,
    pub entrez: EntrezConfig,
    /// Directory that receives charts
    pub output_dir: PathBuf,
}

impl RunConfig {
    /// Check invariants that the argument parser cannot express
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(CliError::config("Batch size (--cache) must be at least 1"));
        }
        if self.query.organism().trim().is_empty() {
            return Err(CliError::config("Search term cannot be empty"));
        }
        match &self.mode {
            Mode::FeatureTable { keywords, .. } if keywords.is_empty() => {
                return Err(CliError::config("At least one feature keyword is required"));
            },
            Mode::SpeciesRecords(_) if self.query.rettype() != "gb" => {
                return Err(CliError::config(format!(
                    "Species-level filtering (--ite) needs --type gb, got '{}'",
                    self.query.rettype()
                )));
            },
            _ => {},
        }
        Ok(())
    }
}
