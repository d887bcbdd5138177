//! HTTP client for the Entrez E-utilities
//!
//! Wraps one `reqwest::Client` reused for every request of a run. Requests
//! are issued one at a time; each goes through the bounded retry policy.

use crate::api::endpoints::{self, Identity, Paging, ESEARCH_MAX_RETMAX};
use crate::api::retry::with_retry;
use crate::api::types::ESearchResult;
use crate::config::EntrezConfig;
use crate::error::{CliError, Result};
use crate::query::SearchQuery;
use genetable_common::types::RecordId;
use reqwest::Client;
use tracing::{debug, info, warn};

/// API client for the E-utilities
pub struct EntrezClient {
    client: Client,
    config: EntrezConfig,
}

impl EntrezClient {
    /// Create a new client
    pub fn new(config: EntrezConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("genetable/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(EntrezConfig::from_env()?)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn identity(&self) -> Identity<'_> {
        Identity {
            tool: Some(self.config.tool.as_str()),
            email: self.config.email.as_deref(),
            api_key: self.config.api_key.as_deref(),
        }
    }

    /// One GET, no retry. Non-2xx statuses become [`CliError::HttpStatus`].
    ///
    /// Transport errors drop their URL, which can carry the API key.
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CliError::Http(e.without_url()))?;
        let status = response.status();

        if !status.is_success() {
            return Err(CliError::HttpStatus {
                status,
                url: redact_api_key(url),
            });
        }

        response
            .text()
            .await
            .map_err(|e| CliError::Http(e.without_url()))
    }

    /// Run one esearch request
    pub async fn esearch(&self, db: &str, encoded_term: &str, paging: Paging) -> Result<ESearchResult> {
        let url = endpoints::esearch_url(self.base_url(), db, encoded_term, paging, &self.identity());
        debug!(url = %redact_api_key(&url), "esearch");

        let body = with_retry(&self.config.retry, "esearch", || self.get_text(&url)).await?;
        ESearchResult::parse(&body)
    }

    /// Run one efetch request for a batch of identifiers
    pub async fn efetch(&self, db: &str, ids: &[RecordId], rettype: &str) -> Result<String> {
        let url = endpoints::efetch_url(self.base_url(), db, ids, rettype, &self.identity());
        debug!(ids = ids.len(), rettype, "efetch");

        with_retry(&self.config.retry, "efetch", || self.get_text(&url)).await
    }

    /// Resolve a query to the full, ordered list of matching identifiers.
    ///
    /// A count-only search comes first. The query is then re-issued with the
    /// count as page size (in windows of at most 10 000, the esearch cap).
    pub async fn search_ids(&self, query: &SearchQuery) -> Result<Vec<RecordId>> {
        let db = query.database();
        let term = query.encoded();

        let head = self.esearch(db, &term, Paging::count_only()).await?;
        for notice in head.notices() {
            warn!(%notice, "Entrez notice");
        }

        let total = head.total();
        info!(count = total, term = %query, "Search matched records");

        if total == 0 {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        let mut start = 0;

        while start < total {
            let window = (total - start).min(ESEARCH_MAX_RETMAX);
            let page = self.esearch(db, &term, Paging::window(start, window)).await?;
            let received = page.ids().len();

            debug!(retstart = start, requested = window, received, "Received identifier page");

            if received == 0 {
                break;
            }

            ids.extend(page.into_ids());
            start += window;
        }

        if ids.len() as u64 != total {
            warn!(
                expected = total,
                received = ids.len(),
                "Entrez returned fewer identifiers than its reported count"
            );
        }

        Ok(ids)
    }
}

/// Hide the value of an `api_key` parameter
fn redact_api_key(url: &str) -> String {
    match url.find("api_key=") {
        Some(pos) => {
            let value_start = pos + "api_key=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[value_end..])
        },
        None => url.to_string(),
    }
}
