//! E-utilities URL builders
//!
//! Helper functions to construct `esearch` and `efetch` URLs. Terms arrive
//! already encoded (see [`crate::query::SearchQuery::encoded`]).

use genetable_common::types::RecordId;

/// Largest `retmax` esearch honours in one request
pub const ESEARCH_MAX_RETMAX: u64 = 10_000;

/// Paging window for an esearch request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paging {
    pub retstart: Option<u64>,
    pub retmax: Option<u64>,
}

impl Paging {
    /// Count-only request: let Entrez pick its default page size
    pub fn count_only() -> Self {
        Self::default()
    }

    pub fn window(retstart: u64, retmax: u64) -> Self {
        Self {
            retstart: (retstart > 0).then_some(retstart),
            retmax: Some(retmax),
        }
    }
}

/// NCBI usage-policy parameters appended to every request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity<'a> {
    pub tool: Option<&'a str>,
    pub email: Option<&'a str>,
    pub api_key: Option<&'a str>,
}

impl Identity<'_> {
    fn push_onto(&self, url: &mut String) {
        let params = [
            ("tool", self.tool),
            ("email", self.email),
            ("api_key", self.api_key),
        ];
        for (key, value) in params {
            if let Some(v) = value {
                url.push_str(&format!("&{}={}", key, urlencoding::encode(v)));
            }
        }
    }
}

/// Build esearch URL
pub fn esearch_url(
    base_url: &str,
    db: &str,
    encoded_term: &str,
    paging: Paging,
    identity: &Identity<'_>,
) -> String {
    let mut url = format!(
        "{}/esearch.fcgi?db={}&term={}",
        base_url,
        urlencoding::encode(db),
        encoded_term
    );

    if let Some(start) = paging.retstart {
        url.push_str(&format!("&retstart={}", start));
    }

    if let Some(max) = paging.retmax {
        url.push_str(&format!("&retmax={}", max));
    }

    identity.push_onto(&mut url);
    url
}

/// Build efetch URL for one batch of identifiers
pub fn efetch_url(
    base_url: &str,
    db: &str,
    ids: &[RecordId],
    rettype: &str,
    identity: &Identity<'_>,
) -> String {
    let joined = ids
        .iter()
        .map(RecordId::as_str)
        .collect::<Vec<_>>()
        .join(",");

    let mut url = format!(
        "{}/efetch.fcgi?db={}&id={}&rettype={}",
        base_url,
        urlencoding::encode(db),
        joined,
        urlencoding::encode(rettype)
    );

    identity.push_onto(&mut url);
    url
}
