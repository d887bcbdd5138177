//! Feature label tallies

use super::parser::{parse_records, FeatureRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Default feature key when no keywords are given
pub const DEFAULT_KEYWORD: &str = "gene";

/// One row of a sorted table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneCount {
    pub gene: String,
    pub frequency: u64,
}

/// Lowercase feature label → number of records carrying it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: impl Into<String>) {
        *self.counts.entry(label.into()).or_insert(0) += 1;
    }

    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Fold another table into this one; counts for shared labels add up
    pub fn merge(&mut self, other: FrequencyTable) {
        for (label, count) in other.counts {
            *self.counts.entry(label).or_insert(0) += count;
        }
    }

    /// Rows by count descending, then label ascending
    pub fn sorted(&self) -> Vec<GeneCount> {
        let mut rows: Vec<GeneCount> = self
            .counts
            .iter()
            .map(|(gene, &frequency)| GeneCount {
                gene: gene.clone(),
                frequency,
            })
            .collect();
        rows.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.gene.cmp(&b.gene)));
        rows
    }
}

impl<S: Into<String>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::new();
        for label in iter {
            table.add(label);
        }
        table
    }
}

/// Labels of the features in `record` whose key is one of `keywords`.
///
/// Features sharing a (start, end) position count once, under the shortest
/// label; equal lengths fall back to the alphabetically first. Labels come
/// back lowercased, ordered by position.
pub fn record_labels(record: &FeatureRecord, keywords: &[String]) -> Vec<String> {
    let mut by_position: BTreeMap<(u64, u64), &str> = BTreeMap::new();

    for feature in &record.features {
        if !keywords.iter().any(|k| *k == feature.key) {
            continue;
        }
        let Some(label) = feature.label() else {
            continue;
        };

        by_position
            .entry(feature.location.position())
            .and_modify(|kept| {
                if (label.len(), label) < (kept.len(), *kept) {
                    *kept = label;
                }
            })
            .or_insert(label);
    }

    by_position.into_values().map(str::to_lowercase).collect()
}

/// Outcome of scraping one or more pages
#[derive(Debug, Clone, Default)]
pub struct ScrapeSummary {
    pub table: FrequencyTable,
    pub records: usize,
    pub failed: usize,
}

impl ScrapeSummary {
    pub fn merge(&mut self, other: ScrapeSummary) {
        self.table.merge(other.table);
        self.records += other.records;
        self.failed += other.failed;
    }
}

/// Tally matching feature labels across every record in a page.
///
/// Records that fail to parse are logged and counted, then skipped.
pub fn scrape_page(text: &str, keywords: &[String]) -> ScrapeSummary {
    let mut summary = ScrapeSummary::default();

    for result in parse_records(text) {
        match result {
            Ok(record) => {
                summary.records += 1;
                for label in record_labels(&record, keywords) {
                    summary.table.add(label);
                }
            },
            Err(e) => {
                warn!(header = %e.header, line = e.line, "Skipping malformed feature record: {}", e.kind);
                summary.failed += 1;
            },
        }
    }

    summary
}

/// Keywords to match, falling back to [`DEFAULT_KEYWORD`]
pub fn keywords_or_default(keywords: Vec<String>) -> Vec<String> {
    if keywords.is_empty() {
        vec![DEFAULT_KEYWORD.to_string()]
    } else {
        keywords
    }
}
