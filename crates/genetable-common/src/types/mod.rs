//! Common types used across genetable

use crate::error::GeneTableError;
use serde::{Deserialize, Serialize};

// ============================================================================
// Record Identifiers
// ============================================================================

/// Identifier assigned by the remote database to a sequence entry.
///
/// Entrez returns either plain GI numbers (`2462554541`) or versioned
/// accessions rendered numerically (`1798174254.1`), so digits and dots are
/// accepted. Anything else is rejected at parse time.
///
/// # Examples
///
/// ```
/// use genetable_common::types::RecordId;
///
/// let id: RecordId = "1798174254".parse().unwrap();
/// assert_eq!(id.as_str(), "1798174254");
/// assert!("NC_045512".parse::<RecordId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(raw: &str) -> bool {
        !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit() || b == b'.')
            && raw.bytes().next().is_some_and(|b| b.is_ascii_digit())
    }
}

impl TryFrom<String> for RecordId {
    type Error = GeneTableError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let trimmed = raw.trim();
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(GeneTableError::InvalidRecordId(raw))
        }
    }
}

impl std::str::FromStr for RecordId {
    type Err = GeneTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Taxonomy
// ============================================================================

/// Taxonomic rank used to group species-level records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomicRank {
    #[default]
    Genus,
    Family,
    Order,
    Class,
    Phylum,
    Kingdom,
}

impl TaxonomicRank {
    /// The next rank up, if any
    pub fn parent(self) -> Option<Self> {
        match self {
            TaxonomicRank::Genus => Some(TaxonomicRank::Family),
            TaxonomicRank::Family => Some(TaxonomicRank::Order),
            TaxonomicRank::Order => Some(TaxonomicRank::Class),
            TaxonomicRank::Class => Some(TaxonomicRank::Phylum),
            TaxonomicRank::Phylum => Some(TaxonomicRank::Kingdom),
            TaxonomicRank::Kingdom => None,
        }
    }
}

impl std::str::FromStr for TaxonomicRank {
    type Err = GeneTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "genus" => Ok(TaxonomicRank::Genus),
            "family" => Ok(TaxonomicRank::Family),
            "order" => Ok(TaxonomicRank::Order),
            "class" => Ok(TaxonomicRank::Class),
            "phylum" => Ok(TaxonomicRank::Phylum),
            "kingdom" => Ok(TaxonomicRank::Kingdom),
            _ => Err(GeneTableError::InvalidRank(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaxonomicRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxonomicRank::Genus => write!(f, "genus"),
            TaxonomicRank::Family => write!(f, "family"),
            TaxonomicRank::Order => write!(f, "order"),
            TaxonomicRank::Class => write!(f, "class"),
            TaxonomicRank::Phylum => write!(f, "phylum"),
            TaxonomicRank::Kingdom => write!(f, "kingdom"),
        }
    }
}
