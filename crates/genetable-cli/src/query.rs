//! Entrez search-term builder
//!
//! Turns an organism name, optional marker genes, and optional sequence
//! length bounds into one boolean Entrez expression:
//!
//! ```
//! use genetable_cli::query::SearchQuery;
//!
//! let query = SearchQuery::builder("Homo sapiens")
//!     .markers_csv("COI,COX")
//!     .build();
//!
//! assert_eq!(
//!     query.clause(),
//!     "Homo%20sapiens[Organism] AND (COI[All Fields] OR COX[All Fields])"
//! );
//! ```
//!
//! Marker and length clauses only apply to the nucleotide database
//! (`nuccore`); for any other database the term is passed through as typed.

use serde::{Deserialize, Serialize};

/// Database whose records carry organism, marker, and length fields
pub const NUCLEOTIDE_DB: &str = "nuccore";

/// Default retrieval type
pub const DEFAULT_RETTYPE: &str = "fasta";

/// An immutable Entrez search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    organism: String,
    markers: Vec<String>,
    min_length: Option<u64>,
    max_length: Option<u64>,
    database: String,
    rettype: String,
}

impl SearchQuery {
    /// Start building a query for the given organism term
    pub fn builder(organism: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder::new(organism)
    }

    pub fn organism(&self) -> &str {
        &self.organism
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn rettype(&self) -> &str {
        &self.rettype
    }

    fn is_nucleotide(&self) -> bool {
        self.database == NUCLEOTIDE_DB
    }

    /// `COI[All Fields]` for one marker, `(A[All Fields] OR B[All Fields])` for several
    fn marker_clause(&self) -> Option<String> {
        let terms: Vec<String> = self
            .markers
            .iter()
            .map(|m| format!("{}[All Fields]", m))
            .collect();

        match terms.len() {
            0 => None,
            1 => terms.into_iter().next(),
            _ => Some(format!("({})", terms.join(" OR "))),
        }
    }

    /// Present only when both bounds are set
    fn length_clause(&self) -> Option<String> {
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) => Some(format!("({}[SLEN] :{}[SLEN])", min, max)),
            _ => None,
        }
    }

    /// Clauses joined with ` AND `, around the given organism text
    fn expression(&self, organism: &str) -> String {
        if !self.is_nucleotide() {
            return organism.to_string();
        }

        let mut parts = vec![format!("{}[Organism]", organism)];
        parts.extend(self.marker_clause());
        parts.extend(self.length_clause());
        parts.join(" AND ")
    }

    /// The boolean expression with the organism term space-escaped.
    ///
    /// Spaces inside markers and between clauses are left as typed; use
    /// [`SearchQuery::encoded`] for a query-string value.
    pub fn clause(&self) -> String {
        self.expression(&self.organism.trim().replace(' ', "%20"))
    }

    /// The expression percent-encoded as one query-string value.
    ///
    /// Encoding starts from the unescaped expression, so the organism is not
    /// encoded twice and a literal `%` becomes `%25`.
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.expression(self.organism.trim())).into_owned()
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.clause())
    }
}

/// Builder for [`SearchQuery`]
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    query: SearchQuery,
}

impl SearchQueryBuilder {
    fn new(organism: impl Into<String>) -> Self {
        Self {
            query: SearchQuery {
                organism: organism.into(),
                markers: Vec::new(),
                min_length: None,
                max_length: None,
                database: NUCLEOTIDE_DB.to_string(),
                rettype: DEFAULT_RETTYPE.to_string(),
            },
        }
    }

    /// Markers from a comma-separated list; blank entries are dropped
    pub fn markers_csv(self, csv: &str) -> Self {
        self.markers(split_csv(csv))
    }

    pub fn markers(mut self, markers: Vec<String>) -> Self {
        self.query.markers = markers;
        self
    }

    pub fn min_length(mut self, min: Option<u64>) -> Self {
        self.query.min_length = min;
        self
    }

    pub fn max_length(mut self, max: Option<u64>) -> Self {
        self.query.max_length = max;
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.query.database = database.into();
        self
    }

    pub fn rettype(mut self, rettype: impl Into<String>) -> Self {
        self.query.rettype = rettype.into();
        self
    }

    pub fn build(self) -> SearchQuery {
        self.query
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks
pub fn split_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
