//! Feature-table scraping
//!
//! Parses efetch `rettype=ft` pages into [`FeatureRecord`]s and tallies the
//! labels of features whose key matches a keyword.

pub mod frequency;
pub mod parser;

pub use frequency::{
    keywords_or_default, record_labels, scrape_page, FrequencyTable, GeneCount, ScrapeSummary,
    DEFAULT_KEYWORD,
};
pub use parser::{
    parse_record, parse_records, Feature, FeatureParseError, FeatureParseErrorKind, FeatureRecord,
    Qualifier, Span,
};
