//! genetable CLI Library
//!
//! Searches the NCBI Entrez E-utilities for an organism and downloads what
//! it finds.
//!
//! # Overview
//!
//! - **Identifiers**: list the record IDs a query matches (`--ids`)
//! - **Records**: stream FASTA, GenBank or any other `rettype` to stdout
//! - **Species filter**: keep species-level GenBank records only (`--ite`)
//! - **Feature table**: tally gene labels across feature tables and chart
//!   them (`--type ft --plot` or `--type ft --format ...`); plain
//!   `--type ft` streams the raw tables like any other record type
//!
//! The binary parses a [`Cli`], turns it into a [`RunConfig`] and calls
//! [`run`].

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod features;
pub mod fetch;
pub mod plot;
pub mod progress;
pub mod query;
pub mod species;

// Re-export commonly used types
pub use commands::run;
pub use config::{Mode, RunConfig};
pub use error::{CliError, Result};
pub use query::SearchQuery;

use clap::Parser;
use config::{EntrezConfig, SpeciesFilter, TableFormat, DEFAULT_BATCH_SIZE};
use features::keywords_or_default;
use genetable_common::types::TaxonomicRank;
use query::{split_csv, DEFAULT_RETTYPE, NUCLEOTIDE_DB};
use std::path::PathBuf;

/// Retrieval type that selects feature-table mode
pub const FEATURE_TABLE_RETTYPE: &str = "ft";

/// genetable - Retrieve sequences and gene tables from NCBI Entrez
#[derive(Parser, Debug)]
#[command(name = "genetable")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Organism search term (e.g. "Homo sapiens")
    #[arg(value_name = "TERM", required_unless_present = "markdown_help")]
    pub term: Option<String>,

    /// Retrieval type (fasta, gb, ft, ...)
    #[arg(long = "type", default_value = DEFAULT_RETTYPE)]
    pub rettype: String,

    /// Entrez database (nuccore, protein, sra, ...)
    #[arg(long, default_value = NUCLEOTIDE_DB)]
    pub db: String,

    /// Comma-separated markers (e.g. "COI,COX"); feature keywords when tallying
    #[arg(long, default_value = "")]
    pub markers: String,

    /// Minimum sequence length (nuccore only, needs --lmax)
    #[arg(long, alias = "Lmin")]
    pub lmin: Option<u64>,

    /// Maximum sequence length (nuccore only, needs --lmin)
    #[arg(long, alias = "Lmax")]
    pub lmax: Option<u64>,

    /// Keep only species-level GenBank records (needs --type gb)
    #[arg(long)]
    pub ite: bool,

    /// Taxonomic rank of the search term in iterative mode
    #[arg(long, default_value = "genus")]
    pub group: TaxonomicRank,

    /// Output file for iterative mode
    #[arg(long, default_value = "output.gb")]
    pub out: PathBuf,

    /// Print matching record identifiers only
    #[arg(long)]
    pub ids: bool,

    /// Save a bar chart of the feature table (with --type ft)
    #[arg(long)]
    pub plot: bool,

    /// Records fetched per request
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub cache: usize,

    /// Tally feature tables and print the counts as table or json (with --type ft)
    #[arg(long)]
    pub format: Option<TableFormat>,

    /// Directory for saved charts
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// E-utilities base URL
    #[arg(long, env = "ENTREZ_BASE_URL")]
    pub base_url: Option<String>,

    /// NCBI API key
    #[arg(long, env = "NCBI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Contact email sent to NCBI
    #[arg(long, env = "NCBI_EMAIL")]
    pub email: Option<String>,

    /// Print help as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

impl Cli {
    /// Resolve flags and environment into a [`RunConfig`]
    pub fn into_run_config(self) -> Result<RunConfig> {
        let term = self
            .term
            .ok_or_else(|| CliError::config("A search term is required"))?;

        let mut entrez = EntrezConfig::from_env()?;
        if let Some(url) = self.base_url {
            entrez.set_base_url(url);
        }
        if self.api_key.is_some() {
            entrez.api_key = self.api_key;
        }
        if self.email.is_some() {
            entrez.email = self.email;
        }

        // Feature tables are tallied only on request; otherwise they stream
        let tally = self.rettype == FEATURE_TABLE_RETTYPE && (self.plot || self.format.is_some());
        let markers = split_csv(&self.markers);

        let mut builder = SearchQuery::builder(term)
            .database(self.db)
            .rettype(self.rettype)
            .min_length(self.lmin)
            .max_length(self.lmax);
        if !tally {
            builder = builder.markers(markers.clone());
        }
        let query = builder.build();

        let mode = if self.ids {
            Mode::Ids
        } else if tally {
            Mode::FeatureTable {
                keywords: keywords_or_default(markers),
                plot: self.plot,
                format: self.format.unwrap_or_default(),
            }
        } else if self.ite {
            Mode::SpeciesRecords(SpeciesFilter {
                rank: self.group,
                output: self.out,
            })
        } else {
            Mode::Sequences
        };

        let config = RunConfig {
            query,
            mode,
            batch_size: self.cache,
            entrez,
            output_dir: self.output_dir,
        };
        config.validate()?;

        Ok(config)
    }
}
