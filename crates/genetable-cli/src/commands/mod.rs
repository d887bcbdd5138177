//! Run modes
//!
//! [`run`] resolves the identifiers for a query once, then hands off to the
//! module for the selected [`Mode`].

pub mod genes;
pub mod ids;
pub mod sequences;

use crate::api::EntrezClient;
use crate::config::{Mode, RunConfig};
use crate::error::Result;
use tracing::info;

/// Execute one fully resolved invocation
pub async fn run(config: &RunConfig) -> Result<()> {
    config.validate()?;

    let client = EntrezClient::new(config.entrez.clone())?;
    info!(
        query = %config.query,
        db = config.query.database(),
        rettype = config.query.rettype(),
        "Starting run"
    );

    match &config.mode {
        Mode::Ids => ids::run(&client, config).await,
        Mode::Sequences => sequences::run(&client, config).await,
        Mode::SpeciesRecords(filter) => sequences::run_species(&client, config, filter).await,
        Mode::FeatureTable {
            keywords,
            plot,
            format,
        } => genes::run(&client, config, keywords, *plot, *format).await,
    }
}
