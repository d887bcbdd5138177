//! Download records, either to stdout or filtered into a GenBank file

use crate::api::EntrezClient;
use crate::config::{RunConfig, SpeciesFilter};
use crate::error::Result;
use crate::fetch::SequenceFetcher;
use crate::species::{write_species_records, SpeciesSummary};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::{info, warn};

/// Stream every matching record to stdout, one batch at a time
pub async fn run(client: &EntrezClient, config: &RunConfig) -> Result<()> {
    let ids = client.search_ids(&config.query).await?;
    if ids.is_empty() {
        eprintln!("{}", "No records matched the query".yellow());
        return Ok(());
    }

    let fetcher = SequenceFetcher::new(
        client,
        config.query.database(),
        config.query.rettype(),
        config.batch_size,
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    fetcher.stream_to(&ids, &mut out).await?;

    Ok(())
}

/// Keep only species-level GenBank records and write them to the filter's file
pub async fn run_species(
    client: &EntrezClient,
    config: &RunConfig,
    filter: &SpeciesFilter,
) -> Result<()> {
    info!(rank = %filter.rank, output = %filter.output.display(), "Filtering species-level records");

    let ids = client.search_ids(&config.query).await?;
    let fetcher = SequenceFetcher::new(
        client,
        config.query.database(),
        config.query.rettype(),
        config.batch_size,
    )?;

    let mut out = BufWriter::new(File::create(&filter.output)?);
    let mut summary = SpeciesSummary::default();

    fetcher
        .for_each_page(&ids, |page| {
            summary.merge(write_species_records(&page.body, &mut out)?);
            Ok(())
        })
        .await?;
    out.flush()?;

    info!(
        records = summary.records,
        kept = summary.kept,
        without_organism = summary.without_organism,
        "Species filter complete"
    );

    if summary.kept == 0 {
        let message = match filter.rank.parent() {
            Some(parent) => format!(
                "No species-level records found; try searching a {} name instead of this {}",
                parent, filter.rank
            ),
            None => "No species-level records found".to_string(),
        };
        warn!(rank = %filter.rank, "{}", message);
        eprintln!("{}", message.yellow());
    } else {
        eprintln!(
            "{} Wrote {} of {} records to {}",
            "✓".green(),
            summary.kept,
            summary.records,
            filter.output.display().to_string().cyan()
        );
    }

    Ok(())
}
