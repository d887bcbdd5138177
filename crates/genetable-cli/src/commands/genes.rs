//! Feature frequency table and chart

use crate::api::EntrezClient;
use crate::config::{RunConfig, TableFormat};
use crate::error::Result;
use crate::features::{scrape_page, GeneCount, ScrapeSummary};
use crate::fetch::SequenceFetcher;
use crate::plot::save_chart;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use tracing::{info, warn};

pub async fn run(
    client: &EntrezClient,
    config: &RunConfig,
    keywords: &[String],
    plot: bool,
    format: TableFormat,
) -> Result<()> {
    let ids = client.search_ids(&config.query).await?;
    let fetcher = SequenceFetcher::new(
        client,
        config.query.database(),
        config.query.rettype(),
        config.batch_size,
    )?;

    let mut summary = ScrapeSummary::default();
    fetcher
        .for_each_page(&ids, |page| {
            summary.merge(scrape_page(&page.body, keywords));
            Ok(())
        })
        .await?;

    if summary.failed > 0 {
        warn!(
            failed = summary.failed,
            parsed = summary.records,
            "Some feature records could not be parsed and were skipped"
        );
    }
    info!(records = summary.records, labels = summary.table.len(), "Feature scrape complete");

    let rows = summary.table.sorted();

    match format {
        TableFormat::Table => print_table(config.query.organism(), &rows),
        TableFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }

    if plot {
        let path = save_chart(&config.output_dir, config.query.organism(), &rows)?;
        eprintln!("{} Chart saved to {}", "✓".green(), path.display().to_string().cyan());
    }

    Ok(())
}

fn print_table(term: &str, rows: &[GeneCount]) {
    if rows.is_empty() {
        eprintln!("{}", "No matching features found".yellow());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Gene", "Frequency"]);

    for row in rows {
        table.add_row(vec![row.gene.clone(), row.frequency.to_string()]);
    }

    println!("{}", format!("Gene availability of {}", term).bold());
    println!("{}", table);
}
