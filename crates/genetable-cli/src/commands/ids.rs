//! Print matching record identifiers

use crate::api::EntrezClient;
use crate::config::RunConfig;
use crate::error::Result;
use colored::Colorize;
use std::io::{self, Write};

pub async fn run(client: &EntrezClient, config: &RunConfig) -> Result<()> {
    let ids = client.search_ids(&config.query).await?;

    if ids.is_empty() {
        eprintln!("{}", "No records matched the query".yellow());
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    for id in &ids {
        writeln!(out, "{}", id)?;
    }
    out.flush()?;

    Ok(())
}
