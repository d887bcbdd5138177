//! Batched record download
//!
//! Identifiers are sliced into fixed-size batches and fetched one batch per
//! efetch request, in order. Each page is handed to the caller as soon as it
//! arrives, so callers can stream it out or accumulate it.

use crate::api::EntrezClient;
use crate::error::{CliError, Result};
use crate::progress::{create_batch_progress, format_bytes};
use genetable_common::types::RecordId;
use std::io::Write;
use tracing::{debug, info};

/// One efetch response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Zero-based batch number
    pub index: usize,

    /// Identifiers requested in this batch
    pub ids: usize,

    /// Raw response body
    pub body: String,
}

/// Totals for a completed fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub batches: usize,
    pub records: usize,
    pub bytes: u64,
}

/// Paginates efetch requests over an identifier list
pub struct SequenceFetcher<'a> {
    client: &'a EntrezClient,
    db: &'a str,
    rettype: &'a str,
    batch_size: usize,
}

impl<'a> SequenceFetcher<'a> {
    pub fn new(client: &'a EntrezClient, db: &'a str, rettype: &'a str, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(CliError::config("Batch size must be at least 1"));
        }

        Ok(Self {
            client,
            db,
            rettype,
            batch_size,
        })
    }

    /// Fetch every batch, passing each page to `on_page` in order.
    ///
    /// An empty identifier list issues no requests.
    pub async fn for_each_page<F>(&self, ids: &[RecordId], mut on_page: F) -> Result<FetchSummary>
    where
        F: FnMut(Page) -> Result<()>,
    {
        let mut summary = FetchSummary::default();
        if ids.is_empty() {
            return Ok(summary);
        }

        let batches = ids.len().div_ceil(self.batch_size);
        let pb = create_batch_progress(ids.len() as u64, &format!("Fetching {} records", self.rettype));

        for (index, batch) in ids.chunks(self.batch_size).enumerate() {
            debug!(batch = index + 1, batches, ids = batch.len(), "Fetching batch");

            let body = match self.client.efetch(self.db, batch, self.rettype).await {
                Ok(body) => body,
                Err(e) => {
                    pb.abandon();
                    return Err(CliError::Batch {
                        batch: index + 1,
                        batches,
                        source: Box::new(e),
                    });
                },
            };

            summary.batches += 1;
            summary.records += batch.len();
            summary.bytes += body.len() as u64;
            pb.inc(batch.len() as u64);

            on_page(Page {
                index,
                ids: batch.len(),
                body,
            })?;
        }

        pb.finish_and_clear();
        info!(
            batches = summary.batches,
            records = summary.records,
            size = %format_bytes(summary.bytes),
            "Fetch complete"
        );

        Ok(summary)
    }

    /// Streaming mode: write each page to `out` as it arrives
    pub async fn stream_to<W: Write>(&self, ids: &[RecordId], out: &mut W) -> Result<FetchSummary> {
        let summary = self
            .for_each_page(ids, |page| {
                out.write_all(page.body.as_bytes())?;
                if !page.body.ends_with('\n') {
                    out.write_all(b"\n")?;
                }
                out.flush()?;
                Ok(())
            })
            .await?;

        Ok(summary)
    }

    /// Accumulate mode: concatenate every page into one string
    pub async fn collect(&self, ids: &[RecordId]) -> Result<String> {
        let mut text = String::new();
        self.for_each_page(ids, |page| {
            text.push_str(&page.body);
            Ok(())
        })
        .await?;

        Ok(text)
    }
}
