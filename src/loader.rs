//! Batch jobs: download one or many divisions straight into a CSV file.

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::client::HyroxClient;
use crate::error::{HyroxError, Result};
use crate::extract::EnrichOptions;
use crate::model::DivisionName;
use crate::scraper::Fetch;
use crate::writer::{ResultsWriter, WriteMode};

/// What a batch load did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Result rows written.
    pub written: usize,
    /// Ranking rows that could not be read and so were never written.
    pub skipped_rows: usize,
    /// Optional fields that were requested but left empty.
    pub missing_enrichments: usize,
    /// Event / division pairs that could not be loaded at all.
    pub failed: Vec<(String, DivisionName)>,
}

/// Downloads results through a [`HyroxClient`] and writes them as CSV.
pub struct ResultsLoader<'a, F> {
    client: &'a HyroxClient<F>,
}

impl<'a, F: Fetch> ResultsLoader<'a, F> {
    pub fn new(client: &'a HyroxClient<F>) -> Self {
        Self { client }
    }

    /// Load one division of one event into `path`.
    ///
    /// Any failure, including an unknown event or division, is returned.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn load(
        &self,
        event: &str,
        division: DivisionName,
        path: &Path,
        options: EnrichOptions,
        mode: WriteMode,
    ) -> Result<LoadReport> {
        let results = self.client.results(event, division, options).await?;
        ResultsWriter::new(Some(event), Some(division)).write(&results.value, path, mode)?;
        Ok(LoadReport {
            written: results.value.len(),
            skipped_rows: results.skipped_rows.len(),
            missing_enrichments: results.skipped.len(),
            failed: Vec::new(),
        })
    }

    /// Load several divisions of one event into a single file.
    pub async fn load_divisions(
        &self,
        event: &str,
        divisions: &[DivisionName],
        path: &Path,
        options: EnrichOptions,
        mode: WriteMode,
    ) -> Result<LoadReport> {
        self.load_events(&[event], divisions, path, options, mode).await
    }

    /// Load every division of every event into a single file.
    ///
    /// The first write uses `mode`, later ones append. A pair whose event or
    /// division doesn't exist, or whose enrichment aborted, is logged and
    /// listed in [`LoadReport::failed`]; a transport failure stops the batch.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn load_events(
        &self,
        events: &[&str],
        divisions: &[DivisionName],
        path: &Path,
        options: EnrichOptions,
        mode: WriteMode,
    ) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        let mut mode = mode;

        for event in events {
            for division in divisions {
                match self.load(event, *division, path, options, mode).await {
                    Ok(loaded) => {
                        report.written += loaded.written;
                        report.skipped_rows += loaded.skipped_rows;
                        report.missing_enrichments += loaded.missing_enrichments;
                        mode = WriteMode::Append;
                    }
                    Err(
                        e @ (HyroxError::EntityNotFound { .. }
                        | HyroxError::EnrichmentExhausted { .. }),
                    ) => {
                        warn!(event, %division, error = %e, "failed to load results");
                        report.failed.push((event.to_string(), *division));
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(
            written = report.written,
            skipped_rows = report.skipped_rows,
            failed = report.failed.len(),
            "batch load finished"
        );
        Ok(report)
    }
}
