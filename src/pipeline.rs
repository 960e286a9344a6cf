//! End-to-end run: headers → cleaning → aggregates → insights.

use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::aggregates::{Aggregates, aggregate_all};
use crate::cleaner::{EmptyDataset, SkipCounts, clean_rows};
use crate::ingest::read_table;
use crate::insights::{InsightSet, generate_insights};
use crate::schema::{FieldMapping, SchemaError, resolve_fields};

/// Fatal failures of a run. Row-level problems are never reported here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    EmptyDataset(#[from] EmptyDataset),
}

/// Header resolution and cleaning results, without aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub mapping: FieldMapping,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub skipped: SkipCounts,
}

/// Everything a host needs to report on a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mapping: FieldMapping,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub skipped: SkipCounts,
    pub aggregates: Aggregates,
    pub insights: Vec<InsightSet>,
}

fn open(path: &Path) -> Result<BufReader<File>, PipelineError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Runs the full pipeline over CSV text from `reader`.
pub fn run_reader<R: Read>(reader: R) -> Result<RunReport, PipelineError> {
    let table = read_table(reader)?;
    let mapping = resolve_fields(&table.headers)?;
    let cleaned = clean_rows(&table.records, &mapping)?;

    let aggregates = aggregate_all(&cleaned.dataset);
    let insights = generate_insights(&aggregates);

    info!(
        rows_read = cleaned.rows_read,
        rows_kept = cleaned.dataset.len(),
        skipped = %cleaned.skipped,
        "Pipeline complete"
    );

    Ok(RunReport {
        mapping,
        rows_read: cleaned.rows_read,
        rows_kept: cleaned.dataset.len(),
        skipped: cleaned.skipped,
        aggregates,
        insights,
    })
}

/// Runs the full pipeline over the CSV file at `path`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn run_file(path: &Path) -> Result<RunReport, PipelineError> {
    run_reader(open(path)?)
}

/// Resolves headers and cleans rows without aggregating.
pub fn inspect_reader<R: Read>(reader: R) -> Result<Inspection, PipelineError> {
    let table = read_table(reader)?;
    let mapping = resolve_fields(&table.headers)?;
    let cleaned = clean_rows(&table.records, &mapping)?;

    Ok(Inspection {
        mapping,
        rows_read: cleaned.rows_read,
        rows_kept: cleaned.dataset.len(),
        skipped: cleaned.skipped,
    })
}

/// File variant of [`inspect_reader`].
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn inspect_file(path: &Path) -> Result<Inspection, PipelineError> {
    inspect_reader(open(path)?)
}
