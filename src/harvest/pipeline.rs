//! Batch pipeline: enumerate → extract → export.
//!
//! The [`BatchPipeline`] drives one [`DocumentSource`] and one [`Extractor`]:
//! - documents are read ahead with bounded concurrency ([`DocumentReader`])
//! - each document is handed to the extractor strictly one at a time, in
//!   enumeration order, so the extractor's dedup sets are never shared
//! - after the run, the extractor's tables and failures go to the sinks
//!
//! Per-document failures are recorded by the extractor and never abort a run.
//! A missing source directory or a failed export does.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::executor::DocumentReader;
use crate::harvest::export;
use crate::harvest::source::DocumentSource;
use crate::harvest::traits::{ExportError, SourceError};
use crate::traits::{DocumentError, Extractor};

// ============================================================================
// Pipeline Types
// ============================================================================

/// Outcome of a run, reported after each export.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    /// Domain of the extractor that ran
    pub domain: String,

    /// Documents discovered by the source
    pub documents_seen: usize,

    /// Documents recorded as failures
    pub documents_failed: usize,

    /// Row count per table, in table order
    pub table_counts: Vec<(String, usize)>,

    /// Wall time of the processing phase (milliseconds)
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn rows(&self, table: &str) -> usize {
        self.table_counts
            .iter()
            .find(|(name, _)| name == table)
            .map_or(0, |(_, n)| *n)
    }
}

// ============================================================================
// Pipeline Errors
// ============================================================================

/// Fatal run errors.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Source enumeration failed before any document was processed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// An export sink failed after processing
    #[error(transparent)]
    Export(#[from] ExportError),
}

// ============================================================================
// Pipeline Executor
// ============================================================================

pub struct BatchPipeline<S, E>
where
    S: DocumentSource,
    E: Extractor,
{
    source: S,

    /// Single extractor accumulating state across the whole run
    extractor: E,

    reader: DocumentReader,

    /// Documents discovered by the last run
    documents_seen: usize,

    duration_ms: u64,
}

impl<S, E> BatchPipeline<S, E>
where
    S: DocumentSource,
    E: Extractor,
{
    /// Creates a pipeline reading one document at a time.
    pub fn new(source: S, extractor: E) -> Self {
        Self {
            source,
            extractor,
            reader: DocumentReader::new(1),
            documents_seen: 0,
            duration_ms: 0,
        }
    }

    /// Reads up to `limit` documents concurrently. Extraction stays sequential.
    pub fn with_read_concurrency(mut self, limit: usize) -> Self {
        self.reader = DocumentReader::new(limit);
        self
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Processes every document the source yields.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Source`] if the source cannot be enumerated.
    /// Document-level problems are recorded by the extractor instead.
    #[instrument(
        skip(self),
        fields(domain = self.extractor.domain(), source = %self.source.describe())
    )]
    pub async fn run(&mut self) -> Result<RunSummary, PipelineError> {
        let start = Instant::now();

        let paths = self.source.enumerate().await?;
        self.documents_seen = paths.len();
        info!(documents = paths.len(), "Starting extraction");

        let failed_before = self.extractor.errors().len();
        let chunk_size = self.reader.concurrency().saturating_mul(4);

        for chunk in paths.chunks(chunk_size) {
            for document in self.reader.read_batch(chunk).await {
                match document.content {
                    Ok(content) => self.extractor.process_bytes(&document.path, &content),
                    Err(e) => self
                        .extractor
                        .record_document_error(&document.path, DocumentError::Io(e)),
                }
            }
        }

        self.duration_ms = start.elapsed().as_millis() as u64;
        let failed = self.extractor.errors().len() - failed_before;
        if failed > 0 {
            warn!(failed, "Some documents could not be extracted");
        }
        info!(
            duration_ms = self.duration_ms,
            documents = self.documents_seen,
            failed,
            "Extraction completed"
        );

        Ok(self.summary()?)
    }

    /// Counts per table and failed documents for the current state.
    pub fn summary(&self) -> Result<RunSummary, ExportError> {
        let tables = self.extractor.tables()?;
        Ok(RunSummary {
            domain: self.extractor.domain().to_string(),
            documents_seen: self.documents_seen,
            documents_failed: self.extractor.errors().len(),
            table_counts: tables
                .counts()
                .into_iter()
                .map(|(name, n)| (name.to_string(), n))
                .collect(),
            duration_ms: self.duration_ms,
        })
    }

    /// Writes all tables to `path` as one document, plus a sibling
    /// `-errors` document when failures were recorded.
    #[instrument(skip(self), fields(domain = self.extractor.domain()))]
    pub async fn export_single_document(
        &self,
        path: &Path,
    ) -> Result<Option<PathBuf>, PipelineError> {
        let tables = self.extractor.tables().map_err(ExportError::from)?;
        let errors_file =
            export::write_single_document(&tables, self.extractor.errors(), path).await?;
        log_summary(&self.summary()?);
        Ok(errors_file)
    }

    /// Writes each table to its own file under `dir`.
    #[instrument(skip(self), fields(domain = self.extractor.domain()))]
    pub async fn export_separate_documents(
        &self,
        dir: &Path,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let tables = self.extractor.tables().map_err(ExportError::from)?;
        let written = export::write_separate_documents(&tables, dir).await?;
        log_summary(&self.summary()?);
        Ok(written)
    }
}

fn log_summary(summary: &RunSummary) {
    info!("{}", "=".repeat(50));
    info!("EXPORT SUMMARY ({})", summary.domain);
    info!("{}", "=".repeat(50));
    for (table, rows) in &summary.table_counts {
        info!("{:<36}{}", table, rows);
    }
    info!("{:<36}{}", "documents", summary.documents_seen);
    if summary.documents_failed > 0 {
        warn!("{:<36}{}", "failed documents", summary.documents_failed);
    }
    info!("{}", "=".repeat(50));
}

// ============================================================================
// Tests
// ============================================================================
