use crate::model::{ExtractionFailure, TableSet};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Why a single document was skipped. Converted into an [`ExtractionFailure`]
/// at the extractor boundary.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing uid")]
    MissingUid,
    #[error("Expected a JSON object at the document root")]
    NotAnObject,
}

/// Domain extractor contract (actors, votes).
///
/// One instance accumulates rows across a whole run. Implementations must not
/// touch their tables when [`Extractor::extract`] fails: a document either
/// contributes all of its rows or none.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Domain name used in logs and summaries (e.g., "votes").
    fn domain(&self) -> &'static str;

    /// Normalizes one parsed document into the accumulated tables.
    fn extract(&mut self, document: &Value) -> Result<(), DocumentError>;

    /// Appends a failure record.
    fn record_failure(&mut self, failure: ExtractionFailure);

    /// Current accumulated tables. Non-destructive.
    fn tables(&self) -> serde_json::Result<TableSet>;

    /// Failures recorded so far, in processing order.
    fn errors(&self) -> &[ExtractionFailure];

    /// Parses and extracts already-read document bytes. Never fails: every
    /// problem becomes a recorded failure.
    fn process_bytes(&mut self, path: &Path, content: &[u8]) {
        let result = serde_json::from_slice::<Value>(content)
            .map_err(DocumentError::from)
            .and_then(|document| self.extract(&document));

        if let Err(e) = result {
            self.record_document_error(path, e);
        }
    }

    /// Records `error` against `path`, keyed by the file's base name.
    fn record_document_error(&mut self, path: &Path, error: DocumentError) {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        warn!(domain = self.domain(), file = %file, error = %error, "Document skipped");
        self.record_failure(ExtractionFailure {
            file,
            error: error.to_string(),
        });
    }

    /// Reads one document from disk and processes it.
    async fn process_document(&mut self, path: &Path) {
        match tokio::fs::read(path).await {
            Ok(content) => self.process_bytes(path, &content),
            Err(e) => self.record_document_error(path, DocumentError::Io(e)),
        }
    }
}
