//! Run-level error types.
//!
//! Per-document problems never reach these types: they are recorded by the
//! extractor (see [`crate::traits::DocumentError`]). What remains here is
//! fatal for a run:
//! - [`SourceError`]: the source tree cannot be enumerated, before any processing
//! - [`ExportError`]: a sink cannot write its output, after processing

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while enumerating source documents.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Root directory is missing or is not a directory
    #[error("Source directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Listing a directory below the root failed
    #[error("I/O error while listing sources: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the export sinks.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Output file or directory could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rows could not be serialized
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
