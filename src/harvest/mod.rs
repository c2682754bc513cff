//! Harvest module - batch extraction of legislative documents into tables.
//!
//! This module provides the engine behind every job:
//! - **Source**: document discovery via [`DocumentSource`]
//! - **Lookup**: best-effort reads over variant document shapes
//! - **Domains**: [`VotesExtractor`] and [`ActeursExtractor`]
//! - **Export**: single-document and per-table JSON sinks
//! - **Pipeline**: sequential orchestration via [`pipeline::BatchPipeline`]

pub mod domains;
pub mod export;
pub mod lookup;
pub mod pipeline;
pub mod source;
pub mod traits;

// Re-export commonly used types
pub use traits::{ExportError, SourceError};

pub use domains::{ActeursExtractor, VotesExtractor};
pub use pipeline::{BatchPipeline, PipelineError, RunSummary};
pub use source::{DirectorySource, DocumentSource};
