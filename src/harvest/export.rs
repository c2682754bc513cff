//! Export sinks over already-normalized tables.
//!
//! Both sinks serialize as pretty-printed JSON and never validate rows. Any
//! write failure is returned as an [`ExportError`].

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::harvest::traits::ExportError;
use crate::model::{ExtractionFailure, TableSet};

/// Sibling path holding the failure records of a single-document export:
/// `votes-complete.json` becomes `votes-complete-errors.json`.
pub fn errors_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}-errors.{}", stem, ext.to_string_lossy()),
        None => format!("{}-errors", stem),
    };
    path.with_file_name(name)
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| ExportError::io(path, e))?;
    debug!(path = %path.display(), "Wrote export file");
    Ok(())
}

async fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ExportError::io(dir, e))
}

/// Writes every table into one JSON object keyed by table name. When
/// `errors` is non-empty they are written to [`errors_path`], which is then
/// returned.
pub async fn write_single_document(
    tables: &TableSet,
    errors: &[ExtractionFailure],
    path: &Path,
) -> Result<Option<PathBuf>, ExportError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let document: Map<String, Value> = tables
        .iter()
        .map(|t| (t.name.to_string(), Value::Array(t.rows.clone())))
        .collect();
    write_json(path, &document).await?;
    info!(path = %path.display(), tables = tables.len(), "Exported single document");

    if errors.is_empty() {
        return Ok(None);
    }

    let errors_file = errors_path(path);
    write_json(&errors_file, errors).await?;
    info!(path = %errors_file.display(), failed = errors.len(), "Exported failure records");
    Ok(Some(errors_file))
}

/// Writes each table to its own file under `dir`, creating `dir` if needed.
/// Returns the written paths in table order.
pub async fn write_separate_documents(
    tables: &TableSet,
    dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    ensure_dir(dir).await?;

    let mut written = Vec::with_capacity(tables.len());
    for table in tables.iter() {
        let path = dir.join(table.file_name);
        write_json(&path, &table.rows).await?;
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "Exported table files");
    Ok(written)
}
