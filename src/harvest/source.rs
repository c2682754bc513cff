//! Source document discovery.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::harvest::traits::SourceError;

/// Produces the list of documents a batch run processes.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Returns document paths in a stable order.
    async fn enumerate(&self) -> Result<Vec<PathBuf>, SourceError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Recursive listing of a directory tree, filtered by file extension.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    /// Source over every `.json` file below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "json".to_string(),
        }
    }

    /// Matches a different extension (case-insensitive, without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn enumerate(&self) -> Result<Vec<PathBuf>, SourceError> {
        let is_dir = tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(SourceError::DirectoryNotFound(self.root.clone()));
        }

        let mut pending = vec![self.root.clone()];
        let mut documents = Vec::new();

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if self.matches(&path) {
                    documents.push(path);
                }
            }
        }

        documents.sort();
        debug!(root = %self.root.display(), documents = documents.len(), "Enumerated source");
        Ok(documents)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
