use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

/// Bytes (or the read error) of one document, tagged with its path.
#[derive(Debug)]
pub struct ReadDocument {
    pub path: PathBuf,
    pub content: std::io::Result<Vec<u8>>,
}

/// Reads documents concurrently, bounded by a semaphore, and hands them back
/// in the order they were requested. Only reading is parallel; callers feed
/// the results to a single extractor one at a time.
pub struct DocumentReader {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl DocumentReader {
    pub fn new(concurrency_limit: usize) -> Self {
        let concurrency = concurrency_limit.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[instrument(skip(self, paths), fields(count = paths.len()))]
    pub async fn read_batch(&self, paths: &[PathBuf]) -> Vec<ReadDocument> {
        let mut handles = Vec::with_capacity(paths.len());

        for path in paths {
            let handle = tokio::spawn(read_with_permit(self.semaphore.clone(), path.clone()));
            handles.push((path.clone(), handle));
        }

        let mut documents = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            let content = match handle.await {
                Ok(result) => result,
                Err(e) => Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Read task failed: {}", e),
                )),
            };
            documents.push(ReadDocument { path, content });
        }

        debug!(documents = documents.len(), "Batch read completed");
        documents
    }
}

async fn read_with_permit(semaphore: Arc<Semaphore>, path: PathBuf) -> std::io::Result<Vec<u8>> {
    let _permit = semaphore.acquire_owned().await.map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, format!("Semaphore error: {}", e))
    })?;
    tokio::fs::read(&path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_has_floor_of_one() {
        assert_eq!(DocumentReader::new(0).concurrency(), 1);
        assert_eq!(DocumentReader::new(4).concurrency(), 4);
    }

    #[test]
    fn test_concurrency_is_capped_at_semaphore_limit() {
        let reader = DocumentReader::new(usize::MAX);
        assert_eq!(reader.concurrency(), Semaphore::MAX_PERMITS);
    }

    #[tokio::test]
    async fn test_read_batch_preserves_order_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        std::fs::write(&a, b"{\"n\":1}").unwrap();
        std::fs::write(&b, b"{\"n\":2}").unwrap();
        let missing = dir.path().join("missing.json");

        let reader = DocumentReader::new(2);
        let docs = reader
            .read_batch(&[b.clone(), missing.clone(), a.clone()])
            .await;

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].path, b);
        assert_eq!(docs[0].content.as_ref().unwrap(), b"{\"n\":2}");
        assert_eq!(docs[1].path, missing);
        assert!(docs[1].content.is_err());
        assert_eq!(docs[2].path, a);
    }
}
