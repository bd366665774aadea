use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tally_core::store::Result;
use tally_core::{ActorId, CounterKind, CounterStore, Delta, EngagementRecord, Slug, StorageError};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

/// Whole-document layout of a counter file: slug -> record.
type Document = BTreeMap<String, EngagementRecord>;

/// Flat-file implementation of [`CounterStore`].
///
/// All records of one counter kind live in a single JSON document,
/// `<data_dir>/<kind>.json`. Every mutation reads the whole document,
/// changes it in memory and writes the whole document back through a
/// temporary file and a rename.
///
/// Writers inside one process are serialized. Separate processes sharing
/// the same data directory are not coordinated and can lose updates, so
/// this store is meant for a single local development server.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

fn io_error(operation: &str, path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Io(format!("{operation} '{}': {err}", path.display()))
}

impl FileStore {
    /// Creates a store for `kind` rooted at `data_dir`.
    ///
    /// Nothing is touched on disk until the first write, which creates the
    /// directory if it is missing.
    pub fn new(data_dir: impl Into<PathBuf>, kind: CounterKind) -> Self {
        let path = data_dir.into().join(format!("{}.json", kind.as_str()));
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the JSON document backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                trace!(path = %self.path.display(), "counter file does not exist yet");
                return Ok(Document::new());
            }
            Err(err) => return Err(io_error("failed to read", &self.path, err)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "counter file is not valid JSON");
            StorageError::InvalidData(format!(
                "invalid counter file '{}': {e}",
                self.path.display()
            ))
        })
    }

    async fn save(&self, document: &Document) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| io_error("failed to create data directory", dir, e))?;
        }

        let json = serde_json::to_vec_pretty(document).map_err(|e| {
            StorageError::Operation(format!("failed to serialize counter file: {e}"))
        })?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| io_error("failed to write", &tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| io_error("failed to replace", &self.path, e))?;

        Ok(())
    }
}

#[async_trait]
impl CounterStore for FileStore {
    async fn get_count(&self, slug: &Slug) -> Result<u64> {
        let document = self.load().await?;
        Ok(document.get(slug.as_str()).map_or(0, |record| record.count))
    }

    async fn has_acted(&self, slug: &Slug, actor: &ActorId) -> Result<bool> {
        let document = self.load().await?;
        Ok(document
            .get(slug.as_str())
            .is_some_and(|record| record.has_actor(actor)))
    }

    async fn record_action(&self, slug: &Slug, actor: &ActorId, delta: Delta) -> Result<u64> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        let count = document
            .entry(slug.as_str().to_owned())
            .or_default()
            .apply(actor, delta);
        self.save(&document).await?;

        debug!(slug = %slug, ?delta, count, path = %self.path.display(), "updated counter file");
        Ok(count)
    }
}
