use std::path::PathBuf;
use std::sync::Arc;

use tally_core::{CounterKind, StorageError};
use tally_counter::{LikeService, ViewService};
use tally_storage::{FileStore, InMemoryStore, RedisStore};
use tracing::info;

use crate::state::AppState;

/// Storage backend behind both counters, chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Shared Redis server; safe for many concurrent processes.
    Redis { url: String },
    /// JSON documents in a local directory; single local process only.
    File { data_dir: PathBuf },
    /// Process memory; lost on exit.
    Memory,
}

impl Backend {
    /// Picks Redis when a connection URL is configured, the file store otherwise.
    pub fn select(redis_url: Option<String>, data_dir: impl Into<PathBuf>) -> Self {
        match redis_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => Backend::Redis { url },
            None => Backend::File {
                data_dir: data_dir.into(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Redis { .. } => "redis",
            Backend::File { .. } => "file",
            Backend::Memory => "memory",
        }
    }

    /// Builds the like and view counters on top of this backend.
    pub async fn connect(&self) -> Result<AppState, StorageError> {
        let state = match self {
            Backend::Redis { url } => {
                let conn = RedisStore::connect(url).await?;
                AppState::new(
                    Arc::new(LikeService::new(RedisStore::new(
                        conn.clone(),
                        CounterKind::Likes,
                    ))),
                    Arc::new(ViewService::new(RedisStore::new(conn, CounterKind::Views))),
                )
            }
            Backend::File { data_dir } => AppState::new(
                Arc::new(LikeService::new(FileStore::new(
                    data_dir.clone(),
                    CounterKind::Likes,
                ))),
                Arc::new(ViewService::new(FileStore::new(
                    data_dir.clone(),
                    CounterKind::Views,
                ))),
            ),
            Backend::Memory => AppState::new(
                Arc::new(LikeService::new(InMemoryStore::new())),
                Arc::new(ViewService::new(InMemoryStore::new())),
            ),
        };

        info!(backend = self.name(), "counter storage ready");
        Ok(state)
    }
}
