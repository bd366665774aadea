use async_trait::async_trait;
use dashmap::DashMap;
use tally_core::store::Result;
use tally_core::{ActorId, CounterStore, Delta, EngagementRecord, Slug};
use tracing::trace;

/// In-memory implementation of [`CounterStore`] using DashMap.
///
/// Updates to one slug go through the map's entry API, so they are atomic
/// with respect to each other while different slugs proceed in parallel.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: DashMap<Slug, EngagementRecord>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Returns a copy of the record for `slug`, if one was ever written.
    pub fn record(&self, slug: &Slug) -> Option<EngagementRecord> {
        self.records.get(slug).map(|entry| entry.clone())
    }

    /// Number of slugs with a record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CounterStore for InMemoryStore {
    async fn get_count(&self, slug: &Slug) -> Result<u64> {
        trace!(slug = %slug, "reading count from memory");
        Ok(self.records.get(slug).map_or(0, |record| record.count))
    }

    async fn has_acted(&self, slug: &Slug, actor: &ActorId) -> Result<bool> {
        Ok(self
            .records
            .get(slug)
            .is_some_and(|record| record.has_actor(actor)))
    }

    async fn record_action(&self, slug: &Slug, actor: &ActorId, delta: Delta) -> Result<u64> {
        trace!(slug = %slug, ?delta, "recording action in memory");
        let mut record = self.records.entry(slug.clone()).or_default();
        Ok(record.apply(actor, delta))
    }
}
