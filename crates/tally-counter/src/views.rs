use async_trait::async_trait;
use std::sync::Arc;
use tally_core::{
    ActorId, CounterError, CounterStore, Delta, Slug, ViewCount, ViewRecorded, Views,
};
use tracing::debug;

/// A concrete implementation of the [`Views`] trait.
///
/// Every recorded view increments the count. The visitor is remembered in
/// the store's actor set but never used to suppress a repeat; counting a
/// view once per session is the client's job.
#[derive(Debug)]
pub struct ViewService<S> {
    store: Arc<S>,
}

impl<S> Clone for ViewService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CounterStore> ViewService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Creates a service sharing an existing store.
    pub fn from_shared(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: CounterStore> Views for ViewService<S> {
    async fn record(&self, slug: &Slug, actor: &ActorId) -> Result<ViewRecorded, CounterError> {
        let count = self
            .store
            .record_action(slug, actor, Delta::Increment)
            .await?;
        debug!(slug = %slug, count, "recorded view");

        Ok(ViewRecorded {
            count,
            is_new_view: true,
        })
    }

    async fn peek(&self, slug: &Slug) -> Result<ViewCount, CounterError> {
        let count = self.store.get_count(slug).await?;
        Ok(ViewCount { count })
    }
}
