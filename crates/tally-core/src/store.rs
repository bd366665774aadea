use crate::error::StorageError;
use crate::record::{ActorId, Delta};
use crate::slug::Slug;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistent storage for one kind of engagement counter.
///
/// Each store instance is bound to a single [`CounterKind`][crate::CounterKind]
/// and keeps, per slug, a count and the set of actors that have acted.
/// Implementations must behave identically for any sequence of calls that
/// do not overlap in time.
#[async_trait]
pub trait CounterStore: Send + Sync + 'static {
    /// Returns the current count for `slug`, or 0 if the slug has no record.
    async fn get_count(&self, slug: &Slug) -> Result<u64>;

    /// Checks whether `actor` is in the actor set of `slug`.
    async fn has_acted(&self, slug: &Slug, actor: &ActorId) -> Result<bool>;

    /// Applies `delta` to the count of `slug` (floored at zero), adds or
    /// removes `actor` from the actor set accordingly, persists the change
    /// and returns the new count.
    async fn record_action(&self, slug: &Slug, actor: &ActorId, delta: Delta) -> Result<u64>;
}

#[async_trait]
impl<S: CounterStore> CounterStore for Arc<S> {
    async fn get_count(&self, slug: &Slug) -> Result<u64> {
        (**self).get_count(slug).await
    }

    async fn has_acted(&self, slug: &Slug, actor: &ActorId) -> Result<bool> {
        (**self).has_acted(slug, actor).await
    }

    async fn record_action(&self, slug: &Slug, actor: &ActorId, delta: Delta) -> Result<u64> {
        (**self).record_action(slug, actor, delta).await
    }
}
