use async_trait::async_trait;
use std::sync::Arc;
use tally_core::{
    ActorId, CounterError, CounterStore, Delta, LikeAction, LikeState, Likes, Slug,
};
use tracing::{debug, trace};

/// A concrete implementation of the [`Likes`] trait.
///
/// Each actor can like a slug at most once. De-duplication relies only on
/// the store's actor set; the membership check and the write are two
/// separate store calls.
#[derive(Debug)]
pub struct LikeService<S> {
    store: Arc<S>,
}

impl<S> Clone for LikeService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CounterStore> LikeService<S> {
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
impl<S: CounterStore> Likes for LikeService<S> {
    async fn apply(
        &self,
        slug: &Slug,
        actor: &ActorId,
        action: LikeAction,
    ) -> Result<LikeState, CounterError> {
        let liked = self.store.has_acted(slug, actor).await?;

        let count = match (action, liked) {
            (LikeAction::Like, false) => {
                self.store
                    .record_action(slug, actor, Delta::Increment)
                    .await?
            }
            (LikeAction::Unlike, true) => {
                self.store
                    .record_action(slug, actor, Delta::Decrement)
                    .await?
            }
            _ => {
                trace!(slug = %slug, %action, "like state already matches, nothing to record");
                self.store.get_count(slug).await?
            }
        };

        let state = LikeState {
            count,
            liked: action == LikeAction::Like,
        };
        debug!(slug = %slug, %action, count = state.count, "applied like action");
        Ok(state)
    }

    async fn peek(&self, slug: &Slug, actor: &ActorId) -> Result<LikeState, CounterError> {
        let count = self.store.get_count(slug).await?;
        let liked = self.store.has_acted(slug, actor).await?;
        Ok(LikeState { count, liked })
    }
}
