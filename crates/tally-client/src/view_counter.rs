use crate::api::EngagementApi;
use crate::cache::SessionViews;
use crate::error::Result;
use crate::Phase;
use tally_core::Slug;
use tracing::{debug, warn};

/// State machine behind a view counter.
///
/// The server counts every view it is sent, so this widget decides whether
/// a page load is a new view: the first load of a slug in a session records
/// a view, later loads only read the count.
pub struct ViewCounter<A, V> {
    slug: Slug,
    api: A,
    session: V,
    phase: Phase,
    count: Option<u64>,
}

impl<A: EngagementApi, V: SessionViews> ViewCounter<A, V> {
    pub fn new(slug: Slug, api: A, session: V) -> Self {
        Self {
            slug,
            api,
            session,
            phase: Phase::Loading,
            count: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The count to display, once one is known.
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// Loads the count, recording a view first if this session has not.
    ///
    /// The slug is only marked as counted once the server confirmed the
    /// view, so a failed attempt is retried on the next load.
    pub async fn load(&mut self) -> Result<u64> {
        let result = if self.session.is_counted(&self.slug) {
            debug!(slug = %self.slug, "view already counted this session");
            self.api.views(&self.slug).await.map(|views| views.count)
        } else {
            self.api.record_view(&self.slug).await.map(|recorded| {
                self.session.mark_counted(&self.slug);
                recorded.count
            })
        };
        self.phase = Phase::Ready;

        match result {
            Ok(count) => {
                self.count = Some(count);
                Ok(count)
            }
            Err(err) => {
                warn!(slug = %self.slug, error = %err, "failed to load views");
                Err(err)
            }
        }
    }
}

impl<A, V> std::fmt::Debug for ViewCounter<A, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCounter")
            .field("slug", &self.slug)
            .field("phase", &self.phase)
            .field("count", &self.count)
            .finish()
    }
}
