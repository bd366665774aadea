use crate::api::EngagementApi;
use crate::cache::LikeCache;
use crate::error::Result;
use crate::Phase;
use tally_core::{LikeAction, LikeState, Slug};
use tracing::{debug, warn};

/// An optimistic toggle that has been shown but not yet confirmed.
///
/// Carries the state displayed right before the toggle, which is what a
/// failure restores, regardless of any toggles started afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a pending toggle must be settled"]
pub struct PendingToggle {
    action: LikeAction,
    prior: LikeState,
}

impl PendingToggle {
    pub fn action(&self) -> LikeAction {
        self.action
    }

    pub fn prior(&self) -> LikeState {
        self.prior
    }
}

/// State machine behind a like button.
///
/// ```text
/// new ──> Loading ──hydrate──> Ready
///                                │
///          begin_toggle: show the flipped state right away
///                                │
///          settle(Ok)  : replace with the server's state
///          settle(Err) : restore the state captured by begin_toggle
/// ```
pub struct LikeButton<A, C> {
    slug: Slug,
    api: A,
    cache: C,
    phase: Phase,
    state: LikeState,
    notice: Option<String>,
}

impl<A: EngagementApi, C: LikeCache> LikeButton<A, C> {
    /// Creates a button showing the cached liked-state until the server answers.
    pub fn new(slug: Slug, api: A, cache: C) -> Self {
        let liked = cache.liked(&slug).unwrap_or(false);
        Self {
            slug,
            api,
            cache,
            phase: Phase::Loading,
            state: LikeState { count: 0, liked },
            notice: None,
        }
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The state currently displayed.
    pub fn state(&self) -> LikeState {
        self.state
    }

    /// A non-fatal message about the last failed request, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Fetches the authoritative state and leaves the loading phase.
    ///
    /// On failure the button still becomes ready, showing what the cache had.
    pub async fn hydrate(&mut self) -> Result<LikeState> {
        let result = self.api.likes(&self.slug).await;
        self.phase = Phase::Ready;

        match result {
            Ok(server) => {
                self.accept(server);
                Ok(server)
            }
            Err(err) => {
                warn!(slug = %self.slug, error = %err, "failed to load likes, keeping cached state");
                self.notice = Some(format!("could not load likes: {err}"));
                Err(err)
            }
        }
    }

    /// Flips the displayed state and returns what must be sent to the server.
    pub fn begin_toggle(&mut self) -> PendingToggle {
        let prior = self.state;
        let action = if prior.liked {
            LikeAction::Unlike
        } else {
            LikeAction::Like
        };

        self.state = match action {
            LikeAction::Like => LikeState {
                count: prior.count.saturating_add(1),
                liked: true,
            },
            LikeAction::Unlike => LikeState {
                count: prior.count.saturating_sub(1),
                liked: false,
            },
        };
        debug!(slug = %self.slug, %action, "optimistic like toggle");

        PendingToggle { action, prior }
    }

    /// Reconciles a pending toggle with the server's reply.
    pub fn settle(
        &mut self,
        pending: PendingToggle,
        reply: Result<LikeState>,
    ) -> Result<LikeState> {
        match reply {
            Ok(server) => {
                self.accept(server);
                Ok(server)
            }
            Err(err) => {
                warn!(
                    slug = %self.slug,
                    action = %pending.action,
                    error = %err,
                    "like request failed, reverting"
                );
                self.state = pending.prior;
                self.notice = Some(format!("could not {} this post: {err}", pending.action));
                Err(err)
            }
        }
    }

    /// Toggles and waits for the server: `begin_toggle`, send, `settle`.
    pub async fn toggle(&mut self) -> Result<LikeState> {
        let pending = self.begin_toggle();
        let reply = self.api.apply_like(&self.slug, pending.action).await;
        self.settle(pending, reply)
    }

    fn accept(&mut self, server: LikeState) {
        self.state = server;
        self.notice = None;
        self.cache.store(&self.slug, server.liked);
    }
}

impl<A, C> std::fmt::Debug for LikeButton<A, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikeButton")
            .field("slug", &self.slug)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("notice", &self.notice)
            .finish()
    }
}
