use crate::error::CounterError;
use crate::record::ActorId;
use crate::slug::Slug;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

type Result<T> = std::result::Result<T, CounterError>;

/// What a visitor asks the like counter to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Like,
    Unlike,
}

impl LikeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeAction::Like => "like",
            LikeAction::Unlike => "unlike",
        }
    }
}

impl Display for LikeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LikeAction {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "like" => Ok(LikeAction::Like),
            "unlike" => Ok(LikeAction::Unlike),
            other => Err(CounterError::InvalidAction(format!(
                "expected 'like' or 'unlike', got '{other}'"
            ))),
        }
    }
}

/// Authoritative like state of a slug as seen by one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub count: u64,
    pub liked: bool,
}

/// Authoritative view count of a slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCount {
    pub count: u64,
}

/// Result of counting a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecorded {
    pub count: u64,
    /// Always `true`: views are not de-duplicated per actor on the server.
    pub is_new_view: bool,
}

/// The like counter: bidirectional, at most one like per actor.
#[async_trait]
pub trait Likes: Send + Sync + 'static {
    /// Likes or unlikes `slug` on behalf of `actor` and returns the new state.
    ///
    /// Liking twice, or unliking something never liked, is a no-op that
    /// still returns the current state.
    async fn apply(&self, slug: &Slug, actor: &ActorId, action: LikeAction) -> Result<LikeState>;

    /// Reads the state without mutating anything.
    async fn peek(&self, slug: &Slug, actor: &ActorId) -> Result<LikeState>;
}

/// The view counter: increment-only.
#[async_trait]
pub trait Views: Send + Sync + 'static {
    /// Counts a view of `slug` by `actor`.
    ///
    /// Every call increments. Counting once per session is up to the caller.
    async fn record(&self, slug: &Slug, actor: &ActorId) -> Result<ViewRecorded>;

    /// Reads the count without mutating anything.
    async fn peek(&self, slug: &Slug) -> Result<ViewCount>;
}
