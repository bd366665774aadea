//! Client side of the Tally counters.
//!
//! - [`HttpEngagementApi`] talks to the gateway endpoints.
//! - [`LikeButton`] and [`ViewCounter`] are the widget state machines:
//!   optimistic update, await the server, then reconcile or revert.
//! - [`LikeCache`] and [`SessionViews`] are the local caches the widgets
//!   consult. The server's answer always wins over what they hold.

pub mod api;
pub mod cache;
pub mod error;
pub mod like_button;
pub mod view_counter;

pub use api::{EngagementApi, HttpEngagementApi};
pub use cache::{FileLikeCache, LikeCache, MemoryLikeCache, MemorySessionViews, SessionViews};
pub use error::ClientError;
pub use like_button::{LikeButton, PendingToggle};
pub use view_counter::ViewCounter;

/// Lifecycle of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first answer from the server.
    Loading,
    /// Initial state resolved, from the server or from cache after a failure.
    Ready,
}
