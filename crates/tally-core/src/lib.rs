//! Core types and traits for the Tally engagement counters.
//!
//! This crate provides the types shared by the storage backends, the
//! counter services, the HTTP gateway and the client widgets.

pub mod counter;
pub mod error;
pub mod record;
pub mod slug;
pub mod store;

pub use counter::{LikeAction, LikeState, Likes, ViewCount, ViewRecorded, Views};
pub use error::{CoreError, CounterError, StorageError};
pub use record::{ActorId, CounterKind, Delta, EngagementRecord};
pub use slug::Slug;
pub use store::CounterStore;
