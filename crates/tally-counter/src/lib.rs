//! Like and view counter services.
//!
//! [`LikeService`] and [`ViewService`] mediate between a request and a
//! [`CounterStore`][tally_core::CounterStore]. They hold no state of their
//! own: every call reads or writes the store and returns what the store
//! reports afterwards.

pub mod likes;
pub mod views;

pub use likes::LikeService;
pub use views::ViewService;
