//! HTTP gateway for the Tally like and view counters.
//!
//! Thin axum adapters: each handler resolves the visitor, validates the
//! slug and delegates to a [`Likes`][tally_core::Likes] or
//! [`Views`][tally_core::Views] implementation held in [`AppState`].

pub mod app;
pub mod backend;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod visitor;

pub use app::App;
pub use backend::Backend;
pub use error::AppError;
pub use state::AppState;
pub use visitor::Visitor;
