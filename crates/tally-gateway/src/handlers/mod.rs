mod health;
mod likes;
mod views;

pub use health::health_handler;
pub use likes::{get_likes_handler, post_likes_handler};
pub use views::{get_views_handler, post_views_handler};

use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use tally_core::Slug;

/// Validates a slug taken from a query string, where it may be missing.
fn required_slug(slug: Option<String>) -> Result<Slug, AppError> {
    let slug = slug.ok_or_else(|| AppError::BadRequest("missing 'slug' parameter".to_string()))?;
    Ok(Slug::new(slug)?)
}

fn malformed_body(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(format!("malformed request body: {}", rejection.body_text()))
}

fn malformed_query(rejection: QueryRejection) -> AppError {
    AppError::BadRequest(format!("malformed query: {}", rejection.body_text()))
}
