use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    get_likes_handler, get_views_handler, health_handler, post_likes_handler, post_views_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/likes", get(get_likes_handler).post(post_likes_handler))
            .route("/views", get(get_views_handler).post(post_views_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
