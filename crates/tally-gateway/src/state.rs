use std::sync::Arc;

use tally_core::{Likes, Views};

/// Shared handler state: the two counters, chosen once at startup.
#[derive(Clone)]
pub struct AppState {
    likes: Arc<dyn Likes>,
    views: Arc<dyn Views>,
}

impl AppState {
    pub fn new(likes: Arc<dyn Likes>, views: Arc<dyn Views>) -> Self {
        Self { likes, views }
    }

    pub fn likes(&self) -> &dyn Likes {
        self.likes.as_ref()
    }

    pub fn views(&self) -> &dyn Views {
        self.views.as_ref()
    }
}
