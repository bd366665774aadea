use serde::{Deserialize, Serialize};
use tally_core::{LikeState, ViewCount, ViewRecorded};

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub slug: String,
    /// Parsed into a [`LikeAction`][tally_core::LikeAction] by the handler.
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct LikesResponse {
    pub count: u64,
    pub liked: bool,
}

impl From<LikeState> for LikesResponse {
    fn from(state: LikeState) -> Self {
        Self {
            count: state.count,
            liked: state.liked,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub count: u64,
}

impl From<ViewCount> for ViewsResponse {
    fn from(views: ViewCount) -> Self {
        Self { count: views.count }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecordedResponse {
    pub count: u64,
    pub is_new_view: bool,
}

impl From<ViewRecorded> for ViewRecordedResponse {
    fn from(recorded: ViewRecorded) -> Self {
        Self {
            count: recorded.count,
            is_new_view: recorded.is_new_view,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
