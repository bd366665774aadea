use crate::error::{ClientError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tally_core::{LikeAction, LikeState, Slug, ViewCount, ViewRecorded};
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

/// The four counter endpoints, as seen from a widget.
#[async_trait]
pub trait EngagementApi: Send + Sync {
    /// `GET /likes?slug=`
    async fn likes(&self, slug: &Slug) -> Result<LikeState>;

    /// `POST /likes`
    async fn apply_like(&self, slug: &Slug, action: LikeAction) -> Result<LikeState>;

    /// `GET /views?slug=`
    async fn views(&self, slug: &Slug) -> Result<ViewCount>;

    /// `POST /views`
    async fn record_view(&self, slug: &Slug) -> Result<ViewRecorded>;
}

#[async_trait]
impl<T: EngagementApi + ?Sized> EngagementApi for Arc<T> {
    async fn likes(&self, slug: &Slug) -> Result<LikeState> {
        (**self).likes(slug).await
    }

    async fn apply_like(&self, slug: &Slug, action: LikeAction) -> Result<LikeState> {
        (**self).apply_like(slug, action).await
    }

    async fn views(&self, slug: &Slug) -> Result<ViewCount> {
        (**self).views(slug).await
    }

    async fn record_view(&self, slug: &Slug) -> Result<ViewRecorded> {
        (**self).record_view(slug).await
    }
}

#[derive(Serialize)]
struct LikeBody<'a> {
    slug: &'a str,
    action: LikeAction,
}

#[derive(Serialize)]
struct ViewBody<'a> {
    slug: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`EngagementApi`] over HTTP using reqwest.
///
/// ```rust,no_run
/// use tally_client::{EngagementApi, HttpEngagementApi};
/// use tally_core::Slug;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = HttpEngagementApi::builder()
///     .base_url("http://127.0.0.1:8080")
///     .build();
/// let state = api.likes(&Slug::new("my-post")?).await?;
/// println!("{} likes", state.count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct HttpEngagementApi {
    /// Base URL the endpoints hang off, e.g. `https://example.com/api`.
    #[builder(setter(into))]
    base_url: String,
    #[builder(default = reqwest::Client::new())]
    http: reqwest::Client,
}

impl HttpEngagementApi {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        warn!(status = status.as_u16(), error = %message, "counter request failed");
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl EngagementApi for HttpEngagementApi {
    async fn likes(&self, slug: &Slug) -> Result<LikeState> {
        debug!(slug = %slug, "fetching likes");
        let response = self
            .http
            .get(self.url("likes"))
            .query(&[("slug", slug.as_str())])
            .send()
            .await?;
        Self::read(response).await
    }

    async fn apply_like(&self, slug: &Slug, action: LikeAction) -> Result<LikeState> {
        debug!(slug = %slug, %action, "sending like action");
        let response = self
            .http
            .post(self.url("likes"))
            .json(&LikeBody {
                slug: slug.as_str(),
                action,
            })
            .send()
            .await?;
        Self::read(response).await
    }

    async fn views(&self, slug: &Slug) -> Result<ViewCount> {
        debug!(slug = %slug, "fetching views");
        let response = self
            .http
            .get(self.url("views"))
            .query(&[("slug", slug.as_str())])
            .send()
            .await?;
        Self::read(response).await
    }

    async fn record_view(&self, slug: &Slug) -> Result<ViewRecorded> {
        debug!(slug = %slug, "recording view");
        let response = self
            .http
            .post(self.url("views"))
            .json(&ViewBody {
                slug: slug.as_str(),
            })
            .send()
            .await?;
        Self::read(response).await
    }
}
