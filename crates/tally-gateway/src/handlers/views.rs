use super::{malformed_body, malformed_query, required_slug};
use crate::error::Result;
use crate::model::{SlugQuery, ViewRecordedResponse, ViewRequest, ViewsResponse};
use crate::state::AppState;
use crate::visitor::Visitor;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use tally_core::Slug;
use tracing::instrument;

/// `GET /views?slug=<slug>`: current view count.
#[instrument(skip_all)]
pub async fn get_views_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<SlugQuery>, QueryRejection>,
) -> Result<Json<ViewsResponse>> {
    let Query(query) = query.map_err(malformed_query)?;
    let slug = required_slug(query.slug)?;

    let views = state.views().peek(&slug).await?;
    Ok(Json(views.into()))
}

/// `POST /views` with `{slug}`: count one view by this visitor.
#[instrument(skip_all)]
pub async fn post_views_handler(
    State(state): State<AppState>,
    Visitor(actor): Visitor,
    payload: std::result::Result<Json<ViewRequest>, JsonRejection>,
) -> Result<Json<ViewRecordedResponse>> {
    let Json(request) = payload.map_err(malformed_body)?;
    let slug = Slug::new(request.slug)?;

    let recorded = state.views().record(&slug, &actor).await?;
    Ok(Json(recorded.into()))
}
