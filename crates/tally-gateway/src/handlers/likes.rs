use super::{malformed_body, malformed_query, required_slug};
use crate::error::Result;
use crate::model::{LikeRequest, LikesResponse, SlugQuery};
use crate::state::AppState;
use crate::visitor::Visitor;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use tally_core::{LikeAction, Slug};
use tracing::instrument;

/// `GET /likes?slug=<slug>`: current count and whether this visitor liked it.
#[instrument(skip_all)]
pub async fn get_likes_handler(
    State(state): State<AppState>,
    Visitor(actor): Visitor,
    query: std::result::Result<Query<SlugQuery>, QueryRejection>,
) -> Result<Json<LikesResponse>> {
    let Query(query) = query.map_err(malformed_query)?;
    let slug = required_slug(query.slug)?;

    let like_state = state.likes().peek(&slug, &actor).await?;
    Ok(Json(like_state.into()))
}

/// `POST /likes` with `{slug, action}`: like or unlike on behalf of this visitor.
#[instrument(skip_all)]
pub async fn post_likes_handler(
    State(state): State<AppState>,
    Visitor(actor): Visitor,
    payload: std::result::Result<Json<LikeRequest>, JsonRejection>,
) -> Result<Json<LikesResponse>> {
    let Json(request) = payload.map_err(malformed_body)?;
    let slug = Slug::new(request.slug)?;
    let action: LikeAction = request.action.parse()?;

    let like_state = state.likes().apply(&slug, &actor, action).await?;
    Ok(Json(like_state.into()))
}
