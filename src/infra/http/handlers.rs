use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::list::AddItemCommand;

use super::error::ApiError;
use super::models::{AddItemRequest, HealthResponse, ItemsQuery, OwnerId, RemovedResponse};
use super::state::HttpState;

pub async fn add_item(
    State(state): State<HttpState>,
    OwnerId(owner_id): OwnerId,
    Json(request): Json<AddItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (content_id, content_kind) = request.validate()?;
    let record = state
        .list
        .add_item(
            &owner_id,
            AddItemCommand {
                content_id,
                content_kind,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn remove_item(
    State(state): State<HttpState>,
    OwnerId(owner_id): OwnerId,
    Path(content_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.list.remove_item(&owner_id, &content_id).await?;
    Ok(Json(RemovedResponse {
        content_id,
        removed: true,
    }))
}

pub async fn list_items(
    State(state): State<HttpState>,
    OwnerId(owner_id): OwnerId,
    Query(query): Query<ItemsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .list
        .get_page(&owner_id, query.page, query.page_size)
        .await?;
    Ok(Json(page))
}

pub async fn get_stats(
    State(state): State<HttpState>,
    OwnerId(owner_id): OwnerId,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.list.get_stats(&owner_id).await?;
    Ok(Json(stats))
}

/// Liveness probe; deliberately free of dependency checks.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}
