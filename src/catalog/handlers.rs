//! Public catalog endpoints

use std::sync::Arc;

use axum::extract::State;

use super::models::Flower;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiPath, ApiResponse, ApiResult, ok};

/// List flowers
///
/// GET /api/v1/flowers
#[utoipa::path(
    get,
    path = "/api/v1/flowers",
    responses(
        (status = 200, description = "Catalog with live stock", body = ApiResponse<Vec<Flower>>)
    ),
    tag = "Catalog"
)]
pub async fn list_flowers(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Flower>> {
    ok(state.catalog.list().await?)
}

/// Get flower by ID
///
/// GET /api/v1/flowers/{flower_id}
#[utoipa::path(
    get,
    path = "/api/v1/flowers/{flower_id}",
    params(("flower_id" = i64, Path, description = "Flower ID")),
    responses(
        (status = 200, description = "Flower", body = ApiResponse<Flower>),
        (status = 400, description = "Invalid flower id (code 10)"),
        (status = 404, description = "Flower not found (code 200001)")
    ),
    tag = "Catalog"
)]
pub async fn get_flower(
    State(state): State<Arc<AppState>>,
    ApiPath(flower_id): ApiPath<i64>,
) -> ApiResult<Flower> {
    ok(state.catalog.get(flower_id).await?)
}
