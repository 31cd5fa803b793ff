use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::directory::dtos::MapSceneQuery;
use crate::features::directory::services::DirectoryService;
use crate::modules::map_engine::MapScene;
use crate::shared::types::ApiResponse;

/// Directory map scene
///
/// Markers for every matching organization with coordinates. With `selected`,
/// the view is flown to that organization and its popup is open.
#[utoipa::path(
    get,
    path = "/api/guest/map",
    params(MapSceneQuery),
    responses(
        (status = 200, description = "Rendered map scene", body = ApiResponse<MapScene>),
        (status = 502, description = "Record store unavailable")
    ),
    tag = "guest"
)]
pub async fn get_map_scene(
    State(service): State<Arc<DirectoryService>>,
    Query(query): Query<MapSceneQuery>,
) -> Result<Json<ApiResponse<MapScene>>> {
    let scene = service.scene(query.q.as_deref(), query.selected).await?;
    Ok(Json(ApiResponse::success(Some(scene), None, None)))
}
