use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::ormas::dtos::{ListOrmasQuery, OrmasDto};
use crate::features::ormas::services::OrmasService;
use crate::shared::types::{ApiResponse, Meta};

/// List organizations for the public directory
#[utoipa::path(
    get,
    path = "/api/guest/ormas",
    params(ListOrmasQuery),
    responses(
        (status = 200, description = "Matching organizations", body = ApiResponse<Vec<OrmasDto>>),
        (status = 502, description = "Record store unavailable")
    ),
    tag = "guest"
)]
pub async fn list_ormas(
    State(service): State<Arc<OrmasService>>,
    Query(query): Query<ListOrmasQuery>,
) -> Result<Json<ApiResponse<Vec<OrmasDto>>>> {
    let items = service.list(query.q.as_deref()).await?;
    let meta = Meta {
        total: items.len() as i64,
    };
    Ok(Json(ApiResponse::success(Some(items), None, Some(meta))))
}
