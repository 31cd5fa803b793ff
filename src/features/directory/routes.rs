use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::directory::handlers;
use crate::features::directory::services::DirectoryService;

/// Create routes for the public directory map
pub fn routes(service: Arc<DirectoryService>) -> Router {
    Router::new()
        .route("/api/guest/map", get(handlers::get_map_scene))
        .with_state(service)
}
