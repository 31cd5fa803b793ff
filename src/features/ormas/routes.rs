use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::ormas::handlers;
use crate::features::ormas::services::OrmasService;

/// Create routes for the public organization list
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<OrmasService>) -> Router {
    Router::new()
        .route("/api/guest/ormas", get(handlers::list_ormas))
        .with_state(service)
}
