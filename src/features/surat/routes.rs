use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::surat::handlers;
use crate::features::surat::services::SuratService;

/// Create routes for the existence-letter viewer
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<SuratService>) -> Router {
    Router::new()
        .route("/api/surat/{id}", get(handlers::view_surat))
        .route("/api/surat/{id}/download", get(handlers::download_surat))
        .with_state(service)
}
