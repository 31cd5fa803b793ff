use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};

use crate::core::middleware::admin_auth_middleware;
use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create admin routes; everything except login requires an admin session
pub fn routes(service: Arc<AdminService>) -> Router {
    let protected = Router::new()
        .route("/api/admin/logout", post(handlers::logout))
        .route(
            "/api/admin/ormas",
            get(handlers::list_ormas).post(handlers::submit_ormas),
        )
        .route("/api/admin/ormas/{id}/draft", get(handlers::get_draft))
        .route("/api/admin/ormas/{id}", delete(handlers::delete_ormas))
        .route("/api/admin/location-picker", post(handlers::pick_location))
        .route_layer(from_fn_with_state(service.gate(), admin_auth_middleware))
        .with_state(Arc::clone(&service));

    Router::new()
        .route("/api/admin/login", post(handlers::login))
        .with_state(service)
        .merge(protected)
}
