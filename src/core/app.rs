//! Service wiring and the HTTP router shared by `main` and route tests

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::StatusCode, middleware::from_fn, routing::get, Router};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::admin::{self, AdminGate, AdminService};
use crate::features::directory::{self, DirectoryService};
use crate::features::ormas::{self, OrmasService, RecordStore, SupabaseRecordStore};
use crate::features::surat::{self, SuratService};
use crate::modules::map_engine::Viewport;
use crate::modules::pdf::{DocumentRenderer, LopdfRenderer};

/// Every feature service, built once at startup
pub struct AppServices {
    pub ormas: Arc<OrmasService>,
    pub directory: Arc<DirectoryService>,
    pub surat: Arc<SuratService>,
    pub admin: Arc<AdminService>,
}

impl AppServices {
    /// Services backed by the configured Supabase project
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn RecordStore> = Arc::new(SupabaseRecordStore::new(&config.supabase));
        Self::with_backends(config, store, Arc::new(LopdfRenderer::new()))
    }

    pub fn with_backends(
        config: &Config,
        store: Arc<dyn RecordStore>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        let viewport = Viewport::new(config.map.viewport_width, config.map.viewport_height);

        let ormas = Arc::new(OrmasService::new(Arc::clone(&store)));
        let directory = Arc::new(DirectoryService::new(Arc::clone(&ormas), viewport));
        let surat = Arc::new(SuratService::new(store, renderer));
        let gate = Arc::new(AdminGate::new(&config.admin));
        let admin = Arc::new(AdminService::new(gate, Arc::clone(&ormas), viewport));

        Self {
            ormas,
            directory,
            surat,
            admin,
        }
    }
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

fn swagger_router(config: &Config) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        swagger.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
            credentials,
        ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        swagger
    }
}

pub fn build_router(config: &Config, services: &AppServices) -> Router {
    let public_routes = Router::new()
        .merge(ormas::routes(Arc::clone(&services.ormas)))
        .merge(directory::routes(Arc::clone(&services.directory)))
        .merge(surat::routes(Arc::clone(&services.surat)));

    Router::new()
        .merge(swagger_router(config))
        .merge(admin::routes(Arc::clone(&services.admin)))
        .merge(public_routes)
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{sample_ormas, test_config, MemoryRecordStore};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server(store: MemoryRecordStore) -> TestServer {
        let config = test_config();
        let services =
            AppServices::with_backends(&config, Arc::new(store), Arc::new(LopdfRenderer::new()));
        TestServer::new(build_router(&config, &services)).unwrap()
    }

    #[tokio::test]
    async fn test_health_sets_request_id() {
        let response = server(MemoryRecordStore::default()).get("/health").await;
        response.assert_status_ok();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_client_request_id_is_propagated() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let config = test_config();
        let services = AppServices::with_backends(
            &config,
            Arc::new(MemoryRecordStore::default()),
            Arc::new(LopdfRenderer::new()),
        );
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap();

        let response = build_router(&config, &services)
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "req-123");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let body: Value = server(MemoryRecordStore::default())
            .get("/api-docs/openapi.json")
            .await
            .json();
        assert_eq!(body["info"]["title"], "SI ORMAS API");
    }

    #[tokio::test]
    async fn test_admin_session_flow() {
        let server = server(MemoryRecordStore::with_records(vec![sample_ormas(
            42,
            "Komunitas A",
            "Jl. Merdeka 1",
        )]));

        server
            .get("/api/admin/ormas")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let login: Value = server
            .post("/api/admin/login")
            .json(&json!({"username": "admin", "password": "rahasia"}))
            .await
            .json();
        let token = login["data"]["token"].as_str().unwrap().to_string();

        let listed: Value = server
            .get("/api/admin/ormas")
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(listed["meta"]["total"], 1);

        server
            .post("/api/admin/logout")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();
        server
            .get("/api/admin/ormas")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_guest_routes_are_public() {
        let server = server(MemoryRecordStore::with_records(vec![sample_ormas(
            1,
            "Komunitas A",
            "Jl. Merdeka 1",
        )]));

        server.get("/api/guest/ormas").await.assert_status_ok();
        server.get("/api/guest/map").await.assert_status_ok();
        server.get("/api/surat/1").await.assert_status_ok();
    }
}
