use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::surat::dtos::{DocumentDownloadDto, ViewerState};
use crate::features::surat::services::SuratService;
use crate::shared::types::ApiResponse;

/// Open the existence letter of an organization
///
/// Always answers 200; a letter that cannot be shown comes back as the
/// `error` state with its message.
#[utoipa::path(
    get,
    path = "/api/surat/{id}",
    params(
        ("id" = i64, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Viewer state", body = ApiResponse<ViewerState>)
    ),
    tag = "surat"
)]
pub async fn view_surat(
    State(service): State<Arc<SuratService>>,
    Path(id): Path<i64>,
) -> Json<ApiResponse<ViewerState>> {
    let state = service.view(id).await;
    Json(ApiResponse::success(Some(state), None, None))
}

/// Download descriptor (data URI) for the existence letter
#[utoipa::path(
    get,
    path = "/api/surat/{id}/download",
    params(
        ("id" = i64, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Letter as data URI", body = ApiResponse<DocumentDownloadDto>),
        (status = 404, description = "Letter not available")
    ),
    tag = "surat"
)]
pub async fn download_surat(
    State(service): State<Arc<SuratService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DocumentDownloadDto>>> {
    let download = service.download(id).await?;
    Ok(Json(ApiResponse::success(Some(download), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ormas::models::DocumentRow;
    use crate::features::surat::routes;
    use crate::modules::pdf::LopdfRenderer;
    use crate::shared::test_helpers::MemoryRecordStore;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server() -> TestServer {
        let store = MemoryRecordStore::default();
        store.documents.lock().unwrap().insert(
            1,
            DocumentRow {
                surat_b64: Some("SGFsbw".to_string()),
                surat_filename: Some("surat.txt".to_string()),
                surat_mime: Some("text/plain".to_string()),
            },
        );
        store.documents.lock().unwrap().insert(
            3,
            DocumentRow {
                surat_b64: Some("JVBERi0xLjQKcnVzYWs=".to_string()),
                surat_filename: Some("rusak.pdf".to_string()),
                surat_mime: Some("application/pdf".to_string()),
            },
        );
        let service = SuratService::new(Arc::new(store), Arc::new(LopdfRenderer::new()));
        TestServer::new(routes(Arc::new(service))).unwrap()
    }

    #[tokio::test]
    async fn test_view_missing_letter_is_error_state() {
        let response = server().get("/api/surat/2").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["data"]["state"], "error");
        assert_eq!(body["data"]["message"], "Surat tidak tersedia.");
    }

    #[tokio::test]
    async fn test_view_non_pdf_is_notice() {
        let body: Value = server().get("/api/surat/1").await.json();
        assert_eq!(body["data"]["state"], "notice");
        assert_eq!(body["data"]["filename"], "surat.txt");
    }

    #[tokio::test]
    async fn test_download() {
        let server = server();

        let body: Value = server.get("/api/surat/1/download").await.json();
        assert_eq!(body["data"]["data_uri"], "data:text/plain;base64,SGFsbw==");

        let unrenderable: Value = server.get("/api/surat/3").await.json();
        assert_eq!(unrenderable["data"]["state"], "error");
        let fallback = server.get("/api/surat/3/download").await;
        fallback.assert_status_ok();
        let body: Value = fallback.json();
        assert_eq!(body["data"]["filename"], "rusak.pdf");

        let missing = server.get("/api/surat/2/download").await;
        missing.assert_status(StatusCode::NOT_FOUND);
        let body: Value = missing.json();
        assert_eq!(body["message"], "Surat tidak tersedia.");
    }
}
