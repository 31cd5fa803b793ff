use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    Extension, Json,
};
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{
    DeleteResponseDto, DraftDto, LocationPickerRequestDto, LocationPickerResponseDto,
    LoginRequestDto, LoginResponseDto, SubmitOrmasFormDto, SubmitResponseDto,
};
use crate::features::admin::services::{AdminForm, AdminService, AdminSession, DraftField};
use crate::features::ormas::dtos::{ListOrmasQuery, OrmasDto};
use crate::features::ormas::models::{AttachmentFile, AttachmentSlot, OrmasStatus};
use crate::shared::constants::MAX_ATTACHMENT_SIZE;
use crate::shared::types::{ApiResponse, Meta};

/// Admin login with the static credentials
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LoginResponseDto>),
        (status = 401, description = "Username atau password salah")
    ),
    tag = "admin"
)]
pub async fn login(
    State(service): State<Arc<AdminService>>,
    Json(dto): Json<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = service.gate().login(&dto.username, &dto.password).await?;
    Ok(Json(ApiResponse::success(
        Some(LoginResponseDto { token }),
        None,
        None,
    )))
}

/// End the current admin session
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Session revoked"),
        (status = 401, description = "Missing or invalid session")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn logout(
    State(service): State<Arc<AdminService>>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<ApiResponse<()>>> {
    service.gate().logout(&session.token).await;
    Ok(Json(ApiResponse::success(
        None,
        Some("Logged out".to_string()),
        None,
    )))
}

/// List organizations for the admin table
#[utoipa::path(
    get,
    path = "/api/admin/ormas",
    params(ListOrmasQuery),
    responses(
        (status = 200, description = "Matching organizations", body = ApiResponse<Vec<OrmasDto>>),
        (status = 401, description = "Missing or invalid session")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_ormas(
    State(service): State<Arc<AdminService>>,
    Query(query): Query<ListOrmasQuery>,
) -> Result<Json<ApiResponse<Vec<OrmasDto>>>> {
    let items = service.list(query.q.as_deref()).await?;
    let meta = Meta {
        total: items.len() as i64,
    };
    Ok(Json(ApiResponse::success(Some(items), None, Some(meta))))
}

fn parse_optional<T: std::str::FromStr>(field: &str, text: &str) -> Result<Option<T>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<T>()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid value for '{}': {}", field, text)))
}

fn non_empty(text: String) -> Option<String> {
    Some(text).filter(|t| !t.trim().is_empty())
}

/// Build the admin form from a multipart submission
async fn read_form(mut multipart: Multipart) -> Result<AdminForm> {
    let mut form = AdminForm::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if let Some(slot) = AttachmentSlot::from_key(&name) {
            let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
            let content_type = field.content_type().map(|s| s.to_string());
            let bytes = field.bytes().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;

            // Browsers send an empty part when no file was chosen
            if filename.is_empty() && bytes.is_empty() {
                continue;
            }
            if bytes.len() > MAX_ATTACHMENT_SIZE {
                return Err(AppError::BadRequest(format!(
                    "File too large. Maximum size is {} MB",
                    MAX_ATTACHMENT_SIZE / 1024 / 1024
                )));
            }

            form.stage_file(
                slot,
                AttachmentFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                },
            );
            continue;
        }

        let text = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
        })?;

        let update = match name.as_str() {
            "id" => DraftField::Id(parse_optional("id", &text)?),
            "nama" => DraftField::Name(text),
            "alamat" => DraftField::Address(text),
            "status" => DraftField::Status(OrmasStatus::from(text.as_str())),
            "lat" => DraftField::Lat(parse_optional("lat", &text)?),
            "lng" => DraftField::Lng(parse_optional("lng", &text)?),
            other => {
                let column = other
                    .strip_suffix("_filename")
                    .map(|prefix| (prefix, true))
                    .or_else(|| other.strip_suffix("_mime").map(|prefix| (prefix, false)));

                match column.and_then(|(prefix, is_name)| {
                    AttachmentSlot::from_key(prefix).map(|slot| (slot, is_name))
                }) {
                    Some((slot, true)) => DraftField::Filename(slot, non_empty(text)),
                    Some((slot, false)) => DraftField::Mime(slot, non_empty(text)),
                    None => {
                        debug!("Ignoring unknown field: {}", other);
                        continue;
                    }
                }
            }
        };
        form.set_field(update);
    }

    Ok(form)
}

/// Create or update an organization
///
/// Staged files are uploaded first, all at once; the record is saved only
/// when every upload succeeded.
#[utoipa::path(
    post,
    path = "/api/admin/ormas",
    request_body(
        content = SubmitOrmasFormDto,
        content_type = "multipart/form-data",
        description = "Record fields plus optional files per attachment slot",
    ),
    responses(
        (status = 200, description = "Data tersimpan.", body = ApiResponse<SubmitResponseDto>),
        (status = 400, description = "Invalid form"),
        (status = 401, description = "Missing or invalid session"),
        (status = 502, description = "Upload or save failed")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn submit_ormas(
    State(service): State<Arc<AdminService>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<SubmitResponseDto>>> {
    let form = read_form(multipart).await?;
    let (saved, message) = service.submit(form).await?;
    Ok(Json(ApiResponse::success(
        Some(saved),
        Some(message.to_string()),
        None,
    )))
}

/// Load a record into an edit draft
#[utoipa::path(
    get,
    path = "/api/admin/ormas/{id}/draft",
    params(("id" = i64, Path, description = "ORMAS id")),
    responses(
        (status = 200, description = "Draft for editing", body = ApiResponse<DraftDto>),
        (status = 404, description = "ORMAS not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn get_draft(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DraftDto>>> {
    let draft = service.draft(id).await?;
    Ok(Json(ApiResponse::success(Some(draft), None, None)))
}

/// Delete an organization
#[utoipa::path(
    delete,
    path = "/api/admin/ormas/{id}",
    params(("id" = i64, Path, description = "ORMAS id")),
    responses(
        (status = 200, description = "Deleted; refreshed list", body = ApiResponse<DeleteResponseDto>),
        (status = 502, description = "Record store rejected the delete")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_ormas(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeleteResponseDto>>> {
    let deleted = service.delete(id).await?;
    Ok(Json(ApiResponse::success(Some(deleted), None, None)))
}

/// Run the location picker over a sequence of clicks
#[utoipa::path(
    post,
    path = "/api/admin/location-picker",
    request_body = LocationPickerRequestDto,
    responses(
        (status = 200, description = "Picker state and confirmed point", body = ApiResponse<LocationPickerResponseDto>)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn pick_location(
    State(service): State<Arc<AdminService>>,
    Json(request): Json<LocationPickerRequestDto>,
) -> Result<Json<ApiResponse<LocationPickerResponseDto>>> {
    let response = service.pick_location(request)?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}
