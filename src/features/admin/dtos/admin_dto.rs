use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::admin::services::OrmasDraft;
use crate::features::ormas::dtos::OrmasDto;
use crate::features::ormas::models::{AttachmentSlot, OrmasStatus};
use crate::modules::map_engine::{LatLng, MapScene};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Username wajib diisi"))]
    #[schema(example = "admin")]
    pub username: String,
    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    /// Bearer token for the admin endpoints
    pub token: String,
}

/// Submit form for OpenAPI documentation only; the handler reads
/// `Multipart` directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitOrmasFormDto {
    /// Present when editing an existing record
    pub id: Option<i64>,
    #[schema(example = "Komunitas A")]
    pub nama: String,
    #[schema(example = "Jl. Merdeka 1")]
    pub alamat: String,
    /// `Aktif`, `Belum Aktif` or `-`
    #[schema(example = "Aktif")]
    pub status: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub surat_filename: Option<String>,
    pub surat_mime: Option<String>,
    /// Surat Keberadaan file
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub surat: Option<String>,
    /// Surat Keterangan (SK) file
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub sk: Option<String>,
    /// Struktur Pengurus file
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub struktur_pengurus: Option<String>,
    /// Location photo
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub lokasi: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponseDto {
    pub record: OrmasDto,
    /// Full list after the save
    pub items: Vec<OrmasDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponseDto {
    pub deleted_id: i64,
    pub items: Vec<OrmasDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DraftAttachmentDto {
    pub slot: AttachmentSlot,
    pub filename: Option<String>,
    pub mime: Option<String>,
    pub path: Option<String>,
}

/// Admin form prefilled from an existing record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DraftDto {
    pub id: Option<i64>,
    pub name: String,
    pub address: String,
    #[schema(value_type = String, example = "Belum Aktif")]
    pub status: OrmasStatus,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub attachments: Vec<DraftAttachmentDto>,
}

impl From<&OrmasDraft> for DraftDto {
    fn from(draft: &OrmasDraft) -> Self {
        Self {
            id: draft.id,
            name: draft.name.clone(),
            address: draft.address.clone(),
            status: draft.status,
            lat: draft.lat,
            lng: draft.lng,
            attachments: draft
                .attachments
                .iter()
                .map(|(slot, a)| DraftAttachmentDto {
                    slot,
                    filename: a.filename.clone(),
                    mime: a.mime.clone(),
                    path: a.path.clone(),
                })
                .collect(),
        }
    }
}

/// Replay of clicks on the location picker
#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationPickerRequestDto {
    /// Starting point; defaults to Jakarta
    pub initial: Option<LatLng>,
    /// Clicked coordinates, in order
    #[serde(default)]
    pub picks: Vec<LatLng>,
    /// Confirm the last pick instead of cancelling
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LocationPickerResponseDto {
    pub candidate: LatLng,
    #[schema(example = "Lat: -6.200000 | Lng: 106.816000")]
    pub readout: String,
    pub maps_url: String,
    /// Picker map before it was closed
    #[serde(skip_deserializing)]
    pub scene: Option<MapScene>,
    /// Coordinate handed back to the form; absent when cancelled
    pub confirmed: Option<LatLng>,
}
