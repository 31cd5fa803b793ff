use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::ormas::models::{AttachmentSlot, Ormas, OrmasStatus};

/// Query params shared by the record lists
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListOrmasQuery {
    /// Case-insensitive match on name or address, or substring of the id
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachmentDto {
    pub slot: AttachmentSlot,
    #[schema(example = "Surat Keberadaan")]
    pub label: String,
    pub filename: Option<String>,
    pub mime: Option<String>,
    pub path: Option<String>,
    /// Public storage URL, present when the slot has a stored path
    pub public_url: Option<String>,
}

/// Organization record as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrmasDto {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[schema(value_type = String, example = "Aktif")]
    pub status: OrmasStatus,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    /// Always four entries, in slot order
    pub attachments: Vec<AttachmentDto>,
}

impl OrmasDto {
    pub fn from_record(record: &Ormas, public_url: impl Fn(&str) -> Option<String>) -> Self {
        let attachments = record
            .attachments
            .iter()
            .map(|(slot, attachment)| AttachmentDto {
                slot,
                label: slot.label().to_string(),
                filename: attachment.filename.clone(),
                mime: attachment.mime.clone(),
                path: attachment.path.clone(),
                public_url: attachment.stored_path().and_then(&public_url),
            })
            .collect();

        Self {
            id: record.id,
            name: record.name.clone(),
            address: record.address.clone(),
            status: record.status,
            lat: record.lat,
            lng: record.lng,
            created_at: record.created_at,
            attachments,
        }
    }
}
