use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::supabase::StoreError;

/// Activity status. Stored as `"Aktif"`, `"Belum Aktif"` or `"-"`; anything
/// else reads as `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum OrmasStatus {
    Active,
    Inactive,
    #[default]
    Unset,
}

impl OrmasStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrmasStatus::Active => "Aktif",
            OrmasStatus::Inactive => "Belum Aktif",
            OrmasStatus::Unset => "-",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, OrmasStatus::Active)
    }
}

impl From<Option<String>> for OrmasStatus {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("Aktif") => OrmasStatus::Active,
            Some("Belum Aktif") => OrmasStatus::Inactive,
            _ => OrmasStatus::Unset,
        }
    }
}

impl From<&str> for OrmasStatus {
    fn from(value: &str) -> Self {
        Some(value.to_string()).into()
    }
}

impl From<OrmasStatus> for String {
    fn from(status: OrmasStatus) -> Self {
        status.as_str().to_string()
    }
}

/// The four independent attachment slots of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentSlot {
    /// Surat Keberadaan (existence letter)
    Surat,
    /// Surat Keterangan (appointment decree)
    Sk,
    StrukturPengurus,
    /// Location photo
    Lokasi,
}

impl AttachmentSlot {
    pub const ALL: [AttachmentSlot; 4] = [
        AttachmentSlot::Surat,
        AttachmentSlot::Sk,
        AttachmentSlot::StrukturPengurus,
        AttachmentSlot::Lokasi,
    ];

    /// Column prefix and object-key segment
    pub fn key(&self) -> &'static str {
        match self {
            AttachmentSlot::Surat => "surat",
            AttachmentSlot::Sk => "sk",
            AttachmentSlot::StrukturPengurus => "struktur_pengurus",
            AttachmentSlot::Lokasi => "lokasi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttachmentSlot::Surat => "Surat Keberadaan",
            AttachmentSlot::Sk => "Surat Keterangan (SK)",
            AttachmentSlot::StrukturPengurus => "Struktur Pengurus",
            AttachmentSlot::Lokasi => "Lokasi Ormas",
        }
    }

    /// Accent color of the slot's link in the map popup
    pub fn link_color(&self) -> &'static str {
        match self {
            AttachmentSlot::Surat => "#16a34a",
            AttachmentSlot::Sk => "#2563eb",
            AttachmentSlot::StrukturPengurus => "#7c3aed",
            AttachmentSlot::Lokasi => "#d97706",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    pub filename: Option<String>,
    pub mime: Option<String>,
    /// Object path inside the storage bucket
    pub path: Option<String>,
}

impl Attachment {
    /// Path usable for a public link, if any
    pub fn stored_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attachments {
    pub surat: Attachment,
    pub sk: Attachment,
    pub struktur_pengurus: Attachment,
    pub lokasi: Attachment,
}

impl Attachments {
    pub fn get(&self, slot: AttachmentSlot) -> &Attachment {
        match slot {
            AttachmentSlot::Surat => &self.surat,
            AttachmentSlot::Sk => &self.sk,
            AttachmentSlot::StrukturPengurus => &self.struktur_pengurus,
            AttachmentSlot::Lokasi => &self.lokasi,
        }
    }

    pub fn get_mut(&mut self, slot: AttachmentSlot) -> &mut Attachment {
        match slot {
            AttachmentSlot::Surat => &mut self.surat,
            AttachmentSlot::Sk => &mut self.sk,
            AttachmentSlot::StrukturPengurus => &mut self.struktur_pengurus,
            AttachmentSlot::Lokasi => &mut self.lokasi,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttachmentSlot, &Attachment)> {
        AttachmentSlot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }
}

/// Organization record
#[derive(Debug, Clone, PartialEq)]
pub struct Ormas {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub status: OrmasStatus,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub attachments: Attachments,
    pub created_at: Option<DateTime<Utc>>,
}

impl Ormas {
    /// Both coordinates, when present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }
}

/// Flat row of the `ormas` table, used both to read records and as the upsert
/// payload. Absent optional columns are not sent, so an update leaves them as
/// they are; `lat`/`lng` are always sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrmasRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub nama: String,
    #[serde(default)]
    pub alamat: String,
    #[serde(default)]
    pub status: OrmasStatus,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surat_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surat_mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surat_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sk_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sk_mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sk_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struktur_pengurus_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struktur_pengurus_mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struktur_pengurus_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lokasi_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lokasi_mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lokasi_path: Option<String>,
}

impl OrmasRow {
    fn slot_columns(
        &mut self,
        slot: AttachmentSlot,
    ) -> (&mut Option<String>, &mut Option<String>, &mut Option<String>) {
        match slot {
            AttachmentSlot::Surat => (
                &mut self.surat_filename,
                &mut self.surat_mime,
                &mut self.surat_path,
            ),
            AttachmentSlot::Sk => (&mut self.sk_filename, &mut self.sk_mime, &mut self.sk_path),
            AttachmentSlot::StrukturPengurus => (
                &mut self.struktur_pengurus_filename,
                &mut self.struktur_pengurus_mime,
                &mut self.struktur_pengurus_path,
            ),
            AttachmentSlot::Lokasi => (
                &mut self.lokasi_filename,
                &mut self.lokasi_mime,
                &mut self.lokasi_path,
            ),
        }
    }

    /// Copy an attachment into the slot's columns, skipping empty values
    pub fn set_attachment(&mut self, slot: AttachmentSlot, attachment: &Attachment) {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        let (filename, mime, path) = self.slot_columns(slot);
        *filename = non_empty(&attachment.filename);
        *mime = non_empty(&attachment.mime);
        *path = non_empty(&attachment.path);
    }

    pub fn attachment(&mut self, slot: AttachmentSlot) -> Attachment {
        let (filename, mime, path) = self.slot_columns(slot);
        Attachment {
            filename: filename.take(),
            mime: mime.take(),
            path: path.take(),
        }
    }
}

/// Accepts RFC 3339 as well as Postgres `timestamp` without offset (read as UTC)
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
                .map(|naive| naive.and_utc())
                .ok()
        })
}

impl TryFrom<OrmasRow> for Ormas {
    type Error = StoreError;

    fn try_from(mut row: OrmasRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .ok_or_else(|| StoreError::Decode("Record row without id".to_string()))?;

        let mut attachments = Attachments::default();
        for slot in AttachmentSlot::ALL {
            *attachments.get_mut(slot) = row.attachment(slot);
        }

        Ok(Ormas {
            id,
            name: row.nama,
            address: row.alamat,
            status: row.status,
            lat: row.lat,
            lng: row.lng,
            attachments,
            created_at: row.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

/// Row of the document read view
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocumentRow {
    pub surat_b64: Option<String>,
    pub surat_filename: Option<String>,
    pub surat_mime: Option<String>,
}

/// A local file waiting to be uploaded into a slot
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentFile {
    pub filename: String,
    /// Browser-reported type; may be empty
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref().filter(|ct| !ct.is_empty())
    }
}
