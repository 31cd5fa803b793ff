//! Admin form state and its save/edit/delete flow.
//!
//! [`AdminForm`] is owned by the caller; every operation takes it by
//! reference, and failed operations leave it exactly as it was.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::admin::services::LocationPicker;
use crate::features::ormas::models::{
    Attachment, AttachmentFile, AttachmentSlot, Attachments, Ormas, OrmasRow, OrmasStatus,
};
use crate::features::ormas::services::RecordStore;
use crate::modules::map_engine::{LatLng, MapEngine};
use crate::shared::constants::{DEFAULT_CONTENT_TYPE, DEFAULT_DOCUMENT_MIME};

pub const SAVED_MESSAGE: &str = "Data tersimpan.";

/// Editable copy of a record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrmasDraft {
    /// `Some` when editing an existing record
    pub id: Option<i64>,
    pub name: String,
    pub address: String,
    pub status: OrmasStatus,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub attachments: Attachments,
}

impl OrmasDraft {
    pub fn coordinates(&self) -> Option<LatLng> {
        self.lat.zip(self.lng).map(LatLng::from)
    }

    /// Upsert payload; the id is only present when editing
    fn to_payload(&self) -> OrmasRow {
        let mut payload = OrmasRow {
            id: self.id,
            nama: self.name.clone(),
            alamat: self.address.clone(),
            status: self.status,
            lat: self.lat,
            lng: self.lng,
            ..Default::default()
        };
        for (slot, attachment) in self.attachments.iter() {
            // Stored paths only change through a fresh upload
            payload.set_attachment(
                slot,
                &Attachment {
                    filename: attachment.filename.clone(),
                    mime: attachment.mime.clone(),
                    path: None,
                },
            );
        }
        payload
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftField {
    Id(Option<i64>),
    Name(String),
    Address(String),
    Status(OrmasStatus),
    Lat(Option<f64>),
    Lng(Option<f64>),
    Filename(AttachmentSlot, Option<String>),
    Mime(AttachmentSlot, Option<String>),
}

/// Outcome of a successful submit
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub saved: Ormas,
    /// Full list fetched after the upsert
    pub records: Vec<Ormas>,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminForm {
    pub draft: OrmasDraft,
    /// Local files waiting for upload, at most one per slot
    pub staged: BTreeMap<AttachmentSlot, AttachmentFile>,
}

impl AdminForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: DraftField) {
        let draft = &mut self.draft;
        match field {
            DraftField::Id(id) => draft.id = id,
            DraftField::Name(name) => draft.name = name,
            DraftField::Address(address) => draft.address = address,
            DraftField::Status(status) => draft.status = status,
            DraftField::Lat(lat) => draft.lat = lat,
            DraftField::Lng(lng) => draft.lng = lng,
            DraftField::Filename(slot, filename) => draft.attachments.get_mut(slot).filename = filename,
            DraftField::Mime(slot, mime) => draft.attachments.get_mut(slot).mime = mime,
        }
    }

    /// Run a location picker seeded with the draft's coordinates. `interact`
    /// drives the picker and returns whether to confirm; a confirmed pick is
    /// merged into lat/lng.
    pub fn pick_on_map<E, F>(&mut self, engine: E, interact: F) -> Option<LatLng>
    where
        E: MapEngine,
        F: FnOnce(&mut LocationPicker<E>) -> bool,
    {
        let mut picker = LocationPicker::open(engine, self.draft.coordinates());
        if !interact(&mut picker) {
            picker.cancel();
            return None;
        }

        let picked = picker.confirm();
        self.draft.lat = Some(picked.lat);
        self.draft.lng = Some(picked.lng);
        Some(picked)
    }

    /// Stage a file for `slot`, filling a blank filename/MIME from it
    pub fn stage_file(&mut self, slot: AttachmentSlot, file: AttachmentFile) {
        let attachment = self.draft.attachments.get_mut(slot);
        if attachment.filename.as_deref().map_or(true, str::is_empty) {
            attachment.filename = Some(file.filename.clone());
        }
        if attachment.mime.as_deref().map_or(true, str::is_empty) {
            attachment.mime = Some(file.content_type().unwrap_or(DEFAULT_CONTENT_TYPE).to_string());
        }
        self.staged.insert(slot, file);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copy an existing record into the draft; staged files are dropped
    pub fn load_for_edit(&mut self, record: &Ormas) {
        self.draft = OrmasDraft {
            id: Some(record.id),
            name: record.name.clone(),
            address: record.address.clone(),
            status: record.status,
            lat: record.lat,
            lng: record.lng,
            attachments: record.attachments.clone(),
        };
        self.staged.clear();
    }

    pub fn validate(&self) -> Result<()> {
        if self.draft.name.trim().is_empty() {
            return Err(AppError::Validation("Nama wajib diisi".to_string()));
        }
        if self.draft.address.trim().is_empty() {
            return Err(AppError::Validation("Alamat wajib diisi".to_string()));
        }
        Ok(())
    }

    /// Upload staged files concurrently, upsert the record, refresh the list
    /// and reset. Any failure returns early with the form untouched.
    pub async fn submit(&mut self, store: &dyn RecordStore) -> Result<SubmitOutcome> {
        self.validate()?;

        let folder_key = self
            .draft
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let folder_key = folder_key.as_str();

        let uploads = self.staged.iter().map(|(slot, file)| async move {
            let stored = store.upload_attachment(*slot, file, folder_key).await?;
            Ok::<_, AppError>((*slot, file, stored))
        });
        let uploaded = try_join_all(uploads).await?;
        debug!("Uploaded {} attachment(s) into folder {}", uploaded.len(), folder_key);

        let mut payload = self.draft.to_payload();
        for (slot, file, stored) in uploaded {
            payload.set_attachment(
                slot,
                &Attachment {
                    filename: Some(file.filename.clone()),
                    mime: Some(file.content_type().unwrap_or(DEFAULT_DOCUMENT_MIME).to_string()),
                    path: Some(stored.path),
                },
            );
        }

        let saved = store.upsert(&payload).await?;
        let records = store.list().await?;
        info!("ORMAS {} saved from admin form", saved.id);

        self.reset();
        Ok(SubmitOutcome {
            saved,
            records,
            message: SAVED_MESSAGE,
        })
    }
}

/// Delete a record and return the refreshed list
pub async fn delete_record(store: &dyn RecordStore, id: i64) -> Result<Vec<Ormas>> {
    store.delete(id).await?;
    let records = store.list().await?;
    Ok(records)
}
