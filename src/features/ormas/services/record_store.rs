use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::core::config::SupabaseConfig;
use crate::features::ormas::models::{
    AttachmentFile, AttachmentSlot, DocumentRow, Ormas, OrmasRow,
};
use crate::modules::supabase::{StoreError, SupabaseRestClient, SupabaseStorageClient};
use crate::shared::constants::{ATTACHMENT_KEY_PREFIX, DEFAULT_CONTENT_TYPE};
use crate::shared::validation::sanitize_filename;

const DOCUMENT_COLUMNS: &str = "surat_b64,surat_filename,surat_mime";

/// Result of storing one attachment
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAttachment {
    pub path: String,
}

/// Access to ORMAS records and their attachments
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record, unfiltered
    async fn list(&self) -> Result<Vec<Ormas>, StoreError>;

    /// Insert when `payload.id` is `None`, update otherwise
    async fn upsert(&self, payload: &OrmasRow) -> Result<Ormas, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Upload a file for `slot`; overwrites an object already at the same key
    async fn upload_attachment(
        &self,
        slot: AttachmentSlot,
        file: &AttachmentFile,
        folder_key: &str,
    ) -> Result<StoredAttachment, StoreError>;

    /// Row of the document view; `None` when the id has no row
    async fn fetch_document(&self, id: i64) -> Result<Option<DocumentRow>, StoreError>;

    /// Public retrieval URL for a stored path
    fn public_url(&self, path: &str) -> Option<String>;
}

/// `public/ormas_surat/{slot}/{folder}/{millis}-{sanitized name}`
pub fn attachment_object_key(
    slot: AttachmentSlot,
    folder_key: &str,
    timestamp_ms: i64,
    filename: &str,
) -> String {
    format!(
        "{}/{}/{}/{}-{}",
        ATTACHMENT_KEY_PREFIX,
        slot.key(),
        folder_key,
        timestamp_ms,
        sanitize_filename(filename)
    )
}

pub struct SupabaseRecordStore {
    rest: SupabaseRestClient,
    storage: SupabaseStorageClient,
    record_table: String,
    document_view: String,
}

impl SupabaseRecordStore {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            rest: SupabaseRestClient::new(config),
            storage: SupabaseStorageClient::new(config),
            record_table: config.record_table.clone(),
            document_view: config.document_view.clone(),
        }
    }
}

#[async_trait]
impl RecordStore for SupabaseRecordStore {
    async fn list(&self) -> Result<Vec<Ormas>, StoreError> {
        let rows: Vec<OrmasRow> = self.rest.select_all(&self.record_table).await?;
        debug!("Fetched {} ORMAS rows", rows.len());
        rows.into_iter().map(Ormas::try_from).collect()
    }

    async fn upsert(&self, payload: &OrmasRow) -> Result<Ormas, StoreError> {
        let row: OrmasRow = self.rest.upsert(&self.record_table, payload).await?;
        let record = Ormas::try_from(row)?;
        info!(
            "Saved ORMAS {} ({})",
            record.id,
            if payload.id.is_some() { "update" } else { "insert" }
        );
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.rest.delete_by_id(&self.record_table, id).await?;
        info!("Deleted ORMAS {}", id);
        Ok(())
    }

    async fn upload_attachment(
        &self,
        slot: AttachmentSlot,
        file: &AttachmentFile,
        folder_key: &str,
    ) -> Result<StoredAttachment, StoreError> {
        let key = attachment_object_key(
            slot,
            folder_key,
            Utc::now().timestamp_millis(),
            &file.filename,
        );
        let content_type = file.content_type().unwrap_or(DEFAULT_CONTENT_TYPE);

        let path = self
            .storage
            .upload(&key, file.bytes.clone(), content_type)
            .await?;
        Ok(StoredAttachment { path })
    }

    async fn fetch_document(&self, id: i64) -> Result<Option<DocumentRow>, StoreError> {
        self.rest
            .select_one_by_id(&self.document_view, id, DOCUMENT_COLUMNS)
            .await
    }

    fn public_url(&self, path: &str) -> Option<String> {
        self.storage.public_url(path)
    }
}
