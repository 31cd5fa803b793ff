#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use axum::Router;

#[cfg(test)]
use crate::core::config::{
    AdminConfig, AppConfig, Config, MapConfig, SupabaseConfig, SwaggerConfig,
};
#[cfg(test)]
use crate::features::ormas::models::{
    AttachmentFile, AttachmentSlot, Attachments, DocumentRow, Ormas, OrmasRow, OrmasStatus,
};
#[cfg(test)]
use crate::features::ormas::services::{attachment_object_key, RecordStore, StoredAttachment};
#[cfg(test)]
use crate::modules::supabase::{StoreError, SupabaseStorageClient};

/// Serve `router` on an ephemeral local port and return its base URL
#[cfg(test)]
pub async fn spawn_fake_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake server");
    });
    format!("http://{}", addr)
}

/// Supabase settings pointing at a fake server
#[cfg(test)]
pub fn test_supabase_config(base_url: &str) -> SupabaseConfig {
    SupabaseConfig {
        url: base_url.trim_end_matches('/').to_string(),
        anon_key: "test-anon-key".to_string(),
        bucket: "ormas_surat".to_string(),
        record_table: "ormas".to_string(),
        document_view: "ormas_surat_v".to_string(),
    }
}

/// Full configuration for router tests; admin login is `admin` / `rahasia`
#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["*".to_string()],
            max_request_body_size: 25 * 1024 * 1024,
        },
        supabase: test_supabase_config("https://example.supabase.co"),
        admin: AdminConfig {
            username: "admin".to_string(),
            password: "rahasia".to_string(),
            session_ttl_secs: 3600,
        },
        map: MapConfig::default(),
        swagger: SwaggerConfig {
            username: None,
            password: None,
            title: "SI ORMAS API".to_string(),
            version: "0.1.0".to_string(),
            description: "API documentation for SI ORMAS".to_string(),
        },
    }
}

#[cfg(test)]
pub fn sample_ormas(id: i64, name: &str, address: &str) -> Ormas {
    Ormas {
        id,
        name: name.to_string(),
        address: address.to_string(),
        status: OrmasStatus::Active,
        lat: None,
        lng: None,
        attachments: Attachments::default(),
        created_at: None,
    }
}

/// In-memory record store with switchable failures
#[cfg(test)]
#[derive(Default)]
pub struct MemoryRecordStore {
    pub records: Mutex<Vec<Ormas>>,
    pub upserts: Mutex<Vec<OrmasRow>>,
    pub uploads: Mutex<Vec<(AttachmentSlot, String)>>,
    pub documents: Mutex<HashMap<i64, DocumentRow>>,
    pub fail_upload: Mutex<Option<AttachmentSlot>>,
    pub fail_upsert: Mutex<Option<String>>,
    pub fail_document_status: Mutex<Option<u16>>,
}

#[cfg(test)]
impl MemoryRecordStore {
    pub fn with_records(records: Vec<Ormas>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn ids(&self) -> Vec<i64> {
        self.records.lock().unwrap().iter().map(|r| r.id).collect()
    }

    pub fn upserts(&self) -> Vec<OrmasRow> {
        self.upserts.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self) -> Result<Vec<Ormas>, StoreError> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn upsert(&self, payload: &OrmasRow) -> Result<Ormas, StoreError> {
        if let Some(message) = self.fail_upsert.lock().unwrap().clone() {
            return Err(StoreError::Upstream {
                status: 400,
                message,
            });
        }
        self.upserts.lock().unwrap().push(payload.clone());

        let mut records = self.records.lock().unwrap();
        let id = payload
            .id
            .unwrap_or_else(|| records.iter().map(|r| r.id).max().unwrap_or(0) + 1);
        let mut record = records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .unwrap_or_else(|| sample_ormas(id, "", ""));

        record.name = payload.nama.clone();
        record.address = payload.alamat.clone();
        record.status = payload.status;
        record.lat = payload.lat;
        record.lng = payload.lng;
        let mut columns = payload.clone();
        for slot in AttachmentSlot::ALL {
            let sent = columns.attachment(slot);
            let current = record.attachments.get_mut(slot);
            current.filename = sent.filename.or(current.filename.take());
            current.mime = sent.mime.or(current.mime.take());
            current.path = sent.path.or(current.path.take());
        }

        records.retain(|r| r.id != id);
        records.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }

    async fn upload_attachment(
        &self,
        slot: AttachmentSlot,
        file: &AttachmentFile,
        folder_key: &str,
    ) -> Result<StoredAttachment, StoreError> {
        // Yield so concurrent uploads interleave
        tokio::task::yield_now().await;
        if *self.fail_upload.lock().unwrap() == Some(slot) {
            return Err(StoreError::Upstream {
                status: 413,
                message: "The object exceeded the maximum allowed size".to_string(),
            });
        }
        let path = attachment_object_key(slot, folder_key, 0, &file.filename);
        self.uploads.lock().unwrap().push((slot, path.clone()));
        Ok(StoredAttachment { path })
    }

    async fn fetch_document(&self, id: i64) -> Result<Option<DocumentRow>, StoreError> {
        if let Some(status) = *self.fail_document_status.lock().unwrap() {
            return Err(StoreError::from_status_and_body(status, ""));
        }
        Ok(self.documents.lock().unwrap().get(&id).cloned())
    }

    fn public_url(&self, path: &str) -> Option<String> {
        SupabaseStorageClient::new(&test_supabase_config("https://example.supabase.co"))
            .public_url(path)
    }
}
