//! Supabase Storage client
//!
//! Uploads attachments by object key (overwriting on conflict) and builds
//! public retrieval URLs for stored paths.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::core::config::SupabaseConfig;
use crate::modules::supabase::StoreError;
use crate::shared::constants::ATTACHMENT_CACHE_CONTROL;

/// Storage upload response; `Key` is prefixed with the bucket name
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: Option<String>,
}

pub struct SupabaseStorageClient {
    http_client: Client,
    storage_url: String,
    anon_key: String,
    bucket: String,
}

impl SupabaseStorageClient {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            http_client: Client::new(),
            storage_url: config.storage_url(),
            anon_key: config.anon_key.clone(),
            bucket: config.bucket.clone(),
        }
    }

    /// Upload a file, replacing any object already stored under `key`
    ///
    /// # Arguments
    /// * `key` - The object key (path) in the bucket
    /// * `data` - The file content as bytes
    /// * `content_type` - The MIME type of the file
    ///
    /// # Returns
    /// The stored path of the object, relative to the bucket
    pub async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let url = format!("{}/object/{}/{}", self.storage_url, self.bucket, key);
        let size = data.len();

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("x-upsert", "true")
            .header("content-type", content_type)
            .header("cache-control", ATTACHMENT_CACHE_CONTROL)
            .body(data)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to upload '{}' to storage: {}", key, e);
                StoreError::from(e)
            })?;

        if !response.status().is_success() {
            let err = StoreError::from_response(response).await;
            error!("Storage rejected upload of '{}': {}", key, err);
            return Err(err);
        }

        // An unparseable body still means the object was stored under `key`
        let stored = response
            .json::<UploadResponse>()
            .await
            .ok()
            .and_then(|r| r.key)
            .map(|k| self.strip_bucket_prefix(&k).to_string())
            .unwrap_or_else(|| key.to_string());

        info!(
            "Uploaded '{}' ({} bytes, {}) to bucket '{}'",
            stored, size, content_type, self.bucket
        );
        Ok(stored)
    }

    /// Remove one redundant leading `{bucket}/` segment and any leading slashes
    fn strip_bucket_prefix<'a>(&self, path: &'a str) -> &'a str {
        let trimmed = path.trim_start_matches('/');
        trimmed
            .strip_prefix(self.bucket.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(trimmed)
    }

    /// Public retrieval URL for a stored path:
    /// `{storage}/object/public/{bucket}/{path}`
    pub fn public_url(&self, path: &str) -> Option<String> {
        let path = self.strip_bucket_prefix(path);
        if path.is_empty() {
            return None;
        }

        let url = format!("{}/object/public/{}/{}", self.storage_url, self.bucket, path);
        debug!("Built public URL {}", url);
        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{spawn_fake_server, test_supabase_config};
    use axum::{
        body::Bytes,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    type Objects = Arc<Mutex<HashMap<String, (String, Vec<u8>)>>>;

    fn fake_storage(objects: Objects) -> Router {
        Router::new()
            .route(
                "/storage/v1/object/{bucket}/{*key}",
                post(
                    |State(objects): State<Objects>,
                     Path((bucket, key)): Path<(String, String)>,
                     headers: HeaderMap,
                     body: Bytes| async move {
                        let upsert = headers.get("x-upsert").and_then(|v| v.to_str().ok()) == Some("true");
                        let content_type = headers
                            .get("content-type")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        let mut objects = objects.lock().await;
                        if objects.contains_key(&key) && !upsert {
                            return (
                                StatusCode::CONFLICT,
                                Json(json!({"statusCode": "409", "error": "Duplicate", "message": "The resource already exists"})),
                            );
                        }
                        objects.insert(key.clone(), (content_type, body.to_vec()));
                        (StatusCode::OK, Json(json!({"Key": format!("{}/{}", bucket, key), "Id": "obj"})))
                    },
                ),
            )
            .with_state(objects)
    }

    #[tokio::test]
    async fn test_upload_returns_path_without_bucket() {
        let objects: Objects = Arc::default();
        let base = spawn_fake_server(fake_storage(objects.clone())).await;
        let client = SupabaseStorageClient::new(&test_supabase_config(&base));

        let path = client
            .upload("public/ormas_surat/surat/7/1700000000000-a.pdf", b"%PDF".to_vec(), "application/pdf")
            .await
            .unwrap();

        assert_eq!(path, "public/ormas_surat/surat/7/1700000000000-a.pdf");
        let stored = objects.lock().await;
        let (content_type, _) = stored.get(&path).unwrap();
        assert_eq!(content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_upload_same_key_twice_keeps_latest() {
        let objects: Objects = Arc::default();
        let base = spawn_fake_server(fake_storage(objects.clone())).await;
        let client = SupabaseStorageClient::new(&test_supabase_config(&base));
        let key = "public/ormas_surat/sk/12/1700000000000-sk.pdf";

        client.upload(key, b"first".to_vec(), "application/pdf").await.unwrap();
        client.upload(key, b"second".to_vec(), "application/pdf").await.unwrap();

        let stored = objects.lock().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get(key).unwrap().1, b"second".to_vec());
    }

    #[test]
    fn test_public_url_strips_redundant_bucket() {
        let client = SupabaseStorageClient::new(&test_supabase_config("https://ref.supabase.co"));
        let expected = "https://ref.supabase.co/storage/v1/object/public/ormas_surat/public/ormas_surat/surat/1/a.pdf";

        assert_eq!(
            client.public_url("public/ormas_surat/surat/1/a.pdf").as_deref(),
            Some(expected)
        );
        assert_eq!(
            client.public_url("/ormas_surat/public/ormas_surat/surat/1/a.pdf").as_deref(),
            Some(expected)
        );
        assert_eq!(client.public_url("/"), None);
    }
}
