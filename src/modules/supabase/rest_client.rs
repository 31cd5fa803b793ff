//! PostgREST client for the Supabase record API
//!
//! Every request carries the project's anon key twice: as the `apikey`
//! header and as a bearer token.

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::core::config::SupabaseConfig;
use crate::modules::supabase::StoreError;

pub struct SupabaseRestClient {
    http_client: Client,
    rest_url: String,
    anon_key: String,
}

impl SupabaseRestClient {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            http_client: Client::new(),
            rest_url: config.rest_url(),
            anon_key: config.anon_key.clone(),
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = self.authorized(builder).send().await.map_err(|e| {
            error!("Supabase REST request failed: {}", e);
            StoreError::from(e)
        })?;

        if !response.status().is_success() {
            let err = StoreError::from_response(response).await;
            error!("Supabase REST error: {:?}", err);
            return Err(err);
        }

        Ok(response)
    }

    /// Fetch every row of a table (`select=*`, no server-side filter)
    pub async fn select_all<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table);
        debug!("Selecting all rows from {}", table);

        let response = self
            .send(self.http_client.get(&url).query(&[("select", "*")]))
            .await?;

        response.json::<Vec<T>>().await.map_err(StoreError::from)
    }

    /// Insert or update a row with `id` as the conflict target.
    ///
    /// Columns absent from the payload are left untouched on update.
    pub async fn upsert<P, T>(&self, table: &str, payload: &P) -> Result<T, StoreError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.table_url(table);
        debug!("Upserting row into {}", table);

        let response = self
            .send(
                self.http_client
                    .post(&url)
                    .query(&[("on_conflict", "id")])
                    .header("Prefer", "resolution=merge-duplicates,return=representation")
                    .json(payload),
            )
            .await?;

        let rows = response.json::<Vec<T>>().await.map_err(StoreError::from)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("Upsert returned no rows".to_string()))
    }

    /// Delete the row with the given id
    pub async fn delete_by_id(&self, table: &str, id: i64) -> Result<(), StoreError> {
        let url = self.table_url(table);
        debug!("Deleting row {} from {}", id, table);

        self.send(
            self.http_client
                .delete(&url)
                .query(&[("id", format!("eq.{}", id))])
                .header("Prefer", "return=minimal"),
        )
        .await?;

        Ok(())
    }

    /// Fetch at most one row of `view` by id, selecting only `columns`
    pub async fn select_one_by_id<T: DeserializeOwned>(
        &self,
        view: &str,
        id: i64,
        columns: &str,
    ) -> Result<Option<T>, StoreError> {
        let url = self.table_url(view);
        debug!("Selecting row {} from {}", id, view);

        let response = self
            .send(self.http_client.get(&url).query(&[
                ("select", columns.to_string()),
                ("id", format!("eq.{}", id)),
                ("limit", "1".to_string()),
            ]))
            .await?;

        let rows = response.json::<Vec<T>>().await.map_err(StoreError::from)?;
        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{spawn_fake_server, test_supabase_config};
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    #[derive(Debug, Deserialize)]
    struct Row {
        id: i64,
        nama: String,
    }

    fn fake_postgrest() -> Router {
        Router::new()
            .route(
                "/rest/v1/ormas",
                get(|headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    if headers.get("apikey").is_none() {
                        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "No API key found in request"})));
                    }
                    assert_eq!(q.get("select").map(String::as_str), Some("*"));
                    (StatusCode::OK, Json(json!([{"id": 1, "nama": "Komunitas A"}, {"id": 2, "nama": "Komunitas B"}])))
                })
                .post(|Query(q): Query<HashMap<String, String>>, Json(body): Json<Value>| async move {
                    assert_eq!(q.get("on_conflict").map(String::as_str), Some("id"));
                    let mut row = body.clone();
                    if row.get("id").is_none() {
                        row["id"] = json!(99);
                    }
                    (StatusCode::CREATED, Json(json!([row])))
                })
                .delete(|Query(q): Query<HashMap<String, String>>| async move {
                    match q.get("id").map(String::as_str) {
                        Some("eq.42") => StatusCode::NO_CONTENT,
                        _ => StatusCode::BAD_REQUEST,
                    }
                }),
            )
            .route(
                "/rest/v1/ormas_surat_v",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    assert_eq!(q.get("limit").map(String::as_str), Some("1"));
                    match q.get("id").map(String::as_str) {
                        Some("eq.1") => Json(json!([{"id": 1, "nama": "Komunitas A"}])),
                        _ => Json(json!([])),
                    }
                }),
            )
    }

    #[tokio::test]
    async fn test_select_all_sends_api_key() {
        let base = spawn_fake_server(fake_postgrest()).await;
        let client = SupabaseRestClient::new(&test_supabase_config(&base));

        let rows: Vec<Row> = client.select_all("ormas").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].nama, "Komunitas A");
    }

    #[tokio::test]
    async fn test_upsert_returns_representation() {
        let base = spawn_fake_server(fake_postgrest()).await;
        let client = SupabaseRestClient::new(&test_supabase_config(&base));

        let row: Row = client
            .upsert("ormas", &json!({"nama": "Komunitas C"}))
            .await
            .unwrap();
        assert_eq!(row.id, 99);
        assert_eq!(row.nama, "Komunitas C");
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let base = spawn_fake_server(fake_postgrest()).await;
        let client = SupabaseRestClient::new(&test_supabase_config(&base));

        client.delete_by_id("ormas", 42).await.unwrap();
        let err = client.delete_by_id("ormas", 7).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_select_one_by_id_missing_row() {
        let base = spawn_fake_server(fake_postgrest()).await;
        let client = SupabaseRestClient::new(&test_supabase_config(&base));

        let found: Option<Row> = client
            .select_one_by_id("ormas_surat_v", 1, "id,nama")
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.id), Some(1));

        let missing: Option<Row> = client
            .select_one_by_id("ormas_surat_v", 5, "id,nama")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = SupabaseRestClient::new(&test_supabase_config("http://127.0.0.1:1"));
        let err = client.select_all::<Row>("ormas").await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
