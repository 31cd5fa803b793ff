use std::sync::Arc;

use tracing::debug;

use crate::core::error::Result;
use crate::features::ormas::dtos::OrmasDto;
use crate::features::ormas::models::Ormas;
use crate::features::ormas::services::{filter_records, RecordStore};

/// Read side shared by the guest directory and the admin list
pub struct OrmasService {
    store: Arc<dyn RecordStore>,
}

impl OrmasService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }

    /// Full collection, filtered client-side by `query`
    pub async fn records(&self, query: Option<&str>) -> Result<Vec<Ormas>> {
        let records = self.store.list().await?;
        let total = records.len();
        let filtered = filter_records(records, query);
        debug!("Filter {:?} kept {}/{} records", query, filtered.len(), total);
        Ok(filtered)
    }

    pub async fn list(&self, query: Option<&str>) -> Result<Vec<OrmasDto>> {
        let records = self.records(query).await?;
        Ok(records
            .iter()
            .map(|r| OrmasDto::from_record(r, |path| self.store.public_url(path)))
            .collect())
    }
}
