use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::ormas::services::RecordStore;
use crate::features::surat::dtos::{DocumentDownloadDto, ViewerState};
use crate::features::surat::services::{DocumentViewer, ViewerError};
use crate::modules::pdf::DocumentRenderer;

pub struct SuratService {
    store: Arc<dyn RecordStore>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl SuratService {
    pub fn new(store: Arc<dyn RecordStore>, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { store, renderer }
    }

    fn viewer(&self) -> DocumentViewer {
        DocumentViewer::new(Arc::clone(&self.store), Arc::clone(&self.renderer))
    }

    /// Terminal viewer state for the letter of organization `id`
    pub async fn view(&self, id: i64) -> ViewerState {
        let mut viewer = self.viewer();
        viewer.open(id).await.clone()
    }

    /// Raw letter as a data URI; works for letters that fail to render
    pub async fn download(&self, id: i64) -> Result<DocumentDownloadDto> {
        let mut viewer = self.viewer();
        let document = viewer.fetch(id).await.map_err(|err| match err {
            ViewerError::Unavailable => AppError::NotFound(err.to_string()),
            other => AppError::ExternalServiceError(other.to_string()),
        })?;
        Ok(document.download())
    }
}
