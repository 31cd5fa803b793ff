//! Existence-letter viewer
//!
//! Fetches one organization's embedded letter from the document view,
//! normalizes its base64 payload and lays it out page by page through a
//! [`DocumentRenderer`]. Every failure collapses into one display string.

use std::sync::Arc;

use base64::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::features::ormas::models::DocumentRow;
use crate::features::ormas::services::RecordStore;
use crate::features::surat::dtos::{DocumentDownloadDto, ViewerState};
use crate::modules::pdf::DocumentRenderer;
use crate::modules::supabase::StoreError;
use crate::shared::constants::{
    DEFAULT_DOCUMENT_FILENAME, DEFAULT_DOCUMENT_MIME, PDF_RENDER_SCALE,
};

pub const UNAVAILABLE_MESSAGE: &str = "Surat tidak tersedia.";
pub const LOAD_FAILED_MESSAGE: &str = "Gagal memuat surat.";
pub const RENDER_FAILED_MESSAGE: &str = "Gagal merender PDF.";
pub const NOT_PDF_NOTICE: &str = "File bukan PDF. Silakan unduh untuk melihat.";

#[derive(Debug, Error, PartialEq)]
pub enum ViewerError {
    #[error("{}", UNAVAILABLE_MESSAGE)]
    Unavailable,

    #[error("HTTP {0}")]
    Http(u16),

    #[error("{}", non_empty_or(.0, LOAD_FAILED_MESSAGE))]
    Fetch(String),

    #[error("{}", non_empty_or(.0, LOAD_FAILED_MESSAGE))]
    Decode(String),

    #[error("{}", non_empty_or(.0, RENDER_FAILED_MESSAGE))]
    Render(String),
}

fn non_empty_or<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    if message.trim().is_empty() {
        fallback
    } else {
        message
    }
}

impl From<StoreError> for ViewerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Upstream { status, .. } => ViewerError::Http(status),
            other => ViewerError::Fetch(other.to_string()),
        }
    }
}

/// Canonical base64 for a stored payload: no whitespace, standard alphabet,
/// `=`-padded to a multiple of four
pub fn normalize_base64(raw: &str) -> String {
    let mut normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }
    normalized
}

pub fn decode_base64(raw: &str) -> Result<Vec<u8>, ViewerError> {
    BASE64_STANDARD
        .decode(normalize_base64(raw))
        .map_err(|e| ViewerError::Decode(e.to_string()))
}

/// A fetched letter with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub filename: String,
    pub mime: String,
    /// Normalized base64 payload
    pub payload: String,
}

impl LoadedDocument {
    fn from_row(row: DocumentRow) -> Result<Self, ViewerError> {
        let payload = row
            .surat_b64
            .filter(|b64| !b64.trim().is_empty())
            .ok_or(ViewerError::Unavailable)?;

        let filename = row
            .surat_filename
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_FILENAME.to_string());
        let mime = row
            .surat_mime
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_MIME.to_string())
            .to_lowercase();

        Ok(Self {
            filename,
            mime,
            payload: normalize_base64(&payload),
        })
    }

    pub fn is_pdf(&self) -> bool {
        self.mime.contains("pdf")
    }

    pub fn download(&self) -> DocumentDownloadDto {
        DocumentDownloadDto {
            filename: self.filename.clone(),
            mime: self.mime.clone(),
            data_uri: format!("data:{};base64,{}", self.mime, self.payload),
        }
    }
}

/// Viewer for one letter at a time
pub struct DocumentViewer {
    store: Arc<dyn RecordStore>,
    renderer: Arc<dyn DocumentRenderer>,
    state: ViewerState,
    document: Option<LoadedDocument>,
}

impl DocumentViewer {
    pub fn new(store: Arc<dyn RecordStore>, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self {
            store,
            renderer,
            state: ViewerState::Loading,
            document: None,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Load the letter of organization `id` and settle into a terminal state
    pub async fn open(&mut self, id: i64) -> &ViewerState {
        self.state = ViewerState::Loading;

        self.state = match self.load(id).await {
            Ok(state) => state,
            Err(err) => {
                warn!("Surat {} could not be shown: {}", id, err);
                ViewerState::Error {
                    message: err.to_string(),
                }
            }
        };
        &self.state
    }

    /// Fetch the letter of organization `id` without rendering it.
    ///
    /// The fetched letter stays downloadable even if rendering fails later.
    pub async fn fetch(&mut self, id: i64) -> Result<&LoadedDocument, ViewerError> {
        self.document = None;
        let row = self
            .store
            .fetch_document(id)
            .await?
            .ok_or(ViewerError::Unavailable)?;
        Ok(self.document.insert(LoadedDocument::from_row(row)?))
    }

    async fn load(&mut self, id: i64) -> Result<ViewerState, ViewerError> {
        let document = self.fetch(id).await?;
        let filename = document.filename.clone();
        let mime = document.mime.clone();

        if !document.is_pdf() {
            return Ok(ViewerState::Notice {
                filename,
                mime,
                message: NOT_PDF_NOTICE.to_string(),
            });
        }

        let bytes = decode_base64(&document.payload)?;
        let renderer = Arc::clone(&self.renderer);
        let pages = tokio::task::spawn_blocking(move || renderer.render(&bytes, PDF_RENDER_SCALE))
            .await
            .map_err(|e| ViewerError::Render(e.to_string()))?
            .map_err(|e| ViewerError::Render(e.to_string()))?;
        debug!("Rendered {} page(s) of surat {}", pages.len(), id);

        Ok(ViewerState::Rendered {
            filename,
            mime,
            pages,
        })
    }

    /// Data URI of the loaded letter, if one was loaded
    pub fn download(&self) -> Option<DocumentDownloadDto> {
        self.document.as_ref().map(LoadedDocument::download)
    }
}
