mod document_viewer;
mod surat_service;

pub use document_viewer::{DocumentViewer, ViewerError};
pub use surat_service::SuratService;
