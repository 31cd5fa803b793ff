pub mod surat_handler;

pub use surat_handler::{__path_download_surat, __path_view_surat, download_surat, view_surat};
