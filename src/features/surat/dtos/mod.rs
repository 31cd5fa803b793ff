mod surat_dto;

pub use surat_dto::{DocumentDownloadDto, ViewerState};
