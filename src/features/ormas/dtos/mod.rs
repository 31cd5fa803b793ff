mod ormas_dto;

pub use ormas_dto::{AttachmentDto, ListOrmasQuery, OrmasDto};
