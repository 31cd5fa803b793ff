mod ormas_filter;
mod ormas_service;
mod record_store;

pub use ormas_filter::filter_records;
pub use ormas_service::OrmasService;
pub use record_store::{attachment_object_key, RecordStore, StoredAttachment, SupabaseRecordStore};
