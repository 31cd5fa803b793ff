//! Supabase integration
//!
//! Thin REST clients for the two Supabase services the registry relies on:
//! PostgREST for records and Storage for attachment files.

mod error;
mod rest_client;
mod storage_client;

pub use error::StoreError;
pub use rest_client::SupabaseRestClient;
pub use storage_client::SupabaseStorageClient;
