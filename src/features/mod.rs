pub mod admin;
pub mod directory;
pub mod ormas;
pub mod surat;
