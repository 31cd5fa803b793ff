pub mod ormas_handler;

pub use ormas_handler::{__path_list_ormas, list_ormas};
