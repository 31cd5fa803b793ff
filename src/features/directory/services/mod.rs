mod directory_service;
mod marker_synchronizer;
mod popup;

pub use directory_service::DirectoryService;
pub use marker_synchronizer::MarkerSynchronizer;
pub use popup::{build_popup_html, maps_search_url};
