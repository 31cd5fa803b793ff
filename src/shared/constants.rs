// =============================================================================
// MAP
// =============================================================================

/// Initial center of the guest directory map (Central Sulawesi)
pub const DIRECTORY_MAP_CENTER: (f64, f64) = (-2.3, 119.35);

/// Initial zoom of the guest directory map
pub const DIRECTORY_MAP_ZOOM: f64 = 9.0;

/// Selecting a record never zooms out below this level
pub const SELECTION_MIN_ZOOM: f64 = 13.0;

/// Fly-to animation duration in seconds
pub const FLY_TO_DURATION_SECS: f64 = 0.6;

/// Padding in pixels applied when fitting the view to all markers
pub const FIT_BOUNDS_PADDING: (f64, f64) = (24.0, 24.0);

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const OSM_MAX_ZOOM: u8 = 19;

/// Default coordinate of the location picker (Jakarta)
pub const PICKER_DEFAULT_CENTER: (f64, f64) = (-6.2, 106.816);

pub const PICKER_ZOOM: f64 = 13.0;

pub const GOOGLE_MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

// =============================================================================
// STORAGE
// =============================================================================

/// Prefix of every attachment object key inside the bucket
pub const ATTACHMENT_KEY_PREFIX: &str = "public/ormas_surat";

pub const ATTACHMENT_CACHE_CONTROL: &str = "max-age=3600";

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Maximum size of a single staged attachment (10MB)
pub const MAX_ATTACHMENT_SIZE: usize = 10 * 1024 * 1024;

// =============================================================================
// SURAT VIEWER
// =============================================================================

pub const DEFAULT_DOCUMENT_FILENAME: &str = "document.pdf";
pub const DEFAULT_DOCUMENT_MIME: &str = "application/pdf";

/// Scale factor applied to every rendered PDF page
pub const PDF_RENDER_SCALE: f64 = 1.25;
