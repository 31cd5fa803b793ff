//! Map rendering collaborator
//!
//! [`MapEngine`] is the seam between the map-owning components (directory
//! synchronizer, location picker) and whatever draws the map. The service uses
//! [`SceneEngine`], a headless engine that keeps the view in Web-Mercator
//! coordinates and exports a serializable [`MapScene`].

mod scene_engine;
mod viewport;

pub use scene_engine::{MapScene, SceneEngine};
pub use viewport::Viewport;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
pub struct LayerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
pub struct MarkerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
pub struct PopupId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TileLayerSpec {
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerShape {
    /// Default pin icon
    Pin,
    Circle {
        radius: f64,
        weight: f64,
        color: String,
        fill_opacity: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub shape: MarkerShape,
    /// Caller-side identity of the marker (e.g. the record id)
    pub key: Option<String>,
    pub popup_html: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PopupOptions {
    pub auto_pan: bool,
    pub max_width: u32,
    pub close_button: bool,
}

/// Operations a map-rendering engine must provide.
///
/// Every operation on an engine without a live map is a no-op.
pub trait MapEngine: Send {
    fn create_map(&mut self, center: LatLng, zoom: f64);
    fn remove_map(&mut self);
    fn has_map(&self) -> bool;

    fn add_tile_layer(&mut self, layer: TileLayerSpec);
    fn create_layer_group(&mut self) -> Option<LayerId>;
    fn clear_layer_group(&mut self, group: LayerId);

    fn add_marker(&mut self, group: Option<LayerId>, marker: MarkerSpec) -> Option<MarkerId>;
    fn move_marker(&mut self, marker: MarkerId, to: LatLng);
    fn bring_to_front(&mut self, marker: MarkerId);

    fn create_popup(&mut self, options: PopupOptions) -> Option<PopupId>;
    fn open_popup(&mut self, popup: PopupId, at: LatLng, html: &str);

    fn zoom(&self) -> Option<f64>;
    fn center(&self) -> Option<LatLng>;
    /// Whether the current view bounds contain `point`
    fn view_contains(&self, point: LatLng) -> bool;

    fn set_view(&mut self, center: LatLng, zoom: f64);
    fn fit_bounds(&mut self, points: &[LatLng], padding: (f64, f64));
    /// Start an animated pan/zoom. Completion is reported by the host as a
    /// move-end event to whoever owns the engine.
    fn fly_to(&mut self, target: LatLng, zoom: f64, duration_secs: f64);
}
