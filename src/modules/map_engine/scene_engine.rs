//! Headless map engine
//!
//! Keeps the same state a browser map would (view, layers, markers, popups)
//! and exposes it as a [`MapScene`] that clients can draw verbatim. Flights
//! complete immediately; the owner still receives the move-end through its
//! own `on_move_end` hook.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use super::{
    LatLng, LayerId, MapEngine, MarkerId, MarkerShape, MarkerSpec, PopupId, PopupOptions,
    TileLayerSpec, Viewport,
};

const DEFAULT_MAX_ZOOM: u8 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SceneBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SceneMarker {
    pub id: MarkerId,
    pub key: Option<String>,
    pub position: LatLng,
    pub shape: MarkerShape,
    pub popup_html: Option<String>,
    pub in_front: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScenePopup {
    pub id: PopupId,
    pub position: LatLng,
    pub html: String,
    pub options: PopupOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SceneFlight {
    pub target: LatLng,
    pub zoom: f64,
    pub duration_secs: f64,
}

/// Serializable snapshot of a live map
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapScene {
    pub center: LatLng,
    pub zoom: f64,
    pub bounds: SceneBounds,
    pub tile_layers: Vec<TileLayerSpec>,
    pub markers: Vec<SceneMarker>,
    pub open_popup: Option<ScenePopup>,
    pub last_flight: Option<SceneFlight>,
}

#[derive(Debug)]
struct View {
    center: LatLng,
    zoom: f64,
}

#[derive(Debug)]
pub struct SceneEngine {
    viewport: Viewport,
    view: Option<View>,
    max_zoom: u8,
    tile_layers: Vec<TileLayerSpec>,
    groups: BTreeMap<LayerId, Vec<MarkerId>>,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    popups: BTreeMap<PopupId, PopupOptions>,
    open_popup: Option<ScenePopup>,
    front: Option<MarkerId>,
    last_flight: Option<SceneFlight>,
    next_id: u32,
}

impl SceneEngine {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            view: None,
            max_zoom: DEFAULT_MAX_ZOOM,
            tile_layers: Vec::new(),
            groups: BTreeMap::new(),
            markers: BTreeMap::new(),
            popups: BTreeMap::new(),
            open_popup: None,
            front: None,
            last_flight: None,
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(0.0, f64::from(self.max_zoom))
    }

    /// Snapshot of the current map, `None` when no map exists
    pub fn scene(&self) -> Option<MapScene> {
        let view = self.view.as_ref()?;
        let (south_west, north_east) = self.viewport.bounds(view.center, view.zoom);

        let markers = self
            .markers
            .iter()
            .map(|(id, marker)| SceneMarker {
                id: *id,
                key: marker.key.clone(),
                position: marker.position,
                shape: marker.shape.clone(),
                popup_html: marker.popup_html.clone(),
                in_front: self.front == Some(*id),
            })
            .collect();

        Some(MapScene {
            center: view.center,
            zoom: view.zoom,
            bounds: SceneBounds {
                south_west,
                north_east,
            },
            tile_layers: self.tile_layers.clone(),
            markers,
            open_popup: self.open_popup.clone(),
            last_flight: self.last_flight,
        })
    }
}

impl MapEngine for SceneEngine {
    fn create_map(&mut self, center: LatLng, zoom: f64) {
        debug!("Creating map at ({}, {}) zoom {}", center.lat, center.lng, zoom);
        self.remove_map();
        self.view = Some(View { center, zoom });
    }

    fn remove_map(&mut self) {
        self.view = None;
        self.max_zoom = DEFAULT_MAX_ZOOM;
        self.tile_layers.clear();
        self.groups.clear();
        self.markers.clear();
        self.popups.clear();
        self.open_popup = None;
        self.front = None;
        self.last_flight = None;
    }

    fn has_map(&self) -> bool {
        self.view.is_some()
    }

    fn add_tile_layer(&mut self, layer: TileLayerSpec) {
        if self.view.is_none() {
            return;
        }
        self.max_zoom = layer.max_zoom;
        self.tile_layers.push(layer);
    }

    fn create_layer_group(&mut self) -> Option<LayerId> {
        self.view.as_ref()?;
        let id = LayerId(self.next_id());
        self.groups.insert(id, Vec::new());
        Some(id)
    }

    fn clear_layer_group(&mut self, group: LayerId) {
        if let Some(members) = self.groups.get_mut(&group) {
            for id in members.drain(..) {
                self.markers.remove(&id);
                if self.front == Some(id) {
                    self.front = None;
                }
            }
        }
    }

    fn add_marker(&mut self, group: Option<LayerId>, marker: MarkerSpec) -> Option<MarkerId> {
        self.view.as_ref()?;
        if let Some(g) = group {
            if !self.groups.contains_key(&g) {
                return None;
            }
        }

        let id = MarkerId(self.next_id());
        if let Some(g) = group {
            self.groups.entry(g).or_default().push(id);
        }
        self.markers.insert(id, marker);
        Some(id)
    }

    fn move_marker(&mut self, marker: MarkerId, to: LatLng) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.position = to;
        }
    }

    fn bring_to_front(&mut self, marker: MarkerId) {
        if self.markers.contains_key(&marker) {
            self.front = Some(marker);
        }
    }

    fn create_popup(&mut self, options: PopupOptions) -> Option<PopupId> {
        self.view.as_ref()?;
        let id = PopupId(self.next_id());
        self.popups.insert(id, options);
        Some(id)
    }

    fn open_popup(&mut self, popup: PopupId, at: LatLng, html: &str) {
        let Some(options) = self.popups.get(&popup).copied() else {
            return;
        };
        self.open_popup = Some(ScenePopup {
            id: popup,
            position: at,
            html: html.to_string(),
            options,
        });
    }

    fn zoom(&self) -> Option<f64> {
        self.view.as_ref().map(|v| v.zoom)
    }

    fn center(&self) -> Option<LatLng> {
        self.view.as_ref().map(|v| v.center)
    }

    fn view_contains(&self, point: LatLng) -> bool {
        self.view
            .as_ref()
            .is_some_and(|v| self.viewport.contains(v.center, v.zoom, point))
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        let zoom = self.clamp_zoom(zoom);
        if let Some(view) = self.view.as_mut() {
            view.center = center;
            view.zoom = zoom;
        }
    }

    fn fit_bounds(&mut self, points: &[LatLng], padding: (f64, f64)) {
        if self.view.is_none() {
            return;
        }
        if let Some((center, zoom)) = self.viewport.fit(points, padding, self.max_zoom) {
            debug!("Fitting {} points at zoom {}", points.len(), zoom);
            self.set_view(center, zoom);
        }
    }

    fn fly_to(&mut self, target: LatLng, zoom: f64, duration_secs: f64) {
        if self.view.is_none() {
            return;
        }
        let zoom = self.clamp_zoom(zoom);
        self.last_flight = Some(SceneFlight {
            target,
            zoom,
            duration_secs,
        });
        self.set_view(target, zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SceneEngine {
        let mut engine = SceneEngine::new(Viewport::new(1024.0, 768.0));
        engine.create_map(LatLng::new(-2.3, 119.35), 9.0);
        engine
    }

    fn pin(lat: f64, lng: f64) -> MarkerSpec {
        MarkerSpec {
            position: LatLng::new(lat, lng),
            shape: MarkerShape::Pin,
            key: None,
            popup_html: None,
        }
    }

    #[test]
    fn test_operations_without_map_are_noops() {
        let mut engine = SceneEngine::new(Viewport::new(800.0, 600.0));
        assert!(engine.create_layer_group().is_none());
        assert!(engine.add_marker(None, pin(0.0, 0.0)).is_none());
        engine.fly_to(LatLng::new(1.0, 1.0), 13.0, 0.6);
        assert!(engine.scene().is_none());
        assert!(!engine.view_contains(LatLng::new(0.0, 0.0)));
    }

    #[test]
    fn test_clear_layer_group_removes_only_its_markers() {
        let mut engine = engine();
        let group = engine.create_layer_group().unwrap();
        engine.add_marker(Some(group), pin(-2.5, 119.4)).unwrap();
        let loose = engine.add_marker(None, pin(-6.2, 106.8)).unwrap();

        engine.clear_layer_group(group);

        let scene = engine.scene().unwrap();
        assert_eq!(scene.markers.len(), 1);
        assert_eq!(scene.markers[0].id, loose);
    }

    #[test]
    fn test_fly_to_records_flight_and_clamps_zoom() {
        let mut engine = engine();
        engine.add_tile_layer(TileLayerSpec {
            url: "https://tile.example/{z}/{x}/{y}.png".to_string(),
            attribution: "test".to_string(),
            max_zoom: 19,
        });

        engine.fly_to(LatLng::new(-2.5, 119.4), 25.0, 0.6);

        let scene = engine.scene().unwrap();
        assert_eq!(scene.zoom, 19.0);
        assert_eq!(scene.center, LatLng::new(-2.5, 119.4));
        assert_eq!(scene.last_flight.unwrap().duration_secs, 0.6);
    }

    #[test]
    fn test_open_popup_requires_created_popup() {
        let mut engine = engine();
        engine.open_popup(PopupId(999), LatLng::new(0.0, 0.0), "<b>x</b>");
        assert!(engine.scene().unwrap().open_popup.is_none());

        let popup = engine
            .create_popup(PopupOptions {
                auto_pan: true,
                max_width: 320,
                close_button: true,
            })
            .unwrap();
        engine.open_popup(popup, LatLng::new(-2.5, 119.4), "<b>x</b>");
        let open = engine.scene().unwrap().open_popup.unwrap();
        assert_eq!(open.html, "<b>x</b>");
        assert_eq!(open.options.max_width, 320);
    }

    #[test]
    fn test_remove_map_drops_everything() {
        let mut engine = engine();
        engine.add_marker(None, pin(1.0, 1.0));
        engine.remove_map();
        assert!(!engine.has_map());
        assert!(engine.scene().is_none());
        assert!(engine.markers.is_empty());
    }
}
