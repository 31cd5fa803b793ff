use crate::features::directory::services::maps_search_url;
use crate::modules::map_engine::{
    LatLng, MapEngine, MapScene, MarkerId, MarkerShape, MarkerSpec, SceneEngine, TileLayerSpec,
};
use crate::shared::constants::{
    OSM_ATTRIBUTION, OSM_MAX_ZOOM, OSM_TILE_URL, PICKER_DEFAULT_CENTER, PICKER_ZOOM,
};

/// Single-point map selector. Opening it creates the map; `confirm` and
/// `cancel` consume it and remove the map.
pub struct LocationPicker<E: MapEngine> {
    engine: E,
    candidate: LatLng,
    marker: Option<MarkerId>,
}

impl<E: MapEngine> LocationPicker<E> {
    pub fn open(mut engine: E, initial: Option<LatLng>) -> Self {
        let candidate = initial.unwrap_or_else(|| PICKER_DEFAULT_CENTER.into());

        engine.create_map(candidate, PICKER_ZOOM);
        engine.add_tile_layer(TileLayerSpec {
            url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            max_zoom: OSM_MAX_ZOOM,
        });
        let marker = engine.add_marker(
            None,
            MarkerSpec {
                position: candidate,
                shape: MarkerShape::Pin,
                key: None,
                popup_html: None,
            },
        );

        Self {
            engine,
            candidate,
            marker,
        }
    }

    pub fn candidate(&self) -> LatLng {
        self.candidate
    }

    /// A click on the map
    pub fn pick(&mut self, point: LatLng) {
        self.candidate = point;
        let zoom = self.engine.zoom().unwrap_or(PICKER_ZOOM);
        self.engine.set_view(point, zoom);
        if let Some(marker) = self.marker {
            self.engine.move_marker(marker, point);
        }
    }

    pub fn readout(&self) -> String {
        format!(
            "Lat: {:.6} | Lng: {:.6}",
            self.candidate.lat, self.candidate.lng
        )
    }

    pub fn maps_url(&self) -> String {
        maps_search_url(self.candidate.lat, self.candidate.lng)
    }

    pub fn confirm(mut self) -> LatLng {
        self.engine.remove_map();
        self.candidate
    }

    pub fn cancel(mut self) {
        self.engine.remove_map();
    }
}

impl LocationPicker<SceneEngine> {
    pub fn scene(&self) -> Option<MapScene> {
        self.engine.scene()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::map_engine::Viewport;

    fn engine() -> SceneEngine {
        SceneEngine::new(Viewport::new(640.0, 480.0))
    }

    #[test]
    fn test_opens_on_default_location() {
        let picker = LocationPicker::open(engine(), None);

        assert_eq!(picker.readout(), "Lat: -6.200000 | Lng: 106.816000");
        let scene = picker.scene().unwrap();
        assert_eq!(scene.zoom, 13.0);
        assert_eq!(scene.markers.len(), 1);
    }

    #[test]
    fn test_each_pick_recentres_and_moves_marker() {
        let mut picker = LocationPicker::open(engine(), Some(LatLng::new(-2.5, 119.4)));

        picker.pick(LatLng::new(-2.1234567, 119.7654321));
        picker.pick(LatLng::new(-3.0, 120.0));

        assert_eq!(picker.readout(), "Lat: -3.000000 | Lng: 120.000000");
        let scene = picker.scene().unwrap();
        assert_eq!(scene.center, LatLng::new(-3.0, 120.0));
        assert_eq!(scene.markers[0].position, LatLng::new(-3.0, 120.0));
        assert!(picker.maps_url().ends_with("query=-3%2C120"));
    }

    #[test]
    fn test_readout_rounds_to_six_decimals() {
        let mut picker = LocationPicker::open(engine(), None);
        picker.pick(LatLng::new(-2.1234567, 119.7654321));
        assert_eq!(picker.readout(), "Lat: -2.123457 | Lng: 119.765432");
    }

    #[test]
    fn test_confirm_returns_last_pick() {
        let mut picker = LocationPicker::open(engine(), None);
        picker.pick(LatLng::new(1.5, 2.5));
        assert_eq!(picker.confirm(), LatLng::new(1.5, 2.5));
    }
}
