//! Keeps a map's markers in step with the record list and the selection.
//!
//! The synchronizer exclusively owns its [`MapEngine`]; callers drive it
//! through `mount`, `update_records`, `select`, `on_move_end` and `unmount`.

use std::collections::BTreeMap;

use tracing::debug;

use crate::features::directory::services::popup::build_popup_html;
use crate::features::ormas::models::Ormas;
use crate::modules::map_engine::{
    LatLng, LayerId, MapEngine, MapScene, MarkerId, MarkerShape, MarkerSpec, PopupId,
    PopupOptions, SceneEngine, TileLayerSpec,
};
use crate::shared::constants::{
    DIRECTORY_MAP_CENTER, DIRECTORY_MAP_ZOOM, FIT_BOUNDS_PADDING, FLY_TO_DURATION_SECS,
    OSM_ATTRIBUTION, OSM_MAX_ZOOM, OSM_TILE_URL, SELECTION_MIN_ZOOM,
};
use crate::shared::templates::TemplateError;

const ACTIVE_COLOR: &str = "#10b981";
const INACTIVE_COLOR: &str = "#9ca3af";
const ZOOM_TOLERANCE: f64 = 0.01;

/// Engine handles created on mount
#[derive(Debug, Clone, Copy)]
struct Mounted {
    layer: LayerId,
    popup: PopupId,
}

#[derive(Debug, Clone)]
struct MarkerEntry {
    marker: MarkerId,
    position: LatLng,
    popup_html: String,
}

pub struct MarkerSynchronizer<E: MapEngine> {
    engine: E,
    mounted: Option<Mounted>,
    markers: BTreeMap<i64, MarkerEntry>,
    /// Record whose popup opens on the next move-end
    pending_popup: Option<i64>,
}

impl<E: MapEngine> MarkerSynchronizer<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            mounted: None,
            markers: BTreeMap::new(),
            pending_popup: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Ids of the records that currently have a marker, ascending
    pub fn marker_ids(&self) -> Vec<i64> {
        self.markers.keys().copied().collect()
    }

    pub fn mount(&mut self) {
        if self.mounted.is_some() {
            return;
        }

        let (lat, lng) = DIRECTORY_MAP_CENTER;
        self.engine.create_map(LatLng::new(lat, lng), DIRECTORY_MAP_ZOOM);
        self.engine.add_tile_layer(TileLayerSpec {
            url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            max_zoom: OSM_MAX_ZOOM,
        });

        let layer = self.engine.create_layer_group();
        let popup = self.engine.create_popup(PopupOptions {
            auto_pan: true,
            max_width: 320,
            close_button: true,
        });

        if let (Some(layer), Some(popup)) = (layer, popup) {
            self.mounted = Some(Mounted { layer, popup });
            debug!("Directory map mounted");
        }
    }

    /// Replace every marker with one per record that has both coordinates,
    /// then fit the view around them.
    ///
    /// Popups are rendered before any marker is touched, so a template error
    /// leaves the previous markers in place.
    pub fn update_records(
        &mut self,
        records: &[Ormas],
        public_url: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(), TemplateError> {
        let Some(mounted) = self.mounted else {
            return Ok(());
        };
        self.pending_popup = None;

        let mut placed = Vec::new();
        for record in records {
            let Some((lat, lng)) = record.coordinates() else {
                continue;
            };
            placed.push((record, LatLng::new(lat, lng), build_popup_html(record, public_url)?));
        }

        self.engine.clear_layer_group(mounted.layer);
        self.markers.clear();

        for (record, position, popup_html) in placed {
            let color = if record.status.is_active() {
                ACTIVE_COLOR
            } else {
                INACTIVE_COLOR
            };
            let spec = MarkerSpec {
                position,
                shape: MarkerShape::Circle {
                    radius: 7.0,
                    weight: 2.0,
                    color: color.to_string(),
                    fill_opacity: 0.6,
                },
                key: Some(record.id.to_string()),
                popup_html: Some(popup_html.clone()),
            };

            if let Some(marker) = self.engine.add_marker(Some(mounted.layer), spec) {
                self.markers.insert(
                    record.id,
                    MarkerEntry {
                        marker,
                        position,
                        popup_html,
                    },
                );
            }
        }

        if !self.markers.is_empty() {
            let points: Vec<LatLng> = self.markers.values().map(|m| m.position).collect();
            self.engine.fit_bounds(&points, FIT_BOUNDS_PADDING);
        }
        debug!("Placed {} markers for {} records", self.markers.len(), records.len());
        Ok(())
    }

    /// Bring the selected record into view and open its popup. A newer
    /// selection cancels a popup still waiting for its flight to end.
    pub fn select(&mut self, id: Option<i64>) {
        self.pending_popup = None;

        let (Some(_), Some(id)) = (self.mounted, id) else {
            return;
        };
        let Some(entry) = self.markers.get(&id) else {
            return;
        };
        let Some(current_zoom) = self.engine.zoom() else {
            return;
        };

        let target_zoom = current_zoom.max(SELECTION_MIN_ZOOM);
        let in_view = self.engine.view_contains(entry.position)
            && (current_zoom - target_zoom).abs() < ZOOM_TOLERANCE;

        if in_view {
            self.open_popup(id);
        } else {
            self.engine
                .fly_to(entry.position, target_zoom, FLY_TO_DURATION_SECS);
            self.pending_popup = Some(id);
        }
    }

    /// Move-end from the engine: open the popup a flight was waiting for
    pub fn on_move_end(&mut self) {
        if let Some(id) = self.pending_popup.take() {
            self.open_popup(id);
        }
    }

    fn open_popup(&mut self, id: i64) {
        let (Some(mounted), Some(entry)) = (self.mounted, self.markers.get(&id)) else {
            return;
        };
        self.engine
            .open_popup(mounted.popup, entry.position, &entry.popup_html);
        self.engine.bring_to_front(entry.marker);
    }

    pub fn unmount(&mut self) {
        if self.mounted.take().is_none() {
            return;
        }
        self.engine.remove_map();
        self.markers.clear();
        self.pending_popup = None;
        debug!("Directory map unmounted");
    }
}

impl MarkerSynchronizer<SceneEngine> {
    /// Snapshot of the rendered map
    pub fn scene(&self) -> Option<MapScene> {
        self.engine.scene()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ormas::models::OrmasStatus;
    use crate::modules::map_engine::{MarkerShape, Viewport};
    use crate::shared::test_helpers::sample_ormas;

    fn located(id: i64, name: &str, lat: f64, lng: f64) -> Ormas {
        let mut record = sample_ormas(id, name, "Jl. Test");
        record.lat = Some(lat);
        record.lng = Some(lng);
        record
    }

    fn no_urls(_: &str) -> Option<String> {
        None
    }

    fn mounted() -> MarkerSynchronizer<SceneEngine> {
        let mut sync = MarkerSynchronizer::new(SceneEngine::new(Viewport::new(1024.0, 768.0)));
        sync.mount();
        sync
    }

    fn records() -> Vec<Ormas> {
        let mut inactive = located(2, "Paguyuban B", -2.9, 119.8);
        inactive.status = OrmasStatus::Inactive;
        let mut no_lng = sample_ormas(3, "Tanpa Koordinat", "Jl. Test");
        no_lng.lat = Some(-2.0);
        vec![located(1, "Komunitas A", -2.5, 119.4), inactive, no_lng]
    }

    #[test]
    fn test_mount_is_idempotent() {
        let mut sync = mounted();
        sync.mount();

        let scene = sync.scene().unwrap();
        assert_eq!(scene.tile_layers.len(), 1);
        assert_eq!(scene.tile_layers[0].max_zoom, 19);
        assert_eq!(scene.center, LatLng::new(-2.3, 119.35));
        assert_eq!(scene.zoom, 9.0);
    }

    #[test]
    fn test_one_marker_per_located_record() {
        let mut sync = mounted();
        sync.update_records(&records(), &no_urls).unwrap();

        assert_eq!(sync.marker_ids(), vec![1, 2]);
        let scene = sync.scene().unwrap();
        assert_eq!(scene.markers.len(), 2);
        let colors: Vec<String> = scene
            .markers
            .iter()
            .map(|m| match &m.shape {
                MarkerShape::Circle { color, .. } => color.clone(),
                MarkerShape::Pin => String::new(),
            })
            .collect();
        assert_eq!(colors, vec!["#10b981", "#9ca3af"]);
        // View fitted around both markers
        assert!(scene.zoom > 9.0);
    }

    #[test]
    fn test_record_change_replaces_markers() {
        let mut sync = mounted();
        sync.update_records(&records(), &no_urls).unwrap();
        sync.update_records(&[located(9, "Baru", -3.0, 120.0)], &no_urls).unwrap();

        assert_eq!(sync.marker_ids(), vec![9]);
        assert_eq!(sync.scene().unwrap().markers.len(), 1);

        sync.update_records(&[], &no_urls).unwrap();
        assert!(sync.marker_ids().is_empty());
    }

    #[test]
    fn test_select_flies_then_opens_popup_on_move_end() {
        let mut sync = mounted();
        sync.update_records(&records(), &no_urls).unwrap();
        let before = sync.scene().unwrap().zoom;

        sync.select(Some(1));
        let scene = sync.scene().unwrap();
        assert_eq!(scene.zoom, before.max(13.0));
        assert!(scene.open_popup.is_none());
        assert_eq!(scene.last_flight.unwrap().duration_secs, 0.6);

        sync.on_move_end();
        let scene = sync.scene().unwrap();
        let popup = scene.open_popup.unwrap();
        assert_eq!(popup.position, LatLng::new(-2.5, 119.4));
        assert!(popup.html.contains("Komunitas A"));
        assert!(scene.markers.iter().any(|m| m.key.as_deref() == Some("1") && m.in_front));
    }

    #[test]
    fn test_select_in_view_opens_immediately() {
        let mut sync = mounted();
        sync.update_records(&records(), &no_urls).unwrap();
        sync.select(Some(1));
        sync.on_move_end();

        // Already centred at zoom 13: no second flight needed
        sync.select(Some(1));
        assert!(sync.pending_popup.is_none());
        assert!(sync.scene().unwrap().open_popup.is_some());
    }

    #[test]
    fn test_newer_selection_cancels_pending_popup() {
        let mut sync = mounted();
        sync.update_records(&records(), &no_urls).unwrap();

        sync.select(Some(1));
        sync.select(Some(404));
        sync.on_move_end();

        assert!(sync.scene().unwrap().open_popup.is_none());
    }

    #[test]
    fn test_select_unknown_or_unmounted_is_noop() {
        let mut sync = MarkerSynchronizer::new(SceneEngine::new(Viewport::new(800.0, 600.0)));
        sync.update_records(&records(), &no_urls).unwrap();
        sync.select(Some(1));
        sync.on_move_end();
        assert!(sync.marker_ids().is_empty());
        assert!(sync.scene().is_none());

        let mut sync = mounted();
        sync.update_records(&records(), &no_urls).unwrap();
        sync.select(Some(3));
        assert!(sync.scene().unwrap().last_flight.is_none());
    }

    #[test]
    fn test_unmount_clears_everything() {
        let mut sync = mounted();
        sync.update_records(&records(), &no_urls).unwrap();
        sync.select(Some(2));

        sync.unmount();

        assert!(!sync.is_mounted());
        assert!(sync.marker_ids().is_empty());
        assert!(sync.scene().is_none());
        sync.on_move_end();
        sync.mount();
        assert!(sync.scene().unwrap().markers.is_empty());
    }
}
