use std::sync::Arc;

use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::directory::services::MarkerSynchronizer;
use crate::features::ormas::services::OrmasService;
use crate::modules::map_engine::{MapScene, SceneEngine, Viewport};

/// Builds the public directory map for a query and an optional selection
pub struct DirectoryService {
    ormas: Arc<OrmasService>,
    viewport: Viewport,
}

impl DirectoryService {
    pub fn new(ormas: Arc<OrmasService>, viewport: Viewport) -> Self {
        Self { ormas, viewport }
    }

    pub async fn scene(&self, query: Option<&str>, selected: Option<i64>) -> Result<MapScene> {
        let records = self.ormas.records(query).await?;
        let store = self.ormas.store();

        let mut sync = MarkerSynchronizer::new(SceneEngine::new(self.viewport));
        sync.mount();
        sync.update_records(&records, &|path: &str| store.public_url(path))
            .map_err(|e| AppError::Internal(e.to_string()))?;
        sync.select(selected);
        // Flights settle immediately on the headless engine
        sync.on_move_end();

        let scene = sync
            .scene()
            .ok_or_else(|| AppError::Internal("Map was not mounted".to_string()))?;
        sync.unmount();

        debug!(
            "Directory scene: {} markers, selected {:?}",
            scene.markers.len(),
            selected
        );
        Ok(scene)
    }
}
