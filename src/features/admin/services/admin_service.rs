use std::sync::Arc;

use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{
    DeleteResponseDto, DraftDto, LocationPickerRequestDto, LocationPickerResponseDto,
    SubmitResponseDto,
};
use crate::features::admin::services::{delete_record, AdminForm, AdminGate, DraftField};
use crate::features::ormas::dtos::OrmasDto;
use crate::features::ormas::models::Ormas;
use crate::features::ormas::services::OrmasService;
use crate::modules::map_engine::{SceneEngine, Viewport};

pub struct AdminService {
    gate: Arc<AdminGate>,
    ormas: Arc<OrmasService>,
    viewport: Viewport,
}

impl AdminService {
    pub fn new(gate: Arc<AdminGate>, ormas: Arc<OrmasService>, viewport: Viewport) -> Self {
        Self {
            gate,
            ormas,
            viewport,
        }
    }

    pub fn gate(&self) -> Arc<AdminGate> {
        self.gate.clone()
    }

    fn to_dtos(&self, records: &[Ormas]) -> Vec<OrmasDto> {
        let store = self.ormas.store();
        records
            .iter()
            .map(|r| OrmasDto::from_record(r, |path| store.public_url(path)))
            .collect()
    }

    pub async fn list(&self, query: Option<&str>) -> Result<Vec<OrmasDto>> {
        self.ormas.list(query).await
    }

    pub async fn submit(&self, mut form: AdminForm) -> Result<(SubmitResponseDto, &'static str)> {
        let store = self.ormas.store();
        let outcome = form.submit(store.as_ref()).await?;

        let record = OrmasDto::from_record(&outcome.saved, |path| store.public_url(path));
        let items = self.to_dtos(&outcome.records);
        Ok((SubmitResponseDto { record, items }, outcome.message))
    }

    pub async fn draft(&self, id: i64) -> Result<DraftDto> {
        let record = self
            .ormas
            .records(None)
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("ORMAS {} not found", id)))?;

        let mut form = AdminForm::new();
        form.load_for_edit(&record);
        Ok(DraftDto::from(&form.draft))
    }

    pub async fn delete(&self, id: i64) -> Result<DeleteResponseDto> {
        let records = delete_record(self.ormas.store().as_ref(), id).await?;
        info!("Admin deleted ORMAS {}", id);
        Ok(DeleteResponseDto {
            deleted_id: id,
            items: self.to_dtos(&records),
        })
    }

    /// Replay picks on a fresh picker and merge the confirmed point into a
    /// draft seeded with `initial`
    pub fn pick_location(
        &self,
        request: LocationPickerRequestDto,
    ) -> Result<LocationPickerResponseDto> {
        let mut form = AdminForm::new();
        if let Some(initial) = request.initial {
            form.set_field(DraftField::Lat(Some(initial.lat)));
            form.set_field(DraftField::Lng(Some(initial.lng)));
        }

        let mut observed = None;
        let confirmed = form.pick_on_map(SceneEngine::new(self.viewport), |picker| {
            for point in &request.picks {
                picker.pick(*point);
            }
            observed = Some(LocationPickerResponseDto {
                candidate: picker.candidate(),
                readout: picker.readout(),
                maps_url: picker.maps_url(),
                scene: picker.scene(),
                confirmed: None,
            });
            request.confirm
        });

        let mut response = observed
            .ok_or_else(|| AppError::Internal("Location picker did not open".to_string()))?;
        response.confirmed = confirmed;
        Ok(response)
    }
}
