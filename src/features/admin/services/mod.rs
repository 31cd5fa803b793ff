mod admin_gate;
mod admin_service;
mod form_controller;
mod location_picker;

pub use admin_gate::{AdminGate, AdminSession};
pub use admin_service::AdminService;
pub use form_controller::{delete_record, AdminForm, DraftField, OrmasDraft};
pub use location_picker::LocationPicker;
