use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::directory::handlers as directory_handlers;
use crate::features::ormas::{dtos as ormas_dtos, handlers as ormas_handlers};
use crate::features::surat::{dtos as surat_dtos, handlers as surat_handlers};
use crate::modules::map_engine::{LatLng, MapScene};
use crate::modules::pdf::RenderedPage;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Guest directory
        ormas_handlers::list_ormas,
        directory_handlers::get_map_scene,
        // Surat viewer
        surat_handlers::view_surat,
        surat_handlers::download_surat,
        // Admin
        admin_handlers::login,
        admin_handlers::logout,
        admin_handlers::list_ormas,
        admin_handlers::submit_ormas,
        admin_handlers::get_draft,
        admin_handlers::delete_ormas,
        admin_handlers::pick_location,
    ),
    components(
        schemas(
            // Shared
            Meta,
            LatLng,
            // Ormas
            ormas_dtos::AttachmentDto,
            ormas_dtos::OrmasDto,
            ApiResponse<Vec<ormas_dtos::OrmasDto>>,
            // Directory map
            MapScene,
            ApiResponse<MapScene>,
            // Surat
            RenderedPage,
            surat_dtos::ViewerState,
            surat_dtos::DocumentDownloadDto,
            ApiResponse<surat_dtos::ViewerState>,
            ApiResponse<surat_dtos::DocumentDownloadDto>,
            // Admin
            admin_dtos::LoginRequestDto,
            admin_dtos::LoginResponseDto,
            admin_dtos::SubmitOrmasFormDto,
            admin_dtos::SubmitResponseDto,
            admin_dtos::DeleteResponseDto,
            admin_dtos::DraftAttachmentDto,
            admin_dtos::DraftDto,
            admin_dtos::LocationPickerRequestDto,
            admin_dtos::LocationPickerResponseDto,
            ApiResponse<admin_dtos::LoginResponseDto>,
            ApiResponse<admin_dtos::SubmitResponseDto>,
            ApiResponse<admin_dtos::DeleteResponseDto>,
            ApiResponse<admin_dtos::DraftDto>,
            ApiResponse<admin_dtos::LocationPickerResponseDto>,
        )
    ),
    tags(
        (name = "guest", description = "Public organization directory and map"),
        (name = "surat", description = "Existence letter viewer (public)"),
        (name = "admin", description = "Organization management (admin session required)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "SI ORMAS API",
        version = "0.1.0",
        description = "API documentation for SI ORMAS",
    )
)]
pub struct ApiDoc;

/// Adds the admin session bearer scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Session token from POST /api/admin/login"))
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/guest/ormas",
            "/api/guest/map",
            "/api/surat/{id}",
            "/api/surat/{id}/download",
            "/api/admin/login",
            "/api/admin/ormas",
            "/api/admin/ormas/{id}",
            "/api/admin/location-picker",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
        assert!(doc
            .components
            .unwrap()
            .security_schemes
            .contains_key("bearer_auth"));
    }

    #[test]
    fn test_swagger_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Registry".to_string(),
            version: "2.0.0".to_string(),
            description: "Docs".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Registry");
        assert_eq!(doc.info.version, "2.0.0");
    }
}
