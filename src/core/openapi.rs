use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::kota::{dtos as kota_dtos, handlers as kota_handlers};
use crate::features::perdin::{
    dtos as perdin_dtos, handlers as perdin_handlers, models as perdin_models,
    services::AllowanceBreakdown,
};
use crate::features::users::{dtos as users_dtos, Role};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::login,
        auth::handlers::get_me,
        // Kota
        kota_handlers::list_kota,
        kota_handlers::get_kota,
        kota_handlers::create_kota,
        kota_handlers::update_kota,
        kota_handlers::delete_kota,
        // Perdin
        perdin_handlers::calculate_perdin,
        perdin_handlers::create_perdin,
        perdin_handlers::list_my_perdin,
        perdin_handlers::get_perdin,
        perdin_handlers::list_perdin_for_review,
        perdin_handlers::decide_perdin,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            Role,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            users_dtos::UserResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<users_dtos::UserResponseDto>,
            // Kota
            kota_dtos::UpsertKotaDto,
            kota_dtos::KotaResponseDto,
            ApiResponse<kota_dtos::KotaResponseDto>,
            ApiResponse<Vec<kota_dtos::KotaResponseDto>>,
            // Perdin
            perdin_models::PerdinStatus,
            perdin_models::Currency,
            perdin_models::Tier,
            perdin_dtos::CalculatePerdinDto,
            perdin_dtos::CreatePerdinDto,
            perdin_dtos::ApprovalAction,
            perdin_dtos::ApprovalDto,
            perdin_dtos::PerdinResponseDto,
            AllowanceBreakdown,
            ApiResponse<AllowanceBreakdown>,
            ApiResponse<perdin_dtos::PerdinResponseDto>,
            ApiResponse<Vec<perdin_dtos::PerdinResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Login and current user"),
        (name = "kota", description = "City master data"),
        (name = "perdin", description = "Business travel requests, allowance and approval"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Perdin API",
        version = "0.1.0",
        description = "API documentation for the perdin backend",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
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
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/auth/me",
            "/api/kota",
            "/api/kota/{id}",
            "/api/perdin",
            "/api/perdin/calculate",
            "/api/perdin/sdm",
            "/api/perdin/{id}",
            "/api/perdin/{id}/approve",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Perdin Staging".to_string(),
            version: "9.9.9".to_string(),
            description: "staging".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Perdin Staging");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
