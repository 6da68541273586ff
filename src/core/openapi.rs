use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dto as auth_dto, handler as auth_handler, model as auth_model};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::equipment::{dtos as equipment_dtos, handlers as equipment_handlers};
use crate::features::inspections::{
    dtos as inspections_dtos, handlers as inspections_handlers, models as inspections_models,
};
use crate::features::operators::{dtos as operators_dtos, handlers as operators_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, FieldError, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handler::get_me,
        // Inspections
        inspections_handlers::inspection_handler::list_inspections,
        inspections_handlers::inspection_handler::get_equipment_inspections,
        inspections_handlers::inspection_handler::create_inspection,
        inspections_handlers::inspection_handler::update_inspection,
        inspections_handlers::inspection_handler::delete_inspection,
        // Equipment
        equipment_handlers::equipment_handler::list_equipment,
        equipment_handlers::equipment_handler::get_equipment,
        equipment_handlers::equipment_handler::create_equipment,
        equipment_handlers::equipment_handler::update_equipment,
        equipment_handlers::equipment_handler::delete_equipment,
        // Operators
        operators_handlers::operator_handler::list_operators,
        operators_handlers::operator_handler::get_operator,
        operators_handlers::operator_handler::create_operator,
        operators_handlers::operator_handler::update_operator,
        operators_handlers::operator_handler::delete_operator,
        // Categories
        categories_handlers::category_handler::list_categories,
        categories_handlers::category_handler::get_category,
        categories_handlers::category_handler::create_category,
        categories_handlers::category_handler::update_category,
        categories_handlers::category_handler::delete_category,
        // Admin
        users_handlers::user_handler::list_users,
        users_handlers::user_handler::update_user_status,
    ),
    components(
        schemas(
            Meta,
            FieldError,
            // Auth
            auth_model::Role,
            auth_model::UserStatus,
            auth_dto::MeResponseDto,
            ApiResponse<auth_dto::MeResponseDto>,
            // Inspections
            inspections_models::ItemCondition,
            inspections_models::Category,
            inspections_dtos::ImageFieldDto,
            inspections_dtos::LineItemResponseDto,
            inspections_dtos::InspectionResponseDto,
            inspections_dtos::LineItemRequestDto,
            inspections_dtos::CreateInspectionRequestDto,
            inspections_dtos::CreatedInspectionDto,
            inspections_dtos::UpdateInspectionDto,
            ApiResponse<Vec<inspections_dtos::InspectionResponseDto>>,
            ApiResponse<inspections_dtos::InspectionResponseDto>,
            ApiResponse<inspections_dtos::CreatedInspectionDto>,
            // Equipment
            equipment_dtos::EquipmentRequestDto,
            equipment_dtos::EquipmentResponseDto,
            ApiResponse<Vec<equipment_dtos::EquipmentResponseDto>>,
            ApiResponse<equipment_dtos::EquipmentResponseDto>,
            // Operators
            operators_dtos::OperatorRequestDto,
            operators_dtos::OperatorResponseDto,
            ApiResponse<Vec<operators_dtos::OperatorResponseDto>>,
            ApiResponse<operators_dtos::OperatorResponseDto>,
            // Categories
            categories_dtos::CategoryRequestDto,
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Admin
            users_dtos::UserResponseDto,
            users_dtos::UpdateUserStatusDto,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<users_dtos::UserResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Caller identity"),
        (name = "inspections", description = "Equipment inspections and their attachments"),
        (name = "equipment", description = "Equipment assets"),
        (name = "operators", description = "Equipment custodians"),
        (name = "categories", description = "Equipment categories"),
        (name = "admin", description = "User management (platform admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "FleetCheck API",
        version = "0.1.0",
        description = "API documentation for FleetCheck",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
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
    fn test_document_lists_inspection_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/inspection"));
        assert!(doc.paths.paths.contains_key("/api/inspection/{id}"));
        assert!(doc.paths.paths.contains_key("/api/admin/users/{id}/status"));
    }
}
