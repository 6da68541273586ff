use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, FormPayload};
use crate::features::auth::guards::{authorize, Operation};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::inspections::dtos::{
    CreateInspectionRequestDto, CreatedInspectionDto, InspectionResponseDto, UpdateInspectionDto,
};
use crate::features::inspections::services::InspectionService;
use crate::shared::types::{ApiResponse, Meta};

/// List inspections
///
/// Administrators receive every inspection; other roles only the ones they recorded.
#[utoipa::path(
    get,
    path = "/api/inspection",
    responses(
        (status = 200, description = "Inspections, most recent first", body = ApiResponse<Vec<InspectionResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "inspections",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_inspections(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
) -> Result<Json<ApiResponse<Vec<InspectionResponseDto>>>> {
    authorize(&user, Operation::ReadInspections)?;

    let inspections = service.list(&user).await?;
    let total = inspections.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(inspections),
        None,
        Some(Meta { total }),
    )))
}

/// Inspections of one piece of equipment
///
/// The path id is an equipment id.
#[utoipa::path(
    get,
    path = "/api/inspection/{id}",
    params(
        ("id" = Uuid, Path, description = "Equipment ID")
    ),
    responses(
        (status = 200, description = "Inspections of the equipment", body = ApiResponse<Vec<InspectionResponseDto>>),
        (status = 400, description = "No inspections for this equipment"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "inspections",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_equipment_inspections(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
    Path(equipment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<InspectionResponseDto>>>> {
    authorize(&user, Operation::ReadInspections)?;

    let inspections = service.list_for_equipment(equipment_id).await?;
    Ok(Json(ApiResponse::success(Some(inspections), None, None)))
}

/// Submit an inspection
///
/// Accepts JSON or multipart. Files named `<prefix>_<itemIndex>_<suffix>` are
/// attached to the matching line-item; other files are ignored.
#[utoipa::path(
    post,
    path = "/api/inspection",
    request_body(
        content = CreateInspectionRequestDto,
        content_type = "multipart/form-data",
        description = "Inspection header, line-items per category and attachments"
    ),
    responses(
        (status = 201, description = "Inspection created", body = ApiResponse<CreatedInspectionDto>),
        (status = 400, description = "Missing equipment, unknown equipment or invalid items"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "inspections",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_inspection(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
    payload: FormPayload,
) -> Result<(StatusCode, Json<ApiResponse<CreatedInspectionDto>>)> {
    authorize(&user, Operation::CreateInspection)?;

    let id = service.create(&user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(CreatedInspectionDto { id }),
            Some("Inspection created successfully".to_string()),
            None,
        )),
    ))
}

/// Update inspection header
#[utoipa::path(
    patch,
    path = "/api/inspection/{id}",
    params(
        ("id" = Uuid, Path, description = "Inspection ID")
    ),
    request_body = UpdateInspectionDto,
    responses(
        (status = 200, description = "Inspection updated", body = ApiResponse<InspectionResponseDto>),
        (status = 400, description = "Inspection not found or invalid date"),
        (status = 401, description = "Not the recording inspector or an administrator")
    ),
    tag = "inspections",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_inspection(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateInspectionDto>,
) -> Result<Json<ApiResponse<InspectionResponseDto>>> {
    authorize(&user, Operation::UpdateInspection)?;

    let inspection = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(inspection),
        Some("Inspection updated successfully".to_string()),
        None,
    )))
}

/// Delete an inspection
///
/// Line-items are removed; attachments are kept but un-linked.
#[utoipa::path(
    delete,
    path = "/api/inspection/{id}",
    params(
        ("id" = Uuid, Path, description = "Inspection ID")
    ),
    responses(
        (status = 200, description = "Inspection deleted"),
        (status = 400, description = "Inspection not found"),
        (status = 401, description = "Not a platform administrator")
    ),
    tag = "inspections",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_inspection(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    authorize(&user, Operation::DeleteInspection)?;

    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Inspection deleted successfully".to_string()),
        None,
    )))
}
