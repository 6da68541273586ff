use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{authorize, Operation};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::equipment::dtos::{EquipmentRequestDto, EquipmentResponseDto};
use crate::features::equipment::services::EquipmentService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

#[utoipa::path(
    get,
    path = "/api/equipment",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Equipment page", body = ApiResponse<Vec<EquipmentResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "equipment",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_equipment(
    user: AuthenticatedUser,
    State(service): State<Arc<EquipmentService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<EquipmentResponseDto>>>> {
    authorize(&user, Operation::ReadEquipment)?;

    let (equipment, total) = service.list(query.offset(), query.limit()).await?;
    Ok(Json(ApiResponse::success(
        Some(equipment),
        None,
        Some(Meta { total }),
    )))
}

/// Get equipment by id or chassis number
#[utoipa::path(
    get,
    path = "/api/equipment/{id}",
    params(
        ("id" = String, Path, description = "Equipment ID or chassis number")
    ),
    responses(
        (status = 200, description = "Equipment found", body = ApiResponse<EquipmentResponseDto>),
        (status = 400, description = "Equipment not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "equipment",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_equipment(
    user: AuthenticatedUser,
    State(service): State<Arc<EquipmentService>>,
    Path(reference): Path<String>,
) -> Result<Json<ApiResponse<EquipmentResponseDto>>> {
    authorize(&user, Operation::ReadEquipment)?;

    let equipment = service.get(&reference).await?;
    Ok(Json(ApiResponse::success(Some(equipment), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/equipment",
    request_body = EquipmentRequestDto,
    responses(
        (status = 201, description = "Equipment created", body = ApiResponse<EquipmentResponseDto>),
        (status = 400, description = "Validation error or duplicate chassis number"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "equipment",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_equipment(
    user: AuthenticatedUser,
    State(service): State<Arc<EquipmentService>>,
    AppJson(dto): AppJson<EquipmentRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<EquipmentResponseDto>>)> {
    authorize(&user, Operation::WriteEquipment)?;
    dto.validate()?;

    let equipment = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(equipment),
            Some("Equipment created successfully".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/equipment/{id}",
    params(
        ("id" = Uuid, Path, description = "Equipment ID")
    ),
    request_body = EquipmentRequestDto,
    responses(
        (status = 200, description = "Equipment updated", body = ApiResponse<EquipmentResponseDto>),
        (status = 400, description = "Validation error or equipment not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "equipment",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_equipment(
    user: AuthenticatedUser,
    State(service): State<Arc<EquipmentService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<EquipmentRequestDto>,
) -> Result<Json<ApiResponse<EquipmentResponseDto>>> {
    authorize(&user, Operation::WriteEquipment)?;
    dto.validate()?;

    let equipment = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(equipment),
        Some("Equipment updated successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/equipment/{id}",
    params(
        ("id" = Uuid, Path, description = "Equipment ID")
    ),
    responses(
        (status = 200, description = "Equipment deleted"),
        (status = 400, description = "Equipment not found or still inspected"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "equipment",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_equipment(
    user: AuthenticatedUser,
    State(service): State<Arc<EquipmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    authorize(&user, Operation::WriteEquipment)?;

    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Equipment deleted successfully".to_string()),
        None,
    )))
}
