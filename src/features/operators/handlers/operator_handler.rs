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
use crate::features::operators::dtos::{OperatorRequestDto, OperatorResponseDto};
use crate::features::operators::services::OperatorService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List operators
#[utoipa::path(
    get,
    path = "/api/operator",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of operators", body = ApiResponse<Vec<OperatorResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "operators",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_operators(
    user: AuthenticatedUser,
    State(service): State<Arc<OperatorService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<OperatorResponseDto>>>> {
    authorize(&user, Operation::ReadOperators)?;

    let (operators, total) = service.list(query.offset(), query.limit()).await?;
    Ok(Json(ApiResponse::success(
        Some(operators),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/operator/{id}",
    params(
        ("id" = Uuid, Path, description = "Operator ID")
    ),
    responses(
        (status = 200, description = "Operator found", body = ApiResponse<OperatorResponseDto>),
        (status = 400, description = "Operator not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "operators",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_operator(
    user: AuthenticatedUser,
    State(service): State<Arc<OperatorService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OperatorResponseDto>>> {
    authorize(&user, Operation::ReadOperators)?;

    let operator = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(operator), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/operator",
    request_body = OperatorRequestDto,
    responses(
        (status = 201, description = "Operator created", body = ApiResponse<OperatorResponseDto>),
        (status = 400, description = "Validation error or duplicate license number"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "operators",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_operator(
    user: AuthenticatedUser,
    State(service): State<Arc<OperatorService>>,
    AppJson(dto): AppJson<OperatorRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<OperatorResponseDto>>)> {
    authorize(&user, Operation::WriteOperators)?;
    dto.validate()?;

    let operator = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(operator),
            Some("Operator created successfully".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/operator/{id}",
    params(
        ("id" = Uuid, Path, description = "Operator ID")
    ),
    request_body = OperatorRequestDto,
    responses(
        (status = 200, description = "Operator updated", body = ApiResponse<OperatorResponseDto>),
        (status = 400, description = "Validation error or operator not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "operators",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_operator(
    user: AuthenticatedUser,
    State(service): State<Arc<OperatorService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<OperatorRequestDto>,
) -> Result<Json<ApiResponse<OperatorResponseDto>>> {
    authorize(&user, Operation::WriteOperators)?;
    dto.validate()?;

    let operator = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(operator),
        Some("Operator updated successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/operator/{id}",
    params(
        ("id" = Uuid, Path, description = "Operator ID")
    ),
    responses(
        (status = 200, description = "Operator deleted"),
        (status = 400, description = "Operator not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "operators",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_operator(
    user: AuthenticatedUser,
    State(service): State<Arc<OperatorService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    authorize(&user, Operation::WriteOperators)?;

    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Operator deleted successfully".to_string()),
        None,
    )))
}
