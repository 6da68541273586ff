use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequirePlatformAdmin;
use crate::features::users::dtos::{UpdateUserStatusDto, UserResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Users retrieved", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 401, description = "Not a platform administrator")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    RequirePlatformAdmin(_admin): RequirePlatformAdmin,
    State(service): State<Arc<UserService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let (users, total) = service.list(query.offset(), query.limit()).await?;
    let users = users.into_iter().map(UserResponseDto::from).collect();
    Ok(Json(ApiResponse::success(
        Some(users),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/status",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "User not found"),
        (status = 401, description = "Not a platform administrator")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user_status(
    RequirePlatformAdmin(admin): RequirePlatformAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateUserStatusDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    tracing::info!(admin_id = %admin.id, user_id = %id, "Updating user status");
    let user = service.update_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(
        Some(user.into()),
        Some("User status updated".to_string()),
        None,
    )))
}
