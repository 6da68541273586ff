//! Role-based access gate.
//!
//! `authorize` is a pure predicate over the caller's role and the requested
//! operation. Handlers call it before touching any service; the
//! `RequirePlatformAdmin` extractor wraps it for admin-only routes.
//!
//! - PLATADMIN: everything, including inspection deletion and user management
//! - ADMIN: everything except the above
//! - OFFICER / INSPECTOR: read all resources, submit and update inspections

use crate::core::error::AppError;
use crate::features::auth::model::{AuthenticatedUser, Role};
use axum::{extract::FromRequestParts, http::request::Parts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadInspections,
    CreateInspection,
    UpdateInspection,
    DeleteInspection,
    ReadEquipment,
    WriteEquipment,
    ReadOperators,
    WriteOperators,
    ReadCategories,
    WriteCategories,
    ManageUsers,
}

impl Operation {
    fn allowed_roles(self) -> &'static [Role] {
        const ALL: &[Role] = &[Role::PlatAdmin, Role::Admin, Role::Officer, Role::Inspector];
        const ADMINS: &[Role] = &[Role::PlatAdmin, Role::Admin];
        const PLATFORM: &[Role] = &[Role::PlatAdmin];

        match self {
            Operation::ReadInspections
            | Operation::CreateInspection
            | Operation::UpdateInspection
            | Operation::ReadEquipment
            | Operation::ReadOperators
            | Operation::ReadCategories => ALL,
            Operation::WriteEquipment | Operation::WriteOperators | Operation::WriteCategories => {
                ADMINS
            }
            Operation::DeleteInspection | Operation::ManageUsers => PLATFORM,
        }
    }
}

/// Reject with `Unauthorized` when the caller's role may not perform `operation`.
pub fn authorize(user: &AuthenticatedUser, operation: Operation) -> Result<(), AppError> {
    if operation.allowed_roles().contains(&user.role) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %user.id,
            role = %user.role,
            ?operation,
            "Access denied"
        );
        Err(AppError::Unauthorized(format!(
            "Role {} is not allowed to perform this action",
            user.role
        )))
    }
}

/// Guard for admin-only endpoints (PLATADMIN).
///
/// # Example
/// ```ignore
/// pub async fn handler(RequirePlatformAdmin(user): RequirePlatformAdmin) { ... }
/// ```
pub struct RequirePlatformAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequirePlatformAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        authorize(user, Operation::ManageUsers)?;

        Ok(RequirePlatformAdmin(user.clone()))
    }
}
