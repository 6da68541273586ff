use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;
use uuid::Uuid;

/// Caller role matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform administrator (operator of the whole deployment)
    #[sqlx(rename = "PLATADMIN")]
    #[serde(rename = "PLATADMIN")]
    PlatAdmin,
    Admin,
    Officer,
    Inspector,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::PlatAdmin => write!(f, "PLATADMIN"),
            Role::Admin => write!(f, "ADMIN"),
            Role::Officer => write!(f, "OFFICER"),
            Role::Inspector => write!(f, "INSPECTOR"),
        }
    }
}

/// Account status matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

/// Authenticated caller injected into request extensions by the auth middleware
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
}

impl AuthenticatedUser {
    /// Administrators see every inspection regardless of inspector
    pub fn has_admin_access(&self) -> bool {
        matches!(self.role, Role::PlatAdmin | Role::Admin)
    }
}

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    /// Session id, compared against the user's active session for admins
    #[serde(default)]
    pub sid: Option<Uuid>,
    pub iat: u64,
    pub exp: u64,
}
