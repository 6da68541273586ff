use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dto::MeResponseDto;
use crate::features::auth::model::{AuthenticatedUser, Claims, Role, UserStatus};
use crate::features::auth::JwtValidator;
use crate::features::users::models::User;
use crate::features::users::UserService;

/// Turns a bearer token into the request's caller identity
pub struct AuthService {
    validator: Arc<JwtValidator>,
    user_service: Arc<UserService>,
}

impl AuthService {
    pub fn new(validator: Arc<JwtValidator>, user_service: Arc<UserService>) -> Self {
        Self {
            validator,
            user_service,
        }
    }

    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.validator.validate_token(token)?;

        let user = self
            .user_service
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        check_session(&user, &claims)?;

        Ok(AuthenticatedUser {
            id: user.id,
            name: user.name,
            role: user.role,
            status: user.status,
        })
    }

    pub async fn get_current_user(&self, user: AuthenticatedUser) -> Result<MeResponseDto> {
        Ok(user.into())
    }
}

/// Account must be active; administrators are limited to one live session.
pub fn check_session(user: &User, claims: &Claims) -> Result<()> {
    if user.status != UserStatus::Active {
        return Err(AppError::Unauthorized("Account is not active".to_string()));
    }

    if matches!(user.role, Role::PlatAdmin | Role::Admin) {
        let token_session: Option<Uuid> = claims.sid;
        if token_session.is_none() || token_session != user.active_session_id {
            return Err(AppError::Unauthorized("Session expired".to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role, status: UserStatus, session: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Rina".to_string(),
            email: "rina@example.com".to_string(),
            role,
            status,
            active_session_id: session,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn claims(sub: Uuid, sid: Option<Uuid>) -> Claims {
        Claims {
            sub,
            sid,
            iat: 0,
            exp: u64::MAX,
        }
    }

    #[test]
    fn test_inactive_user_rejected() {
        let u = user(Role::Inspector, UserStatus::Suspended, None);
        assert!(check_session(&u, &claims(u.id, None)).is_err());
    }

    #[test]
    fn test_inspector_not_bound_to_session() {
        let u = user(Role::Inspector, UserStatus::Active, Some(Uuid::new_v4()));
        assert!(check_session(&u, &claims(u.id, Some(Uuid::new_v4()))).is_ok());
        assert!(check_session(&u, &claims(u.id, None)).is_ok());
    }

    #[test]
    fn test_admin_single_session() {
        let session = Uuid::new_v4();
        let u = user(Role::Admin, UserStatus::Active, Some(session));

        assert!(check_session(&u, &claims(u.id, Some(session))).is_ok());
        assert!(check_session(&u, &claims(u.id, Some(Uuid::new_v4()))).is_err());
        assert!(check_session(&u, &claims(u.id, None)).is_err());
    }

    #[test]
    fn test_admin_without_active_session_rejected() {
        let u = user(Role::PlatAdmin, UserStatus::Active, None);
        assert!(check_session(&u, &claims(u.id, None)).is_err());
    }
}
