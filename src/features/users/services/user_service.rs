use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::UserStatus;
use crate::features::users::models::User;

const USER_COLUMNS: &str =
    "id, name, email, role, status, active_session_id, created_at, updated_at";

/// Service for user account lookups and status changes
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load user {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(user)
    }

    /// Accounts ordered by name, with the total count for pagination
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64)> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY name, id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok((users, total))
    }

    /// Change account status. Leaving ACTIVE also ends the live session.
    pub async fn update_status(&self, id: Uuid, status: UserStatus) -> Result<User> {
        let sql = format!(
            r#"
            UPDATE users
            SET status = $2,
                active_session_id = CASE WHEN $2 = 'ACTIVE'::user_status THEN active_session_id ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::BadRequest("User not found".to_string()))?;

        tracing::info!(user_id = %id, status = ?status, "User status updated");
        Ok(user)
    }
}
