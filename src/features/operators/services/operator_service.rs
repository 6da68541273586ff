use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{constraint_error, AppError, Result};
use crate::features::operators::dtos::{OperatorRequestDto, OperatorResponseDto};
use crate::features::operators::models::Operator;

const OPERATOR_COLUMNS: &str = "id, name, phone, license_number, created_at, updated_at";
const DUPLICATE_LICENSE: &str = "An operator with this license number already exists";

/// Service for operator CRUD
pub struct OperatorService {
    pool: PgPool,
}

impl OperatorService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<OperatorResponseDto>, i64)> {
        let sql = format!(
            "SELECT {} FROM operators ORDER BY name, id LIMIT $1 OFFSET $2",
            OPERATOR_COLUMNS
        );
        let operators = sqlx::query_as::<_, Operator>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list operators: {:?}", e);
                AppError::Database(e)
            })?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM operators")
            .fetch_one(&self.pool)
            .await?;

        Ok((operators.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get(&self, id: Uuid) -> Result<OperatorResponseDto> {
        let sql = format!("SELECT {} FROM operators WHERE id = $1", OPERATOR_COLUMNS);
        sqlx::query_as::<_, Operator>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::BadRequest("Operator not found".to_string()))
    }

    pub async fn create(&self, dto: OperatorRequestDto) -> Result<OperatorResponseDto> {
        let sql = format!(
            r#"
            INSERT INTO operators (id, name, phone, license_number)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            OPERATOR_COLUMNS
        );
        let operator = sqlx::query_as::<_, Operator>(&sql)
            .bind(Uuid::now_v7())
            .bind(&dto.name)
            .bind(&dto.phone)
            .bind(&dto.license_number)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| constraint_error(e, DUPLICATE_LICENSE, "Invalid operator reference"))?;

        tracing::info!("Operator created: id={}", operator.id);
        Ok(operator.into())
    }

    pub async fn update(&self, id: Uuid, dto: OperatorRequestDto) -> Result<OperatorResponseDto> {
        let sql = format!(
            r#"
            UPDATE operators
            SET name = $2, phone = $3, license_number = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            OPERATOR_COLUMNS
        );
        let operator = sqlx::query_as::<_, Operator>(&sql)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.phone)
            .bind(&dto.license_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| constraint_error(e, DUPLICATE_LICENSE, "Invalid operator reference"))?
            .ok_or_else(|| AppError::BadRequest("Operator not found".to_string()))?;

        tracing::info!("Operator updated: id={}", operator.id);
        Ok(operator.into())
    }

    /// Equipment in the operator's custody is left without a custodian
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM operators WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::BadRequest("Operator not found".to_string()));
        }

        tracing::info!("Operator deleted: id={}", id);
        Ok(())
    }
}
