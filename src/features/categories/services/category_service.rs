use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{constraint_error, AppError, Result};
use crate::features::categories::dtos::{CategoryRequestDto, CategoryResponseDto};
use crate::features::categories::models::Category;

const CATEGORY_COLUMNS: &str = "id, name, description, created_at, updated_at";
const DUPLICATE_NAME: &str = "A category with this name already exists";

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Categories ordered by name, with the total count
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<CategoryResponseDto>, i64)> {
        let sql = format!(
            "SELECT {} FROM categories ORDER BY name LIMIT $1 OFFSET $2",
            CATEGORY_COLUMNS
        );
        let categories = sqlx::query_as::<_, Category>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok((categories.into_iter().map(|c| c.into()).collect(), total))
    }

    pub async fn get(&self, id: Uuid) -> Result<CategoryResponseDto> {
        let sql = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category: {:?}", e);
                AppError::Database(e)
            })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::BadRequest("Category not found".to_string()))
    }

    pub async fn create(&self, dto: CategoryRequestDto) -> Result<CategoryResponseDto> {
        let sql = format!(
            "INSERT INTO categories (id, name, description) VALUES ($1, $2, $3) RETURNING {}",
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(Uuid::now_v7())
            .bind(dto.name.trim())
            .bind(&dto.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| constraint_error(e, DUPLICATE_NAME, "Invalid category reference"))?;

        tracing::info!("Category created: id={}, name={}", category.id, category.name);
        Ok(category.into())
    }

    pub async fn update(&self, id: Uuid, dto: CategoryRequestDto) -> Result<CategoryResponseDto> {
        let sql = format!(
            r#"
            UPDATE categories
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(dto.name.trim())
            .bind(&dto.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| constraint_error(e, DUPLICATE_NAME, "Invalid category reference"))?
            .ok_or_else(|| AppError::BadRequest("Category not found".to_string()))?;

        tracing::info!("Category updated: id={}", category.id);
        Ok(category.into())
    }

    /// Equipment in the category keeps existing with no category
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::BadRequest("Category not found".to_string()));
        }

        tracing::info!("Category deleted: id={}", id);
        Ok(())
    }
}
