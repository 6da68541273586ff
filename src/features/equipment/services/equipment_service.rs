use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{constraint_error, AppError, Result};
use crate::features::equipment::dtos::{EquipmentRequestDto, EquipmentResponseDto};
use crate::features::equipment::models::{lookup_order, Equipment, EquipmentLookup};

const EQUIPMENT_COLUMNS: &str = "id, name, chassis_number, model, manufacturer, category_id, operator_id, created_at, updated_at";

const DUPLICATE_CHASSIS: &str = "Equipment with this chassis number already exists";
const UNKNOWN_REFERENCE: &str = "Category or operator does not exist";

/// Service for equipment CRUD
pub struct EquipmentService {
    pool: PgPool,
}

impl EquipmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<EquipmentResponseDto>, i64)> {
        let sql = format!(
            "SELECT {} FROM equipment ORDER BY name, chassis_number LIMIT $1 OFFSET $2",
            EQUIPMENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Equipment>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list equipment: {:?}", e);
                AppError::Database(e)
            })?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM equipment")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Find by primary id, falling back to chassis number
    pub async fn get(&self, reference: &str) -> Result<EquipmentResponseDto> {
        let by_id = format!("SELECT {} FROM equipment WHERE id = $1", EQUIPMENT_COLUMNS);
        let by_chassis = format!(
            "SELECT {} FROM equipment WHERE chassis_number = $1",
            EQUIPMENT_COLUMNS
        );

        for lookup in lookup_order(reference) {
            let found = match lookup {
                EquipmentLookup::Id(id) => {
                    sqlx::query_as::<_, Equipment>(&by_id)
                        .bind(id)
                        .fetch_optional(&self.pool)
                        .await?
                }
                EquipmentLookup::ChassisNumber(chassis) => {
                    sqlx::query_as::<_, Equipment>(&by_chassis)
                        .bind(chassis)
                        .fetch_optional(&self.pool)
                        .await?
                }
            };
            if let Some(equipment) = found {
                return Ok(equipment.into());
            }
        }

        Err(AppError::BadRequest("Equipment not found".to_string()))
    }

    pub async fn create(&self, dto: EquipmentRequestDto) -> Result<EquipmentResponseDto> {
        let sql = format!(
            r#"
            INSERT INTO equipment (id, name, chassis_number, model, manufacturer, category_id, operator_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            EQUIPMENT_COLUMNS
        );

        let equipment = sqlx::query_as::<_, Equipment>(&sql)
            .bind(Uuid::now_v7())
            .bind(&dto.name)
            .bind(&dto.chassis_number)
            .bind(&dto.model)
            .bind(&dto.manufacturer)
            .bind(dto.category_id)
            .bind(dto.operator_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| constraint_error(e, DUPLICATE_CHASSIS, UNKNOWN_REFERENCE))?;

        tracing::info!(
            "Equipment created: id={}, chassis={}",
            equipment.id,
            equipment.chassis_number
        );

        Ok(equipment.into())
    }

    pub async fn update(&self, id: Uuid, dto: EquipmentRequestDto) -> Result<EquipmentResponseDto> {
        let sql = format!(
            r#"
            UPDATE equipment
            SET name = $2, chassis_number = $3, model = $4, manufacturer = $5,
                category_id = $6, operator_id = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EQUIPMENT_COLUMNS
        );

        let equipment = sqlx::query_as::<_, Equipment>(&sql)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.chassis_number)
            .bind(&dto.model)
            .bind(&dto.manufacturer)
            .bind(dto.category_id)
            .bind(dto.operator_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| constraint_error(e, DUPLICATE_CHASSIS, UNKNOWN_REFERENCE))?
            .ok_or_else(|| AppError::BadRequest("Equipment not found".to_string()))?;

        tracing::info!("Equipment updated: id={}", equipment.id);
        Ok(equipment.into())
    }

    /// Fails while inspections still reference the equipment
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                constraint_error(
                    e,
                    DUPLICATE_CHASSIS,
                    "Equipment has inspections and cannot be deleted",
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::BadRequest("Equipment not found".to_string()));
        }

        tracing::info!("Equipment deleted: id={}", id);
        Ok(())
    }
}
