use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::equipment::models::Equipment;
use crate::shared::validation::CHASSIS_NUMBER_REGEX;

/// Request body for creating or replacing equipment
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRequestDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Uppercase alphanumeric segments separated by hyphens, e.g. `CHS-2023001`
    #[validate(regex(
        path = *CHASSIS_NUMBER_REGEX,
        message = "Chassis number must be uppercase letters and digits separated by single hyphens"
    ))]
    #[validate(length(max = 64, message = "Chassis number must be at most 64 characters"))]
    pub chassis_number: String,

    #[validate(length(max = 255))]
    pub model: Option<String>,

    #[validate(length(max = 255))]
    pub manufacturer: Option<String>,

    pub category_id: Option<Uuid>,

    /// Custodian operator
    pub operator_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentResponseDto {
    pub id: Uuid,
    pub name: String,
    pub chassis_number: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub category_id: Option<Uuid>,
    pub operator_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Equipment> for EquipmentResponseDto {
    fn from(e: Equipment) -> Self {
        Self {
            id: e.id,
            name: e.name,
            chassis_number: e.chassis_number,
            model: e.model,
            manufacturer: e.manufacturer,
            category_id: e.category_id,
            operator_id: e.operator_id,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(chassis: &str) -> EquipmentRequestDto {
        EquipmentRequestDto {
            name: "Excavator 320".to_string(),
            chassis_number: chassis.to_string(),
            model: Some("320 GC".to_string()),
            manufacturer: None,
            category_id: None,
            operator_id: None,
        }
    }

    #[test]
    fn test_chassis_number_format() {
        assert!(request("CHS-2023001").validate().is_ok());

        let errors = request("chs 2023001").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("chassis_number"));
    }
}
