use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::operators::models::Operator;
use crate::shared::validation::PHONE_REGEX;

/// Request body for creating or replacing an operator
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorRequestDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[validate(length(max = 64, message = "License number must be at most 64 characters"))]
    pub license_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorResponseDto {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Operator> for OperatorResponseDto {
    fn from(o: Operator) -> Self {
        Self {
            id: o.id,
            name: o.name,
            phone: o.phone,
            license_number: o.license_number,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}
