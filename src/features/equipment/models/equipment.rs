use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for equipment
#[derive(Debug, Clone, FromRow)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub chassis_number: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub category_id: Option<Uuid>,
    /// Custodian operator
    pub operator_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One step of resolving an equipment reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentLookup<'a> {
    Id(Uuid),
    ChassisNumber(&'a str),
}

/// Lookups to try, in order, for a client-supplied reference.
///
/// A reference shaped like a UUID is tried as a primary id first, then as a
/// chassis number; anything else is only a chassis number.
pub fn lookup_order(reference: &str) -> Vec<EquipmentLookup<'_>> {
    let reference = reference.trim();
    match Uuid::parse_str(reference) {
        Ok(id) => vec![
            EquipmentLookup::Id(id),
            EquipmentLookup::ChassisNumber(reference),
        ],
        Err(_) => vec![EquipmentLookup::ChassisNumber(reference)],
    }
}
