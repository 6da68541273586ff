use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use super::category::ByCategory;
use super::document::{Document, NewAttachment};

/// Observed state of one checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "item_condition", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCondition {
    Good,
    Fair,
    Poor,
    Critical,
    NotApplicable,
}

/// Inspection header row
#[derive(Debug, Clone, FromRow)]
pub struct Inspection {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub inspector_id: Uuid,
    pub performed_at: DateTime<Utc>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of any of the five line-item tables
#[derive(Debug, Clone, FromRow)]
pub struct LineItem {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub position: i32,
    pub item_name: String,
    pub condition: ItemCondition,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LineItemRecord {
    pub item: LineItem,
    pub documents: Vec<Document>,
}

/// Header plus every line-item with its attachments
#[derive(Debug, Clone)]
pub struct InspectionRecord {
    pub inspection: Inspection,
    pub items: ByCategory<Vec<LineItemRecord>>,
}

/// Fully-resolved inspection ready to be written in one transaction.
///
/// Ids are allocated up front so attachments can carry their links at insert.
#[derive(Debug, Clone)]
pub struct NewInspection {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub inspector_id: Uuid,
    pub performed_at: DateTime<Utc>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub items: ByCategory<Vec<NewLineItem>>,
}

#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub id: Uuid,
    pub position: i32,
    pub item_name: String,
    pub condition: ItemCondition,
    pub notes: Option<String>,
    pub attachments: Vec<NewAttachment>,
}

impl NewInspection {
    pub fn attachments(&self) -> impl Iterator<Item = &NewAttachment> {
        self.items
            .iter()
            .flat_map(|(_, items)| items.iter())
            .flat_map(|item| item.attachments.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionFilter {
    All,
    Id(Uuid),
    Inspector(Uuid),
    Equipment(Uuid),
}

/// Header fields that may change after submission. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct HeaderUpdate {
    pub next_due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
