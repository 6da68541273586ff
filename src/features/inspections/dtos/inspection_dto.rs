use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::inspections::models::{
    Category, Document, InspectionRecord, ItemCondition, LineItemRecord,
};
use crate::shared::constants::UNKNOWN_FIELD_NAME;

/// Attachment as shown on a line-item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageFieldDto {
    /// Multipart field the file was uploaded under, or `unknown`
    pub field_name: String,
    pub file_name: String,
    pub url: String,
    pub mime_type: String,
    pub file_size: i64,
}

impl From<Document> for ImageFieldDto {
    fn from(doc: Document) -> Self {
        Self {
            field_name: doc.field_name().unwrap_or(UNKNOWN_FIELD_NAME).to_string(),
            file_name: doc.file_name,
            url: doc.url,
            mime_type: doc.mime_type,
            file_size: doc.file_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResponseDto {
    pub id: Uuid,
    pub item_name: String,
    pub condition: ItemCondition,
    pub notes: Option<String>,
    pub image_fields: Vec<ImageFieldDto>,
}

impl From<LineItemRecord> for LineItemResponseDto {
    fn from(record: LineItemRecord) -> Self {
        Self {
            id: record.item.id,
            item_name: record.item.item_name,
            condition: record.item.condition,
            notes: record.item.notes,
            image_fields: record.documents.into_iter().map(ImageFieldDto::from).collect(),
        }
    }
}

/// Inspection with its line-items grouped by category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResponseDto {
    pub id: Uuid,
    pub equipment_id: Uuid,
    pub inspector_id: Uuid,
    pub date: DateTime<Utc>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub exterior_inspections: Vec<LineItemResponseDto>,
    pub interior_inspections: Vec<LineItemResponseDto>,
    pub mechanical_inspections: Vec<LineItemResponseDto>,
    pub functional_inspections: Vec<LineItemResponseDto>,
    pub document_legal_inspections: Vec<LineItemResponseDto>,
}

impl From<InspectionRecord> for InspectionResponseDto {
    fn from(record: InspectionRecord) -> Self {
        let mut items = record
            .items
            .map(|_, rows| rows.into_iter().map(LineItemResponseDto::from).collect::<Vec<_>>());
        let mut take = |category: Category| std::mem::take(&mut items[category]);
        let header = record.inspection;

        Self {
            id: header.id,
            equipment_id: header.equipment_id,
            inspector_id: header.inspector_id,
            date: header.performed_at,
            next_due_date: header.next_due_date,
            notes: header.notes,
            created_at: header.created_at,
            updated_at: header.updated_at,
            exterior_inspections: take(Category::Exterior),
            interior_inspections: take(Category::Interior),
            mechanical_inspections: take(Category::Mechanical),
            functional_inspections: take(Category::Functional),
            document_legal_inspections: take(Category::DocumentLegal),
        }
    }
}

/// Body returned after a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedInspectionDto {
    pub id: Uuid,
}

/// Header update; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInspectionDto {
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub next_due_date: Option<String>,
    pub notes: Option<String>,
}

/// Line-item as submitted, for API documentation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequestDto {
    pub item_name: String,
    pub condition: ItemCondition,
    pub notes: Option<String>,
}

/// Submission body, for API documentation.
///
/// As multipart, the category arrays travel as JSON-encoded text fields and
/// files use field names `<prefix>_<itemIndex>_<suffix>`, with prefixes
/// `exterior`, `interior`, `mechanical`, `functional` and `documentation`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInspectionRequestDto {
    /// Equipment id or chassis number
    pub equipment_id: String,
    pub next_due_date: Option<String>,
    pub notes: Option<String>,
    pub exterior_inspections: Option<Vec<LineItemRequestDto>>,
    pub interior_inspections: Option<Vec<LineItemRequestDto>>,
    pub mechanical_inspections: Option<Vec<LineItemRequestDto>>,
    pub functional_inspections: Option<Vec<LineItemRequestDto>>,
    pub document_legal_inspections: Option<Vec<LineItemRequestDto>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(metadata: Option<serde_json::Value>) -> Document {
        Document {
            id: Uuid::now_v7(),
            url: "http://localhost:3000/uploads/inspections/1/exterior/a.jpg".to_string(),
            file_name: "frontView.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            file_size: 2048,
            description: Some("Exterior inspection - Body/Exterior".to_string()),
            metadata,
            inspection_id: Some(Uuid::now_v7()),
            exterior_inspection_id: Some(Uuid::now_v7()),
            interior_inspection_id: None,
            mechanical_inspection_id: None,
            functional_inspection_id: None,
            document_legal_inspection_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_image_field_uses_metadata_field_name() {
        let dto = ImageFieldDto::from(document(Some(json!({"fieldName": "exterior_0_frontView"}))));
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({
                "fieldName": "exterior_0_frontView",
                "fileName": "frontView.jpg",
                "url": "http://localhost:3000/uploads/inspections/1/exterior/a.jpg",
                "mimeType": "image/jpeg",
                "fileSize": 2048
            })
        );
    }

    #[test]
    fn test_image_field_falls_back_to_unknown() {
        assert_eq!(ImageFieldDto::from(document(None)).field_name, "unknown");
        assert_eq!(
            ImageFieldDto::from(document(Some(json!({"itemIndex": 0})))).field_name,
            "unknown"
        );
    }
}
