use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use super::category::Category;

/// Stored attachment row
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub description: Option<String>,
    pub metadata: Option<Value>,
    pub inspection_id: Option<Uuid>,
    pub exterior_inspection_id: Option<Uuid>,
    pub interior_inspection_id: Option<Uuid>,
    pub mechanical_inspection_id: Option<Uuid>,
    pub functional_inspection_id: Option<Uuid>,
    pub document_legal_inspection_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// The line-item this document belongs to, if any. At most one link is set.
    pub fn line_item_link(&self) -> Option<(Category, Uuid)> {
        [
            (Category::Exterior, self.exterior_inspection_id),
            (Category::Interior, self.interior_inspection_id),
            (Category::Mechanical, self.mechanical_inspection_id),
            (Category::Functional, self.functional_inspection_id),
            (Category::DocumentLegal, self.document_legal_inspection_id),
        ]
        .into_iter()
        .find_map(|(category, id)| id.map(|id| (category, id)))
    }

    /// Original multipart field name from metadata
    pub fn field_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("fieldName"))
            .and_then(Value::as_str)
    }
}

/// Attachment to insert alongside its line-item
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub id: Uuid,
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub description: String,
    pub metadata: Value,
    pub category: Category,
    pub line_item_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(metadata: Option<Value>) -> Document {
        Document {
            id: Uuid::now_v7(),
            url: "http://localhost/uploads/a.jpg".to_string(),
            file_name: "a.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            file_size: 3,
            description: None,
            metadata,
            inspection_id: Some(Uuid::now_v7()),
            exterior_inspection_id: None,
            interior_inspection_id: None,
            mechanical_inspection_id: None,
            functional_inspection_id: None,
            document_legal_inspection_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_line_item_link() {
        let item_id = Uuid::now_v7();
        let mut doc = document(None);
        assert_eq!(doc.line_item_link(), None);

        doc.mechanical_inspection_id = Some(item_id);
        assert_eq!(doc.line_item_link(), Some((Category::Mechanical, item_id)));
    }

    #[test]
    fn test_field_name_from_metadata() {
        let doc = document(Some(json!({"fieldName": "exterior_0_frontView"})));
        assert_eq!(doc.field_name(), Some("exterior_0_frontView"));

        assert_eq!(document(Some(json!({"category": "exterior"}))).field_name(), None);
        assert_eq!(document(None).field_name(), None);
    }
}
