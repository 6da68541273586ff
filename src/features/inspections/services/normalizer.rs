//! Form normalizer.
//!
//! Turns a JSON body or a multipart text-field map into an
//! [`InspectionSubmission`]. Multipart clients send the category arrays as
//! JSON-encoded strings, so every string value with a leading `{` or `[` is
//! decoded first. Decoding failures keep the raw string; typed validation
//! rejects it afterwards with a field-level error.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use validator::Validate;

use crate::core::error::{field_errors, AppError, Result};
use crate::features::inspections::models::{ByCategory, Category, ItemCondition};
use crate::shared::types::FieldError;

pub const EQUIPMENT_FIELD: &str = "equipmentId";
pub const NEXT_DUE_DATE_FIELD: &str = "nextDueDate";
pub const NOTES_FIELD: &str = "notes";

/// One submitted checklist entry
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    #[validate(length(min = 1, max = 255, message = "itemName must be 1-255 characters"))]
    pub item_name: String,
    pub condition: ItemCondition,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Canonical field map: embedded JSON decoded, categories present, equipment known
#[derive(Debug, Clone)]
pub struct NormalizedForm {
    pub equipment_ref: String,
    pub next_due_date: Value,
    pub notes: Value,
    /// Decoded category values; `[]` where the client sent nothing
    pub categories: ByCategory<Value>,
}

/// Validated inspection submission
#[derive(Debug, Clone)]
pub struct InspectionSubmission {
    pub equipment_ref: String,
    pub next_due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub items: ByCategory<Vec<LineItemInput>>,
}

/// Decode a string holding embedded JSON, otherwise return the value untouched.
fn decode_embedded_json(value: Value) -> Value {
    let Value::String(raw) = value else {
        return value;
    };

    let trimmed = raw.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return Value::String(raw);
    }

    match serde_json::from_str(trimmed) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Keeping undecodable field value as text: {}", e);
            Value::String(raw)
        }
    }
}

/// Canonicalize a submitted field map.
///
/// Only a missing or empty equipment reference fails here.
pub fn normalize(mut fields: Map<String, Value>) -> Result<NormalizedForm> {
    let equipment_ref = match fields.remove(EQUIPMENT_FIELD).map(decode_embedded_json) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(AppError::BadRequest(format!(
                "{} is required",
                EQUIPMENT_FIELD
            )))
        }
    };

    let mut take = |name: &str| {
        fields
            .remove(name)
            .map(decode_embedded_json)
            .unwrap_or(Value::Null)
    };

    let next_due_date = take(NEXT_DUE_DATE_FIELD);
    let notes = take(NOTES_FIELD);
    let categories = ByCategory::from_fn(|category| match take(category.form_field()) {
        Value::Null => Value::Array(Vec::new()),
        value => value,
    });

    Ok(NormalizedForm {
        equipment_ref,
        next_due_date,
        notes,
        categories,
    })
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        })
}

fn optional_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        _ => None,
    }
}

impl NormalizedForm {
    /// Type-check every field, collecting all failures before rejecting.
    pub fn into_submission(self) -> Result<InspectionSubmission> {
        let mut errors = Vec::new();

        let next_due_date = match &self.next_due_date {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => {
                let parsed = parse_date(s);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        NEXT_DUE_DATE_FIELD,
                        "must be an RFC 3339 timestamp or YYYY-MM-DD date",
                    ));
                }
                parsed
            }
            _ => {
                errors.push(FieldError::new(NEXT_DUE_DATE_FIELD, "must be a date string"));
                None
            }
        };

        if !matches!(self.notes, Value::Null | Value::String(_)) {
            errors.push(FieldError::new(NOTES_FIELD, "must be a string"));
        }
        let notes = optional_text(self.notes);

        let items = self
            .categories
            .map(|category, value| line_items(category, value, &mut errors));

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(InspectionSubmission {
            equipment_ref: self.equipment_ref,
            next_due_date,
            notes,
            items,
        })
    }
}

fn line_items(category: Category, value: Value, errors: &mut Vec<FieldError>) -> Vec<LineItemInput> {
    let field = category.form_field();
    let Value::Array(entries) = value else {
        errors.push(FieldError::new(field, "must be an array of inspection items"));
        return Vec::new();
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let path = format!("{}[{}]", field, index);
        match serde_json::from_value::<LineItemInput>(decode_embedded_json(entry)) {
            Ok(item) => match item.validate() {
                Ok(()) => items.push(item),
                Err(e) => errors.extend(field_errors(Some(&path), &e)),
            },
            Err(e) => errors.push(FieldError::new(path, e.to_string())),
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_multipart_strings_are_decoded() {
        let form = normalize(fields(json!({
            "equipmentId": "CHS-2023001",
            "exteriorInspections": "[{\"itemName\":\"Body/Exterior\",\"condition\":\"GOOD\"}]",
            "notes": "Routine check"
        })))
        .unwrap();

        assert_eq!(form.equipment_ref, "CHS-2023001");
        assert_eq!(
            form.categories[Category::Exterior],
            json!([{"itemName": "Body/Exterior", "condition": "GOOD"}])
        );
        assert_eq!(form.notes, json!("Routine check"));
    }

    #[test]
    fn test_missing_categories_default_to_empty() {
        let submission = normalize(fields(json!({
            "equipmentId": "CHS-1",
            "exteriorInspections": [{"itemName": "Body", "condition": "FAIR"}]
        })))
        .unwrap()
        .into_submission()
        .unwrap();

        assert_eq!(submission.items[Category::Exterior].len(), 1);
        for category in [
            Category::Interior,
            Category::Mechanical,
            Category::Functional,
            Category::DocumentLegal,
        ] {
            assert!(submission.items[category].is_empty());
        }
    }

    #[test]
    fn test_missing_equipment_is_bad_request() {
        let result = normalize(fields(json!({"exteriorInspections": []})));
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = normalize(fields(json!({"equipmentId": "   "})));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_undecodable_string_is_kept_then_rejected() {
        let form = normalize(fields(json!({
            "equipmentId": "CHS-1",
            "mechanicalInspections": "[{not json"
        })))
        .unwrap();

        assert_eq!(form.categories[Category::Mechanical], json!("[{not json"));

        match form.into_submission() {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "mechanicalInspections");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_item_errors_carry_index_paths() {
        let result = normalize(fields(json!({
            "equipmentId": "CHS-1",
            "interiorInspections": [
                {"itemName": "Seats", "condition": "GOOD"},
                {"itemName": "", "condition": "GOOD"},
                {"itemName": "Dash", "condition": "BROKEN"}
            ]
        })))
        .unwrap()
        .into_submission();

        match result {
            Err(AppError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(
                    fields,
                    vec!["interiorInspections[1].item_name", "interiorInspections[2]"]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_due_date_formats() {
        let submission = normalize(fields(json!({
            "equipmentId": "CHS-1",
            "nextDueDate": "2025-03-01"
        })))
        .unwrap()
        .into_submission()
        .unwrap();
        assert_eq!(
            submission.next_due_date,
            parse_date("2025-03-01T00:00:00Z")
        );

        let result = normalize(fields(json!({
            "equipmentId": "CHS-1",
            "nextDueDate": "next tuesday"
        })))
        .unwrap()
        .into_submission();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_numeric_equipment_reference() {
        let form = normalize(fields(json!({"equipmentId": 42}))).unwrap();
        assert_eq!(form.equipment_ref, "42");
    }
}
