//! Attachment matcher.
//!
//! A file belongs to item `i` of category `c` when its multipart field name
//! starts with `<prefix>_<i>_`, the prefix coming from the category table.
//! The trailing underscore keeps the index exact: `exterior_1_` never matches
//! `exterior_10_front`.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::extractor::UploadedFile;
use crate::features::inspections::models::{ByCategory, Category};
use crate::features::inspections::services::normalizer::LineItemInput;
use crate::shared::constants::get_extension_from_content_type;

/// Files bound to one line-item, by item index
pub type ItemFiles<'a> = Vec<Vec<&'a UploadedFile>>;

/// Group `files` under the line-items they name. Files naming no item are left out.
pub fn match_attachments<'a>(
    items: &ByCategory<Vec<LineItemInput>>,
    files: &'a [UploadedFile],
) -> ByCategory<ItemFiles<'a>> {
    ByCategory::from_fn(|category| {
        (0..items[category].len())
            .map(|index| {
                let prefix = category.attachment_prefix(index);
                files
                    .iter()
                    .filter(|f| f.field_name.starts_with(&prefix))
                    .collect()
            })
            .collect()
    })
}

/// Field names of uploads that matched no line-item
pub fn unmatched_field_names<'a>(
    matched: &ByCategory<ItemFiles<'_>>,
    files: &'a [UploadedFile],
) -> Vec<&'a str> {
    files
        .iter()
        .filter(|file| {
            !matched
                .iter()
                .flat_map(|(_, per_item)| per_item.iter().flatten())
                .any(|m| std::ptr::eq(*m, *file))
        })
        .map(|file| file.field_name.as_str())
        .collect()
}

/// Human-readable attachment description, e.g. `Exterior inspection - Body/Exterior`
pub fn attachment_description(category: Category, item_name: &str) -> String {
    format!("{} inspection - {}", category.label(), item_name)
}

pub fn attachment_metadata(
    category: Category,
    index: usize,
    item_name: &str,
    field_name: &str,
) -> Value {
    json!({
        "fieldName": field_name,
        "category": category.name(),
        "itemIndex": index,
        "itemName": item_name,
    })
}

/// Object key `inspections/<inspection id>/<prefix>/<uuid>.<ext>`
pub fn storage_key(inspection_id: Uuid, category: Category, content_type: &str) -> String {
    let extension = get_extension_from_content_type(content_type).unwrap_or("bin");
    format!(
        "inspections/{}/{}/{}.{}",
        inspection_id,
        category.file_prefix(),
        Uuid::now_v7(),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::inspections::models::ItemCondition;
    use axum::body::Bytes;

    fn item(name: &str) -> LineItemInput {
        LineItemInput {
            item_name: name.to_string(),
            condition: ItemCondition::Good,
            notes: None,
        }
    }

    fn file(field_name: &str) -> UploadedFile {
        UploadedFile {
            field_name: field_name.to_string(),
            file_name: format!("{}.jpg", field_name),
            content_type: "image/jpeg".to_string(),
            data: Bytes::from_static(b"img"),
        }
    }

    fn names<'a>(files: &[&'a UploadedFile]) -> Vec<&'a str> {
        files.iter().map(|f| f.field_name.as_str()).collect()
    }

    #[test]
    fn test_index_exact_matching() {
        let mut items = ByCategory::<Vec<LineItemInput>>::default();
        items[Category::Exterior] = (0..11).map(|i| item(&format!("Item {}", i))).collect();

        let files = vec![file("exterior_1_front"), file("exterior_10_rear")];
        let matched = match_attachments(&items, &files);
        let exterior = &matched[Category::Exterior];

        assert_eq!(names(&exterior[1]), vec!["exterior_1_front"]);
        assert_eq!(names(&exterior[10]), vec!["exterior_10_rear"]);
        for index in [0, 2] {
            assert!(exterior[index].is_empty());
        }
    }

    #[test]
    fn test_many_files_per_item() {
        let mut items = ByCategory::<Vec<LineItemInput>>::default();
        items[Category::Interior] = vec![item("Seats")];

        let files = vec![
            file("interior_0_left"),
            file("interior_0_right"),
            file("interior_0_"),
        ];
        let matched = match_attachments(&items, &files);

        assert_eq!(matched[Category::Interior][0].len(), 3);
    }

    #[test]
    fn test_document_legal_uses_documentation_prefix() {
        let mut items = ByCategory::<Vec<LineItemInput>>::default();
        items[Category::DocumentLegal] = vec![item("Registration")];

        let files = vec![file("documentation_0_scan"), file("documentLegal_0_scan")];
        let matched = match_attachments(&items, &files);

        assert_eq!(
            names(&matched[Category::DocumentLegal][0]),
            vec!["documentation_0_scan"]
        );
        assert_eq!(
            unmatched_field_names(&matched, &files),
            vec!["documentLegal_0_scan"]
        );
    }

    #[test]
    fn test_files_for_missing_items_are_unmatched() {
        let mut items = ByCategory::<Vec<LineItemInput>>::default();
        items[Category::Mechanical] = vec![item("Engine")];

        let files = vec![
            file("mechanical_0_engine"),
            file("mechanical_1_brakes"),
            file("functional_0_lights"),
            file("photo"),
        ];
        let matched = match_attachments(&items, &files);

        assert_eq!(matched[Category::Mechanical][0].len(), 1);
        assert!(matched[Category::Functional].is_empty());
        assert_eq!(
            unmatched_field_names(&matched, &files),
            vec!["mechanical_1_brakes", "functional_0_lights", "photo"]
        );
    }

    #[test]
    fn test_description_and_metadata() {
        assert_eq!(
            attachment_description(Category::Exterior, "Body/Exterior"),
            "Exterior inspection - Body/Exterior"
        );
        assert_eq!(
            attachment_metadata(Category::DocumentLegal, 2, "Permit", "documentation_2_permit"),
            json!({
                "fieldName": "documentation_2_permit",
                "category": "documentLegal",
                "itemIndex": 2,
                "itemName": "Permit",
            })
        );
    }

    #[test]
    fn test_storage_key_layout() {
        let id = Uuid::now_v7();
        let key = storage_key(id, Category::DocumentLegal, "application/pdf");
        let prefix = format!("inspections/{}/documentation/", id);
        assert!(key.starts_with(&prefix));
        assert!(key.ends_with(".pdf"));
    }
}
