use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Inspection line-item category. Order of declaration is processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Exterior,
    Interior,
    Mechanical,
    Functional,
    DocumentLegal,
}

/// Naming for one category across the API, file uploads and the schema
#[derive(Debug)]
pub struct CategorySpec {
    pub category: Category,
    /// Name used in attachment metadata
    pub name: &'static str,
    /// Request/response field holding the category's line-items
    pub form_field: &'static str,
    /// Multipart field-name prefix for attachments
    pub file_prefix: &'static str,
    pub label: &'static str,
    pub table: &'static str,
    /// Column on `documents` pointing at a line-item of this category
    pub link_column: &'static str,
}

/// Fixed naming table. `documentLegal` uploads use the `documentation` prefix.
pub const CATEGORY_TABLE: [CategorySpec; 5] = [
    CategorySpec {
        category: Category::Exterior,
        name: "exterior",
        form_field: "exteriorInspections",
        file_prefix: "exterior",
        label: "Exterior",
        table: "exterior_inspections",
        link_column: "exterior_inspection_id",
    },
    CategorySpec {
        category: Category::Interior,
        name: "interior",
        form_field: "interiorInspections",
        file_prefix: "interior",
        label: "Interior",
        table: "interior_inspections",
        link_column: "interior_inspection_id",
    },
    CategorySpec {
        category: Category::Mechanical,
        name: "mechanical",
        form_field: "mechanicalInspections",
        file_prefix: "mechanical",
        label: "Mechanical",
        table: "mechanical_inspections",
        link_column: "mechanical_inspection_id",
    },
    CategorySpec {
        category: Category::Functional,
        name: "functional",
        form_field: "functionalInspections",
        file_prefix: "functional",
        label: "Functional",
        table: "functional_inspections",
        link_column: "functional_inspection_id",
    },
    CategorySpec {
        category: Category::DocumentLegal,
        name: "documentLegal",
        form_field: "documentLegalInspections",
        file_prefix: "documentation",
        label: "Document/Legal",
        table: "document_legal_inspections",
        link_column: "document_legal_inspection_id",
    },
];

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Exterior,
        Category::Interior,
        Category::Mechanical,
        Category::Functional,
        Category::DocumentLegal,
    ];

    pub fn spec(self) -> &'static CategorySpec {
        &CATEGORY_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn form_field(self) -> &'static str {
        self.spec().form_field
    }

    pub fn file_prefix(self) -> &'static str {
        self.spec().file_prefix
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// Field-name prefix binding a file to the item at `index`, e.g. `exterior_1_`
    pub fn attachment_prefix(self, index: usize) -> String {
        format!("{}_{}_", self.file_prefix(), index)
    }
}

/// One value per category, indexed by [`Category`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ByCategory<T>([T; 5]);

impl<T> ByCategory<T> {
    pub fn from_fn(f: impl FnMut(Category) -> T) -> Self {
        ByCategory(Category::ALL.map(f))
    }

    /// Iterate in processing order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(self, mut f: impl FnMut(Category, T) -> U) -> ByCategory<U> {
        let [exterior, interior, mechanical, functional, document_legal] = self.0;
        ByCategory([
            f(Category::Exterior, exterior),
            f(Category::Interior, interior),
            f(Category::Mechanical, mechanical),
            f(Category::Functional, functional),
            f(Category::DocumentLegal, document_legal),
        ])
    }
}

impl<T> Index<Category> for ByCategory<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        &self.0[category as usize]
    }
}

impl<T> IndexMut<Category> for ByCategory<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        &mut self.0[category as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_in_declaration_order() {
        for (i, spec) in CATEGORY_TABLE.iter().enumerate() {
            assert_eq!(spec.category as usize, i);
            assert_eq!(Category::ALL[i], spec.category);
        }
    }

    #[test]
    fn test_document_legal_uses_documentation_prefix() {
        assert_eq!(Category::DocumentLegal.name(), "documentLegal");
        assert_eq!(Category::DocumentLegal.file_prefix(), "documentation");
        assert_eq!(Category::DocumentLegal.attachment_prefix(2), "documentation_2_");
    }

    #[test]
    fn test_by_category_iterates_in_fixed_order() {
        let values = ByCategory::from_fn(|c| c.name());
        let order: Vec<_> = values.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Category::ALL.to_vec());
        assert_eq!(values[Category::Functional], "functional");
    }

    #[test]
    fn test_by_category_map_keeps_categories() {
        let counts = ByCategory::from_fn(|c| c as usize).map(|c, n| (c, n * 10));
        assert_eq!(counts[Category::Mechanical], (Category::Mechanical, 20));
    }
}
