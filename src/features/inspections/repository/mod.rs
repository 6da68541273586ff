//! Inspection persistence seam.
//!
//! The service talks to [`InspectionRepository`] only, so the intake flow runs
//! against Postgres in production and an in-memory store in tests.

mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::inspections::models::{
    ByCategory, Category, Document, HeaderUpdate, Inspection, InspectionFilter, InspectionRecord,
    LineItem, LineItemRecord, NewInspection,
};

pub use postgres::PgInspectionRepository;

#[async_trait]
pub trait InspectionRepository: Send + Sync {
    /// Equipment id for a primary id or chassis number
    async fn resolve_equipment(&self, reference: &str) -> Result<Option<Uuid>>;

    /// Write header, line-items and attachments atomically
    async fn create(&self, inspection: &NewInspection) -> Result<()>;

    /// Full records matching `filter`, most recently performed first
    async fn list(&self, filter: InspectionFilter) -> Result<Vec<InspectionRecord>>;

    async fn find_header(&self, id: Uuid) -> Result<Option<Inspection>>;

    async fn update_header(&self, id: Uuid, update: &HeaderUpdate) -> Result<Option<Inspection>>;

    /// Returns false when no such inspection exists
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Stitch line-items and documents under their headers, keeping header order.
///
/// Items are ordered by position and documents by creation. Documents without
/// a line-item link are dropped from the view.
pub fn assemble_records(
    headers: Vec<Inspection>,
    items: ByCategory<Vec<LineItem>>,
    documents: Vec<Document>,
) -> Vec<InspectionRecord> {
    let mut docs_by_item: HashMap<Uuid, Vec<Document>> = HashMap::new();
    for doc in documents {
        if let Some((_, item_id)) = doc.line_item_link() {
            docs_by_item.entry(item_id).or_default().push(doc);
        }
    }

    let mut by_inspection: HashMap<Uuid, ByCategory<Vec<LineItemRecord>>> = HashMap::new();
    items.map(|category: Category, mut rows| {
        rows.sort_by_key(|row| row.position);
        for item in rows {
            let mut documents = docs_by_item.remove(&item.id).unwrap_or_default();
            documents.sort_by_key(|d| (d.created_at, d.id));
            by_inspection.entry(item.inspection_id).or_default()[category]
                .push(LineItemRecord { item, documents });
        }
    });

    headers
        .into_iter()
        .map(|inspection| {
            let items = by_inspection.remove(&inspection.id).unwrap_or_default();
            InspectionRecord { inspection, items }
        })
        .collect()
}
