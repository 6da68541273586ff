use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::{body::Bytes, extract::Request, middleware::Next, Router};
use chrono::{DateTime, Utc};
use fake::{faker::name::en::Name, Fake};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::UploadedFile;
use crate::features::auth::model::{AuthenticatedUser, Role, UserStatus};
use crate::features::equipment::models::{lookup_order, EquipmentLookup};
use crate::features::inspections::models::{
    ByCategory, Category, Document, HeaderUpdate, Inspection, InspectionFilter, InspectionRecord,
    LineItem, NewInspection,
};
use crate::features::inspections::repository::{assemble_records, InspectionRepository};
use crate::modules::storage::{StorageBackend, StoreRequest, StoredFile};

pub fn create_user(role: Role) -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::now_v7(),
        name: Name().fake(),
        role,
        status: UserStatus::Active,
    }
}

/// Run every request of `router` as `user`, bypassing token verification
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

pub fn exterior_item(name: &str) -> Value {
    json!({"itemName": name, "condition": "GOOD"})
}

pub fn upload(field_name: &str, file_name: &str, content_type: &str) -> UploadedFile {
    UploadedFile {
        field_name: field_name.to_string(),
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        data: Bytes::from_static(b"test-bytes"),
    }
}

/// Inspection with no line-items, performed at `performed_at`
pub fn bare_inspection(equipment_id: Uuid, inspector_id: Uuid, performed_at: DateTime<Utc>) -> NewInspection {
    NewInspection {
        id: Uuid::now_v7(),
        equipment_id,
        inspector_id,
        performed_at,
        next_due_date: None,
        notes: None,
        items: ByCategory::default(),
    }
}

/// Storage keeping files in a map, addressed as `memory://<key>`
#[derive(Default)]
pub struct InMemoryStorage {
    files: Mutex<HashMap<String, StoredFile>>,
    deleted: AtomicUsize,
}

impl InMemoryStorage {
    pub fn stored_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn store(&self, request: StoreRequest) -> Result<StoredFile> {
        let stored = StoredFile {
            url: format!("memory://{}", request.key),
            size: request.data.len() as i64,
            mime_type: request.content_type,
            name: request.file_name,
        };
        self.files
            .lock()
            .unwrap()
            .insert(stored.url.clone(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.files.lock().unwrap().remove(url);
        self.deleted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct StoredInspection {
    header: Inspection,
    submitted: NewInspection,
}

#[derive(Default)]
struct RepositoryState {
    equipment: Vec<(Uuid, String)>,
    inspections: Vec<StoredInspection>,
    fail_next_create: bool,
}

/// Inspection store with the same observable behaviour as the Postgres one
#[derive(Default)]
pub struct InMemoryInspectionRepository {
    state: Mutex<RepositoryState>,
}

impl InMemoryInspectionRepository {
    /// Register equipment and return its id
    pub fn add_equipment(&self, chassis_number: &str) -> Uuid {
        let id = Uuid::now_v7();
        self.state
            .lock()
            .unwrap()
            .equipment
            .push((id, chassis_number.to_string()));
        id
    }

    pub fn inspection_count(&self) -> usize {
        self.state.lock().unwrap().inspections.len()
    }

    pub fn created(&self, id: Uuid) -> Option<NewInspection> {
        self.state
            .lock()
            .unwrap()
            .inspections
            .iter()
            .find(|s| s.header.id == id)
            .map(|s| s.submitted.clone())
    }

    /// Make the next `create` fail as a rolled-back transaction would
    pub fn fail_next_create(&self) {
        self.state.lock().unwrap().fail_next_create = true;
    }

    /// Drop the metadata of every stored attachment
    pub fn clear_attachment_metadata(&self) {
        let mut state = self.state.lock().unwrap();
        for stored in state.inspections.iter_mut() {
            for category in Category::ALL {
                for item in stored.submitted.items[category].iter_mut() {
                    for attachment in item.attachments.iter_mut() {
                        attachment.metadata = Value::Null;
                    }
                }
            }
        }
    }
}

fn header_of(inspection: &NewInspection) -> Inspection {
    let now = Utc::now();
    Inspection {
        id: inspection.id,
        equipment_id: inspection.equipment_id,
        inspector_id: inspection.inspector_id,
        performed_at: inspection.performed_at,
        next_due_date: inspection.next_due_date,
        notes: inspection.notes.clone(),
        created_at: now,
        updated_at: now,
    }
}

/// Rows the Postgres store would hold for `inspection`
fn rows_of(inspection: &NewInspection, items: &mut ByCategory<Vec<LineItem>>, documents: &mut Vec<Document>) {
    let now = Utc::now();
    for (category, new_items) in inspection.items.iter() {
        for item in new_items {
            items[category].push(LineItem {
                id: item.id,
                inspection_id: inspection.id,
                position: item.position,
                item_name: item.item_name.clone(),
                condition: item.condition,
                notes: item.notes.clone(),
                created_at: now,
            });

            for attachment in &item.attachments {
                let link = |c: Category| (attachment.category == c).then_some(attachment.line_item_id);
                documents.push(Document {
                    id: attachment.id,
                    url: attachment.url.clone(),
                    file_name: attachment.file_name.clone(),
                    mime_type: attachment.mime_type.clone(),
                    file_size: attachment.file_size,
                    description: Some(attachment.description.clone()),
                    metadata: Some(attachment.metadata.clone()),
                    inspection_id: Some(inspection.id),
                    exterior_inspection_id: link(Category::Exterior),
                    interior_inspection_id: link(Category::Interior),
                    mechanical_inspection_id: link(Category::Mechanical),
                    functional_inspection_id: link(Category::Functional),
                    document_legal_inspection_id: link(Category::DocumentLegal),
                    created_at: now,
                });
            }
        }
    }
}

#[async_trait]
impl InspectionRepository for InMemoryInspectionRepository {
    async fn resolve_equipment(&self, reference: &str) -> Result<Option<Uuid>> {
        let state = self.state.lock().unwrap();
        for lookup in lookup_order(reference) {
            let found = state.equipment.iter().find(|(id, chassis)| match lookup {
                EquipmentLookup::Id(wanted) => *id == wanted,
                EquipmentLookup::ChassisNumber(wanted) => chassis == wanted,
            });
            if let Some((id, _)) = found {
                return Ok(Some(*id));
            }
        }
        Ok(None)
    }

    async fn create(&self, inspection: &NewInspection) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if std::mem::take(&mut state.fail_next_create) {
            return Err(AppError::Internal("simulated write failure".to_string()));
        }
        state.inspections.push(StoredInspection {
            header: header_of(inspection),
            submitted: inspection.clone(),
        });
        Ok(())
    }

    async fn list(&self, filter: InspectionFilter) -> Result<Vec<InspectionRecord>> {
        let state = self.state.lock().unwrap();
        let mut matching: Vec<&StoredInspection> = state
            .inspections
            .iter()
            .filter(|s| match filter {
                InspectionFilter::All => true,
                InspectionFilter::Id(id) => s.header.id == id,
                InspectionFilter::Inspector(id) => s.header.inspector_id == id,
                InspectionFilter::Equipment(id) => s.header.equipment_id == id,
            })
            .collect();
        matching.sort_by(|a, b| {
            (b.header.performed_at, b.header.id).cmp(&(a.header.performed_at, a.header.id))
        });

        let mut items = ByCategory::default();
        let mut documents = Vec::new();
        for stored in &matching {
            rows_of(&stored.submitted, &mut items, &mut documents);
        }
        let headers = matching.iter().map(|s| s.header.clone()).collect();

        Ok(assemble_records(headers, items, documents))
    }

    async fn find_header(&self, id: Uuid) -> Result<Option<Inspection>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .inspections
            .iter()
            .find(|s| s.header.id == id)
            .map(|s| s.header.clone()))
    }

    async fn update_header(&self, id: Uuid, update: &HeaderUpdate) -> Result<Option<Inspection>> {
        let mut state = self.state.lock().unwrap();
        let Some(stored) = state.inspections.iter_mut().find(|s| s.header.id == id) else {
            return Ok(None);
        };
        if let Some(due) = update.next_due_date {
            stored.header.next_due_date = Some(due);
        }
        if let Some(notes) = &update.notes {
            stored.header.notes = Some(notes.clone());
        }
        stored.header.updated_at = Utc::now();
        Ok(Some(stored.header.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.inspections.len();
        state.inspections.retain(|s| s.header.id != id);
        Ok(state.inspections.len() < before)
    }
}
