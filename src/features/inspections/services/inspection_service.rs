use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{FormPayload, UploadedFile};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::inspections::dtos::{InspectionResponseDto, UpdateInspectionDto};
use crate::features::inspections::models::{
    Category, HeaderUpdate, InspectionFilter, NewAttachment, NewInspection, NewLineItem,
};
use crate::features::inspections::repository::InspectionRepository;
use crate::features::inspections::services::matcher::{
    attachment_description, attachment_metadata, match_attachments, storage_key,
    unmatched_field_names,
};
use crate::features::inspections::services::normalizer::{normalize, parse_date, NEXT_DUE_DATE_FIELD};
use crate::modules::storage::{StorageBackend, StoreRequest, StoredFile};
use crate::shared::constants::{
    is_mime_type_allowed, MAX_FILES_PER_SUBMISSION, MAX_FILE_NAME_LENGTH, MAX_FILE_SIZE,
};
use crate::shared::types::FieldError;

/// A matched upload: category, line-item index, file
type Upload<'a> = (Category, usize, &'a UploadedFile);

/// Inspection intake and retrieval
pub struct InspectionService {
    repository: Arc<dyn InspectionRepository>,
    storage: Arc<dyn StorageBackend>,
}

impl InspectionService {
    pub fn new(repository: Arc<dyn InspectionRepository>, storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Record a submitted inspection for `inspector` and return its id.
    ///
    /// Matched files are stored before the transaction opens; if anything after
    /// that fails the stored files are removed again.
    pub async fn create(&self, inspector: &AuthenticatedUser, payload: FormPayload) -> Result<Uuid> {
        let FormPayload { fields, files } = payload;

        let submission = normalize(fields)?.into_submission()?;

        if files.len() > MAX_FILES_PER_SUBMISSION {
            return Err(AppError::BadRequest(format!(
                "At most {} files may be attached to one inspection",
                MAX_FILES_PER_SUBMISSION
            )));
        }

        let equipment_id = self
            .repository
            .resolve_equipment(&submission.equipment_ref)
            .await?
            .ok_or_else(|| AppError::BadRequest("Equipment not found".to_string()))?;

        let matched = match_attachments(&submission.items, &files);
        let unmatched = unmatched_field_names(&matched, &files);
        if !unmatched.is_empty() {
            debug!(fields = ?unmatched, "Ignoring uploads that name no line-item");
        }

        let uploads: Vec<Upload<'_>> = matched
            .iter()
            .flat_map(|(category, per_item)| {
                per_item.iter().enumerate().flat_map(move |(index, files)| {
                    files.iter().map(move |file| (category, index, *file))
                })
            })
            .collect();

        let file_errors: Vec<FieldError> = uploads.iter().filter_map(|(_, _, f)| check_file(f)).collect();
        if !file_errors.is_empty() {
            return Err(AppError::Validation(file_errors));
        }

        let inspection_id = Uuid::now_v7();
        let stored = self.store_uploads(inspection_id, &uploads).await?;

        let mut items = submission.items.map(|_, inputs| {
            inputs
                .into_iter()
                .enumerate()
                .map(|(position, input)| NewLineItem {
                    id: Uuid::now_v7(),
                    position: position as i32,
                    item_name: input.item_name,
                    condition: input.condition,
                    notes: input.notes,
                    attachments: Vec::new(),
                })
                .collect::<Vec<_>>()
        });

        for ((category, index, file), stored_file) in uploads.iter().zip(stored.iter()) {
            let item = &mut items[*category][*index];
            item.attachments.push(NewAttachment {
                id: Uuid::now_v7(),
                url: stored_file.url.clone(),
                file_name: stored_file.name.clone(),
                mime_type: stored_file.mime_type.clone(),
                file_size: stored_file.size,
                description: attachment_description(*category, &item.item_name),
                metadata: attachment_metadata(*category, *index, &item.item_name, &file.field_name),
                category: *category,
                line_item_id: item.id,
            });
        }

        let inspection = NewInspection {
            id: inspection_id,
            equipment_id,
            inspector_id: inspector.id,
            performed_at: Utc::now(),
            next_due_date: submission.next_due_date,
            notes: submission.notes,
            items,
        };

        if let Err(e) = self.repository.create(&inspection).await {
            self.discard_stored(&stored).await;
            return Err(e);
        }

        info!(
            inspection_id = %inspection.id,
            equipment_id = %equipment_id,
            inspector_id = %inspector.id,
            items = inspection.items.iter().map(|(_, items)| items.len()).sum::<usize>(),
            attachments = inspection.attachments().count(),
            "Inspection created"
        );

        Ok(inspection.id)
    }

    /// Store every matched upload concurrently. On any failure the files that
    /// did land are removed and the first error is returned.
    async fn store_uploads(&self, inspection_id: Uuid, uploads: &[Upload<'_>]) -> Result<Vec<StoredFile>> {
        let results = join_all(uploads.iter().map(|(category, _, file)| {
            self.storage.store(StoreRequest {
                key: storage_key(inspection_id, *category, &file.content_type),
                file_name: file.file_name.clone(),
                content_type: file.content_type.clone(),
                data: file.data.clone(),
            })
        }))
        .await;

        let mut stored = Vec::with_capacity(results.len());
        let mut failure = None;
        for result in results {
            match result {
                Ok(file) => stored.push(file),
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }

        if let Some(e) = failure {
            self.discard_stored(&stored).await;
            return Err(e);
        }

        debug!(
            count = stored.len(),
            backend = self.storage.name(),
            "Stored inspection attachments"
        );
        Ok(stored)
    }

    async fn discard_stored(&self, files: &[StoredFile]) {
        let results = join_all(files.iter().map(|f| self.storage.delete(&f.url))).await;
        for (file, result) in files.iter().zip(results) {
            if let Err(e) = result {
                warn!(url = %file.url, "Failed to remove orphaned upload: {}", e);
            }
        }
    }

    /// Administrators see every inspection, everyone else only their own
    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<InspectionResponseDto>> {
        let filter = if user.has_admin_access() {
            InspectionFilter::All
        } else {
            InspectionFilter::Inspector(user.id)
        };

        let records = self.repository.list(filter).await?;
        Ok(records.into_iter().map(InspectionResponseDto::from).collect())
    }

    pub async fn list_for_equipment(&self, equipment_id: Uuid) -> Result<Vec<InspectionResponseDto>> {
        let records = self
            .repository
            .list(InspectionFilter::Equipment(equipment_id))
            .await?;

        if records.is_empty() {
            return Err(AppError::BadRequest(
                "No inspections found for this equipment".to_string(),
            ));
        }

        Ok(records.into_iter().map(InspectionResponseDto::from).collect())
    }

    /// Change next-due date and notes. Administrators or the recording inspector only.
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateInspectionDto,
    ) -> Result<InspectionResponseDto> {
        let next_due_date = match dto.next_due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw).ok_or_else(|| {
                AppError::validation(
                    NEXT_DUE_DATE_FIELD,
                    "must be an RFC 3339 timestamp or YYYY-MM-DD date",
                )
            })?),
        };

        let header = self
            .repository
            .find_header(id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Inspection not found".to_string()))?;

        if !user.has_admin_access() && header.inspector_id != user.id {
            return Err(AppError::Unauthorized(
                "Only the recording inspector or an administrator may update this inspection"
                    .to_string(),
            ));
        }

        let update = HeaderUpdate {
            next_due_date,
            notes: dto.notes,
        };
        self.repository
            .update_header(id, &update)
            .await?
            .ok_or_else(|| AppError::BadRequest("Inspection not found".to_string()))?;

        info!(inspection_id = %id, user_id = %user.id, "Inspection updated");

        self.repository
            .list(InspectionFilter::Id(id))
            .await?
            .into_iter()
            .next()
            .map(InspectionResponseDto::from)
            .ok_or_else(|| AppError::BadRequest("Inspection not found".to_string()))
    }

    /// Delete an inspection and its line-items. Attachments stay, un-linked.
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(AppError::BadRequest("Inspection not found".to_string()));
        }

        info!(inspection_id = %id, user_id = %user.id, "Inspection deleted");
        Ok(())
    }
}

fn check_file(file: &UploadedFile) -> Option<FieldError> {
    let message = if !is_mime_type_allowed(&file.content_type) {
        format!("file type '{}' is not allowed", file.content_type)
    } else if file.file_name.trim().is_empty() {
        "file name is empty".to_string()
    } else if file.file_name.chars().count() > MAX_FILE_NAME_LENGTH {
        format!("file name exceeds {} characters", MAX_FILE_NAME_LENGTH)
    } else if file.size() == 0 {
        "file is empty".to_string()
    } else if file.size() > MAX_FILE_SIZE {
        format!("file exceeds the {} MB limit", MAX_FILE_SIZE / (1024 * 1024))
    } else {
        return None;
    };

    Some(FieldError::new(file.field_name.clone(), message))
}
