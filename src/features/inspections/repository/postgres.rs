use async_trait::async_trait;
use futures::future::try_join_all;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{assemble_records, InspectionRepository};
use crate::core::error::{AppError, Result};
use crate::features::equipment::models::{lookup_order, EquipmentLookup};
use crate::features::inspections::models::{
    ByCategory, Category, Document, HeaderUpdate, Inspection, InspectionFilter, InspectionRecord,
    LineItem, NewAttachment, NewInspection, NewLineItem,
};

const INSPECTION_COLUMNS: &str =
    "id, equipment_id, inspector_id, performed_at, next_due_date, notes, created_at, updated_at";

const LINE_ITEM_COLUMNS: &str = "id, inspection_id, position, item_name, condition, notes, created_at";

const DOCUMENT_COLUMNS: &str = r#"
    id, url, file_name, mime_type, file_size, description, metadata, inspection_id,
    exterior_inspection_id, interior_inspection_id, mechanical_inspection_id,
    functional_inspection_id, document_legal_inspection_id, created_at
"#;

pub struct PgInspectionRepository {
    pool: PgPool,
}

impl PgInspectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_line_items(&self, category: Category, inspection_ids: &[Uuid]) -> Result<Vec<LineItem>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE inspection_id = ANY($1) ORDER BY inspection_id, position",
            LINE_ITEM_COLUMNS,
            category.spec().table
        );

        sqlx::query_as::<_, LineItem>(&sql)
            .bind(inspection_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load {} items: {:?}", category.name(), e);
                AppError::Database(e)
            })
    }

    async fn fetch_documents(&self, inspection_ids: &[Uuid]) -> Result<Vec<Document>> {
        let sql = format!(
            "SELECT {} FROM documents WHERE inspection_id = ANY($1) ORDER BY created_at, id",
            DOCUMENT_COLUMNS
        );

        let documents = sqlx::query_as::<_, Document>(&sql)
            .bind(inspection_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(documents)
    }

    /// Load line-items (all five tables concurrently) and documents for `headers`
    async fn load_records(&self, headers: Vec<Inspection>) -> Result<Vec<InspectionRecord>> {
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();

        let (item_sets, documents) = futures::try_join!(
            try_join_all(Category::ALL.map(|category| self.fetch_line_items(category, &ids))),
            self.fetch_documents(&ids),
        )?;

        let mut item_sets = item_sets.into_iter();
        let items = ByCategory::from_fn(|_| item_sets.next().unwrap_or_default());

        Ok(assemble_records(headers, items, documents))
    }
}

async fn insert_header(tx: &mut Transaction<'_, Postgres>, inspection: &NewInspection) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO inspections (id, equipment_id, inspector_id, performed_at, next_due_date, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(inspection.id)
    .bind(inspection.equipment_id)
    .bind(inspection.inspector_id)
    .bind(inspection.performed_at)
    .bind(inspection.next_due_date)
    .bind(&inspection.notes)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_line_item(
    tx: &mut Transaction<'_, Postgres>,
    category: Category,
    inspection_id: Uuid,
    item: &NewLineItem,
) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} (id, inspection_id, position, item_name, condition, notes) VALUES ($1, $2, $3, $4, $5, $6)",
        category.spec().table
    );

    sqlx::query(&sql)
        .bind(item.id)
        .bind(inspection_id)
        .bind(item.position)
        .bind(&item.item_name)
        .bind(item.condition)
        .bind(&item.notes)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

async fn insert_attachment(
    tx: &mut Transaction<'_, Postgres>,
    inspection_id: Uuid,
    attachment: &NewAttachment,
) -> Result<()> {
    let sql = format!(
        r#"
        INSERT INTO documents
            (id, url, file_name, mime_type, file_size, description, metadata, inspection_id, {})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
        attachment.category.spec().link_column
    );

    sqlx::query(&sql)
        .bind(attachment.id)
        .bind(&attachment.url)
        .bind(&attachment.file_name)
        .bind(&attachment.mime_type)
        .bind(attachment.file_size)
        .bind(&attachment.description)
        .bind(&attachment.metadata)
        .bind(inspection_id)
        .bind(attachment.line_item_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

#[async_trait]
impl InspectionRepository for PgInspectionRepository {
    async fn resolve_equipment(&self, reference: &str) -> Result<Option<Uuid>> {
        for lookup in lookup_order(reference) {
            let found: Option<(Uuid,)> = match lookup {
                EquipmentLookup::Id(id) => {
                    sqlx::query_as("SELECT id FROM equipment WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&self.pool)
                        .await?
                }
                EquipmentLookup::ChassisNumber(chassis) => {
                    sqlx::query_as("SELECT id FROM equipment WHERE chassis_number = $1")
                        .bind(chassis)
                        .fetch_optional(&self.pool)
                        .await?
                }
            };

            if let Some((id,)) = found {
                return Ok(Some(id));
            }
        }

        Ok(None)
    }

    async fn create(&self, inspection: &NewInspection) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        insert_header(&mut tx, inspection).await?;

        for (category, items) in inspection.items.iter() {
            for item in items {
                insert_line_item(&mut tx, category, inspection.id, item).await?;
                for attachment in &item.attachments {
                    insert_attachment(&mut tx, inspection.id, attachment).await?;
                }
            }
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit inspection {}: {:?}", inspection.id, e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn list(&self, filter: InspectionFilter) -> Result<Vec<InspectionRecord>> {
        let (clause, bound) = match filter {
            InspectionFilter::All => ("", None),
            InspectionFilter::Id(id) => ("WHERE id = $1", Some(id)),
            InspectionFilter::Inspector(id) => ("WHERE inspector_id = $1", Some(id)),
            InspectionFilter::Equipment(id) => ("WHERE equipment_id = $1", Some(id)),
        };

        let sql = format!(
            "SELECT {} FROM inspections {} ORDER BY performed_at DESC, id DESC",
            INSPECTION_COLUMNS, clause
        );

        let mut query = sqlx::query_as::<_, Inspection>(&sql);
        if let Some(id) = bound {
            query = query.bind(id);
        }

        let headers = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to list inspections: {:?}", e);
            AppError::Database(e)
        })?;

        self.load_records(headers).await
    }

    async fn find_header(&self, id: Uuid) -> Result<Option<Inspection>> {
        let sql = format!("SELECT {} FROM inspections WHERE id = $1", INSPECTION_COLUMNS);
        let header = sqlx::query_as::<_, Inspection>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(header)
    }

    async fn update_header(&self, id: Uuid, update: &HeaderUpdate) -> Result<Option<Inspection>> {
        let sql = format!(
            r#"
            UPDATE inspections
            SET next_due_date = COALESCE($2, next_due_date),
                notes = COALESCE($3, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            INSPECTION_COLUMNS
        );

        let header = sqlx::query_as::<_, Inspection>(&sql)
            .bind(id)
            .bind(update.next_due_date)
            .bind(&update.notes)
            .fetch_optional(&self.pool)
            .await?;

        Ok(header)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM inspections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
