//! PostgreSQL-backed implementation of the core persistence contract.

use async_trait::async_trait;
use sqlx::PgPool;

use sheetport_core::country::NewCountry;
use sheetport_core::job::{ImportJob, ImportStatus};
use sheetport_core::store::{ImportStore, StoreError};
use sheetport_core::types::DbId;
use sheetport_core::validate::FieldError;

use crate::models::import_job::ImportJobRecord;
use crate::repositories::{CountryRepo, ImportJobRepo};

/// [`ImportStore`] over a sqlx connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportStore for PgStore {
    async fn insert_job(&self, job: &ImportJob) -> Result<DbId, StoreError> {
        let record = to_record(job)?;
        ImportJobRepo::insert(&self.pool, &record).await.map_err(backend)
    }

    async fn replace_job(&self, id: DbId, job: &ImportJob) -> Result<(), StoreError> {
        let record = to_record(job)?;
        let replaced = ImportJobRepo::replace(&self.pool, id, &record).await.map_err(backend)?;
        if replaced == 0 {
            return Err(StoreError::Backend(format!("import job {id} does not exist")));
        }
        Ok(())
    }

    async fn find_job(&self, id: DbId) -> Result<Option<ImportJob>, StoreError> {
        let record = ImportJobRepo::find_by_id(&self.pool, id).await.map_err(backend)?;
        record.map(into_job).transpose()
    }

    async fn list_recent_jobs(&self, limit: i64) -> Result<Vec<ImportJob>, StoreError> {
        let records = ImportJobRepo::list_recent(&self.pool, limit).await.map_err(backend)?;
        records.into_iter().map(into_job).collect()
    }

    async fn insert_countries(&self, batch: &[NewCountry]) -> Result<(), StoreError> {
        CountryRepo::insert_batch(&self.pool, batch).await.map_err(backend)?;
        Ok(())
    }
}

fn backend(error: sqlx::Error) -> StoreError {
    StoreError::Backend(error.to_string())
}

/// Map a domain job onto its stored representation.
fn to_record(job: &ImportJob) -> Result<ImportJobRecord, StoreError> {
    let errors = serde_json::to_value(&job.errors)
        .map_err(|e| StoreError::Backend(format!("failed to serialize job errors: {e}")))?;
    Ok(ImportJobRecord {
        id: job.id,
        file_name: job.file_name.clone(),
        status: job.status.as_str().to_string(),
        total_rows: job.total_rows as i32,
        success_count: job.success_count as i32,
        failure_count: job.failure_count as i32,
        errors,
        submitted_by: job.submitted_by.clone(),
        started_at: job.started_at,
        completed_at: job.completed_at,
        original_file: job.original_file.clone(),
    })
}

/// Map a stored record back into the domain job.
fn into_job(record: ImportJobRecord) -> Result<ImportJob, StoreError> {
    let status = ImportStatus::from_str(&record.status)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown import status '{}'", record.status)))?;
    let errors: Vec<FieldError> = serde_json::from_value(record.errors)
        .map_err(|e| StoreError::Corrupt(format!("unreadable job error list: {e}")))?;
    Ok(ImportJob {
        id: record.id,
        file_name: record.file_name,
        status,
        total_rows: record.total_rows as u32,
        success_count: record.success_count as u32,
        failure_count: record.failure_count as u32,
        errors,
        submitted_by: record.submitted_by,
        started_at: record.started_at,
        completed_at: record.completed_at,
        original_file: record.original_file,
    })
}
