//! Repository for import job records.

use sheetport_core::types::DbId;
use sqlx::PgPool;

use crate::models::import_job::ImportJobRecord;

/// Column list for `import_jobs`.
const COLUMNS: &str = "id, file_name, status, total_rows, success_count, failure_count, \
     errors, submitted_by, started_at, completed_at, original_file";

/// Provides CRUD operations for import jobs.
pub struct ImportJobRepo;

impl ImportJobRepo {
    /// Insert a new job record and return its assigned id.
    pub async fn insert(pool: &PgPool, record: &ImportJobRecord) -> Result<DbId, sqlx::Error> {
        let sql = "INSERT INTO import_jobs \
                (file_name, status, total_rows, success_count, failure_count, \
                 errors, submitted_by, started_at, completed_at, original_file) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id";
        sqlx::query_scalar::<_, DbId>(sql)
            .bind(&record.file_name)
            .bind(&record.status)
            .bind(record.total_rows)
            .bind(record.success_count)
            .bind(record.failure_count)
            .bind(&record.errors)
            .bind(&record.submitted_by)
            .bind(record.started_at)
            .bind(record.completed_at)
            .bind(&record.original_file)
            .fetch_one(pool)
            .await
    }

    /// Full overwrite of an existing job record by id.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        record: &ImportJobRecord,
    ) -> Result<u64, sqlx::Error> {
        let sql = "UPDATE import_jobs SET \
                file_name = $2, \
                status = $3, \
                total_rows = $4, \
                success_count = $5, \
                failure_count = $6, \
                errors = $7, \
                submitted_by = $8, \
                started_at = $9, \
                completed_at = $10, \
                original_file = $11 \
             WHERE id = $1";
        let result = sqlx::query(sql)
            .bind(id)
            .bind(&record.file_name)
            .bind(&record.status)
            .bind(record.total_rows)
            .bind(record.success_count)
            .bind(record.failure_count)
            .bind(&record.errors)
            .bind(&record.submitted_by)
            .bind(record.started_at)
            .bind(record.completed_at)
            .bind(&record.original_file)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Find a job by its id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ImportJobRecord>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM import_jobs WHERE id = $1");
        sqlx::query_as::<_, ImportJobRecord>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the most recent jobs, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<ImportJobRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM import_jobs ORDER BY started_at DESC LIMIT $1"
        );
        sqlx::query_as::<_, ImportJobRecord>(&sql)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
