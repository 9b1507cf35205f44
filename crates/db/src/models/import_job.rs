//! Database model for import job records.

use sheetport_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `import_jobs` table.
///
/// `status` and `errors` are stored in their wire representations
/// (status name string, JSONB error list); conversion to and from the
/// domain job type lives in the store implementation.
#[derive(Debug, Clone, FromRow)]
pub struct ImportJobRecord {
    pub id: DbId,
    pub file_name: String,
    pub status: String,
    pub total_rows: i32,
    pub success_count: i32,
    pub failure_count: i32,
    pub errors: serde_json::Value,
    pub submitted_by: String,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub original_file: Option<Vec<u8>>,
}
