//! Abstract persistence contract required by the import pipeline.
//!
//! The orchestrator only ever talks to storage through [`ImportStore`],
//! so the pipeline can be exercised against an in-memory implementation
//! and the API server can plug in the PostgreSQL-backed one.

use async_trait::async_trait;

use crate::country::NewCountry;
use crate::job::ImportJob;
use crate::types::DbId;

/// Why a storage operation failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// A stored record could not be mapped back into a domain type.
    #[error("corrupt stored record: {0}")]
    Corrupt(String),
}

/// Persistence operations the import pipeline depends on.
#[async_trait]
pub trait ImportStore: Send + Sync {
    /// Create a new job record and return its assigned id.
    async fn insert_job(&self, job: &ImportJob) -> Result<DbId, StoreError>;

    /// Full overwrite of an existing job record; used for the terminal
    /// state transition.
    async fn replace_job(&self, id: DbId, job: &ImportJob) -> Result<(), StoreError>;

    async fn find_job(&self, id: DbId) -> Result<Option<ImportJob>, StoreError>;

    /// Recent jobs ordered by start time descending.
    async fn list_recent_jobs(&self, limit: i64) -> Result<Vec<ImportJob>, StoreError>;

    /// Bulk insert of validated countries in a single transaction.
    /// Failures must surface as `Err`, never be swallowed.
    async fn insert_countries(&self, batch: &[NewCountry]) -> Result<(), StoreError>;
}
