//! Durable import job records.
//!
//! A job is created in `Running` state before any row is processed and
//! transitions exactly once to `Completed` or `Failed`. A job found in
//! `Running` state long after its start time was abandoned mid-import
//! (process crash or cancellation) and should be treated as incomplete.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};
use crate::validate::FieldError;

/// Lifecycle state of an import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl ImportStatus {
    /// Return the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parse a status string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// All valid status values.
    pub const ALL: &'static [&'static str] = &["pending", "running", "completed", "failed"];
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable record of one import attempt's lifecycle and outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ImportJob {
    pub id: DbId,
    pub file_name: String,
    pub status: ImportStatus,
    /// Number of data rows in the uploaded sheet (everything after the header).
    pub total_rows: u32,
    /// Rows that validated. On a failed job these were counted but never persisted.
    pub success_count: u32,
    /// Distinct rows that produced at least one field error.
    pub failure_count: u32,
    pub errors: Vec<FieldError>,
    pub submitted_by: String,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    /// Original uploaded workbook bytes, kept for later error annotation.
    /// Stored with the job but never serialized into API payloads.
    #[serde(skip_serializing)]
    pub original_file: Option<Vec<u8>>,
}
