//! Database model for imported countries.

use serde::Serialize;
use sheetport_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `countries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Country {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub start_date: chrono::NaiveDate,
    pub created_by: String,
    pub created_at: Timestamp,
}
