//! Route table for the API.
//!
//! Everything below is mounted under `/api/v1`:
//!
//! ```text
//! /imports                 submit upload (POST), list recent jobs (GET)
//! /imports/template        blank upload template download (GET)
//! /imports/{id}            get job (GET)
//! /imports/{id}/report     annotated error workbook download (GET)
//!
//! /countries               list imported countries (GET)
//! ```
//!
//! The health probe lives at root level, outside `/api/v1`.

use axum::Router;

use crate::state::AppState;

pub mod countries;
pub mod health;
pub mod imports;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Import pipeline: upload, jobs, reports, template.
        .nest("/imports", imports::router())
        // Imported countries catalog.
        .nest("/countries", countries::router())
}
