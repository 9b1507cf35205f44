//! Handlers for the spreadsheet import pipeline: upload, job lookup,
//! error-report download, and the blank template.

use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::Json;

use sheetport_core::import::run_import;
use sheetport_core::report::{annotated_report, FileDownload};
use sheetport_core::store::ImportStore;
use sheetport_core::template::countries_template;
use sheetport_core::types::DbId;
use sheetport_db::store::PgStore;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum number of jobs returned by the listing endpoint.
const RECENT_JOBS_LIMIT: i64 = 20;

/// Stand-in submitter until authentication is wired up.
const SUBMITTED_BY: &str = "system-user";

// ── Upload ───────────────────────────────────────────────────────────

/// POST /api/v1/imports
///
/// Accept a multipart upload (`file` part), run the import pipeline,
/// and return the terminal job.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut file_part: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.xlsx").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file_part = Some((file_name, data.to_vec()));
        break;
    }

    let (file_name, bytes) = file_part.filter(|(_, bytes)| !bytes.is_empty()).ok_or_else(|| {
        AppError::BadRequest("File 'file' is required and cannot be empty.".to_string())
    })?;

    tracing::info!(file_name = %file_name, size = bytes.len(), "import upload received");

    let store = PgStore::new(state.pool.clone());
    let job = run_import(&store, &state.rules, &file_name, bytes, SUBMITTED_BY).await?;

    Ok(Json(DataResponse { data: job }))
}

// ── Job lookup ───────────────────────────────────────────────────────

/// GET /api/v1/imports
///
/// Recent import jobs, newest first.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let store = PgStore::new(state.pool.clone());
    let jobs = store.list_recent_jobs(RECENT_JOBS_LIMIT).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/imports/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let store = PgStore::new(state.pool.clone());
    let job = store
        .find_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Import job '{id}' not found.")))?;
    Ok(Json(DataResponse { data: job }))
}

// ── Downloads ────────────────────────────────────────────────────────

/// GET /api/v1/imports/{id}/report
///
/// Download the original workbook annotated with a per-row `Status`
/// column. Rejected for jobs with no recorded errors.
pub async fn report(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let store = PgStore::new(state.pool.clone());
    let job = store
        .find_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Import job '{id}' not found.")))?;

    if job.errors.is_empty() {
        return Err(AppError::BadRequest(
            "This import job has no recorded errors.".to_string(),
        ));
    }

    let download = annotated_report(&job)?;
    Ok(file_response(download))
}

/// GET /api/v1/imports/template
///
/// Download a blank countries upload template.
pub async fn template(State(_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let download = countries_template().map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(file_response(download))
}

/// Build an attachment response from a generated file.
fn file_response(download: FileDownload) -> axum::response::Response {
    axum::response::Response::builder()
        .status(200)
        .header("Content-Type", download.content_type)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", download.file_name),
        )
        .body(axum::body::Body::from(download.bytes))
        .unwrap()
        .into_response()
}
