//! Handlers for the imported countries catalog.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use sheetport_db::repositories::CountryRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/countries
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let countries = CountryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: countries }))
}
