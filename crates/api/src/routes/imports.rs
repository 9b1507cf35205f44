//! Route definitions for the `/imports` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::imports;
use crate::state::AppState;

/// Routes mounted at `/imports`.
///
/// ```text
/// GET  /              -> list
/// POST /              -> upload
/// GET  /template      -> template
/// GET  /{id}          -> get
/// GET  /{id}/report   -> report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(imports::list).post(imports::upload))
        .route("/template", get(imports::template))
        .route("/{id}", get(imports::get))
        .route("/{id}/report", get(imports::report))
}
