//! Route definitions for the `/countries` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::countries;
use crate::state::AppState;

/// Routes mounted at `/countries`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(countries::list))
}
