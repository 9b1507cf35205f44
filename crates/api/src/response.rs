//! Shared response envelope for API handlers.
//!
//! All JSON responses use a `{ "data": ... }` envelope; handlers wrap
//! their payloads in [`DataResponse`] rather than building ad-hoc
//! `serde_json::json!` objects.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
