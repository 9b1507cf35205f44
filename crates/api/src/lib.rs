//! Sheetport API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes)
//! so the binary entrypoint stays a thin bootstrap.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
