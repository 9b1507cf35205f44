//! Core domain logic for the sheetport import service.
//!
//! Everything in this crate is independent of HTTP and SQL: the column
//! schema, row validation and coercion, workbook access over in-memory
//! bytes, the import orchestration loop, and error-report generation.
//! Persistence is reached only through the [`store::ImportStore`] trait,
//! which the `sheetport-db` crate implements against PostgreSQL.

pub mod country;
pub mod import;
pub mod job;
pub mod report;
pub mod schema;
pub mod sheet;
pub mod store;
pub mod template;
pub mod types;
pub mod validate;
