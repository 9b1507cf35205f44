use std::sync::Arc;

use sheetport_core::schema::ColumnRuleSet;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sheetport_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Column rules for the countries upload, validated at startup.
    pub rules: Arc<ColumnRuleSet>,
}
