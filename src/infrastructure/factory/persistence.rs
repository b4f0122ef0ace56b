//! Persistence factory for the SQLite store.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::sqlite::database::connection::open;
use crate::adapter::outbound::sqlite::store::SqliteStore;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Open the configured database, migrate it, and wrap it in a store.
pub fn build_store(config: &Config) -> Result<Arc<SqliteStore>> {
    let pool = open(&config.database)?;
    debug!(database = %config.database, "Opened database");
    Ok(Arc::new(SqliteStore::new(pool)))
}
