//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::sqlite::store::SqliteStore;
use crate::application::ingest::IngestService;
use crate::application::scheduler::Scheduler;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::{feed::build_feed, persistence::build_store};

/// Wire the store, feed, and services into a ready scheduler.
pub fn build_scheduler(config: &Config) -> Result<Scheduler<SqliteStore>> {
    let store = build_store(config)?;
    let feed = build_feed(config);
    info!(feed = feed.feed_name(), database = %config.database, "Runtime wired");

    let ingest = IngestService::new(feed, Arc::clone(&store));
    Ok(Scheduler::new(
        ingest,
        store,
        config.feed.sports.clone(),
        config.analysis.clone(),
        config.scheduler.clone(),
    ))
}

/// Wire an ingestion service for one-off scrapes.
pub fn build_ingest(config: &Config) -> Result<IngestService<SqliteStore>> {
    let store = build_store(config)?;
    Ok(IngestService::new(build_feed(config), store))
}
