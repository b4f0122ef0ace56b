//! Periodic sync, scrape, and analyze cycle.
//!
//! Each stage logs its own failure and the cycle carries on, so a broken
//! sport or a flaky catalog call never blocks analysis or the next tick.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::alert::{AlertGenerator, AnalysisConfig, AnalysisReport};
use super::ingest::IngestService;
use crate::port::outbound::store::{AlertStore, IngestStore, OddsStore};

/// Cycle timing (`[scheduler]`).
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Hours after commence time before an event is marked completed.
    #[serde(default = "default_completion_grace_hours")]
    pub completion_grace_hours: u32,
}

const fn default_interval_secs() -> u64 {
    300
}

const fn default_completion_grace_hours() -> u32 {
    6
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            completion_grace_hours: default_completion_grace_hours(),
        }
    }
}

/// Outcome of one cycle. Failed stages are counted, never raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub sports_synced: Option<usize>,
    pub records_scraped: usize,
    pub failed_sports: Vec<String>,
    pub analysis: Option<AnalysisReport>,
}

/// Drives ingestion and analysis on a fixed interval.
pub struct Scheduler<S> {
    ingest: IngestService<S>,
    store: Arc<S>,
    sports: Vec<String>,
    analysis: AnalysisConfig,
    config: SchedulerConfig,
}

impl<S> Scheduler<S>
where
    S: OddsStore + AlertStore + IngestStore,
{
    pub fn new(
        ingest: IngestService<S>,
        store: Arc<S>,
        sports: Vec<String>,
        analysis: AnalysisConfig,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            ingest,
            store,
            sports,
            analysis,
            config,
        }
    }

    /// Run one full cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        match self.ingest.sync_sports().await {
            Ok(count) => report.sports_synced = Some(count),
            Err(e) => error!(error = %e, "Failed to sync sports"),
        }
        let grace = chrono::Duration::hours(i64::from(self.config.completion_grace_hours));
        if let Err(e) = self.ingest.complete_stale_events(grace).await {
            error!(error = %e, "Failed to complete stale events");
        }

        for sport in &self.sports {
            match self.ingest.scrape_odds(sport).await {
                Ok(summary) => report.records_scraped += summary.records,
                Err(e) => {
                    error!(sport = %sport, error = %e, "Failed to scrape sport");
                    report.failed_sports.push(sport.clone());
                }
            }
        }

        let generator = AlertGenerator::new(self.store.as_ref(), &self.analysis);
        match generator.analyze_and_commit().await {
            Ok(analysis) => report.analysis = Some(analysis),
            Err(e) => error!(error = %e, "Failed to run analysis"),
        }

        report
    }

    /// Run cycles until `shutdown` flips to true or its sender drops.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.config.interval_secs));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            interval_secs = self.config.interval_secs,
            sports = self.sports.len(),
            "Scheduler started"
        );

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    match result {
                        Ok(()) => {
                            if *shutdown.borrow() {
                                info!("Shutdown signal received");
                                break;
                            }
                        }
                        Err(_) => {
                            warn!("Shutdown channel closed");
                            break;
                        }
                    }
                }
                _ = interval.tick() => {
                    let report = self.run_cycle().await;
                    info!(
                        records = report.records_scraped,
                        failed_sports = report.failed_sports.len(),
                        alerts = report.analysis.map_or(0, |a| a.total_alerts()),
                        "Cycle complete"
                    );
                }
            }
        }

        info!("Scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_config_defaults() {
        let config: SchedulerConfig = toml::from_str("").unwrap();
        assert_eq!(config.interval_secs, 300);
        assert_eq!(config.completion_grace_hours, 6);
    }

    #[test]
    fn scheduler_config_overrides() {
        let config: SchedulerConfig = toml::from_str("interval_secs = 60").unwrap();
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.completion_grace_hours, 6);
    }
}
