//! Handlers for `run`, `scrape`, and `analyze`.

use serde_json::json;
use tabled::Tabled;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use crate::adapter::inbound::cli::command::{AnalyzeArgs, RunArgs, ScrapeArgs};
use crate::adapter::inbound::cli::context::GlobalArgs;
use crate::adapter::inbound::cli::output;
use crate::application::alert::AlertGenerator;
use crate::application::scheduler::CycleReport;
use crate::domain::Alert;
use crate::error::{FeedError, Result};
use crate::infrastructure::bootstrap::{build_ingest, build_scheduler};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::persistence::build_store;
use crate::port::outbound::store::AlertStore;

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
}

fn require_api_key(config: &Config) -> Result<()> {
    if config.api_key.is_none() {
        return Err(FeedError::MissingApiKey.into());
    }
    Ok(())
}

fn print_cycle(report: &CycleReport) {
    if output::is_json() {
        output::json_output(json!({
            "command": "run",
            "sports_synced": report.sports_synced,
            "records_scraped": report.records_scraped,
            "failed_sports": report.failed_sports,
            "analysis": report.analysis,
        }));
        return;
    }

    output::section("Cycle");
    match report.sports_synced {
        Some(count) => output::field("Sports", count),
        None => output::warning("Sports sync failed"),
    }
    output::field("Records", report.records_scraped);
    for sport in &report.failed_sports {
        output::warning(&format!("Scrape failed for {sport}"));
    }
    match report.analysis {
        Some(analysis) => {
            output::field("Events", analysis.events_scanned);
            output::field("Alerts", analysis.total_alerts());
        }
        None => output::warning("Analysis failed"),
    }
}

/// Execute `run`.
pub async fn execute_run(global: &GlobalArgs, args: &RunArgs) -> Result<()> {
    let config = global.load_config()?;
    require_api_key(&config)?;
    let scheduler = build_scheduler(&config)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Database", &config.database);
    output::field("Sports", config.feed.sports.join(", "));
    output::field("Interval", format!("{}s", config.scheduler.interval_secs));

    if args.once {
        let report = scheduler.run_cycle().await;
        print_cycle(&report);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received (Ctrl+C)");
            let _ = shutdown_tx.send(true);
        }
    });

    scheduler.run(shutdown_rx).await;
    info!("sharpline stopped");
    Ok(())
}

/// Execute `scrape`.
pub async fn execute_scrape(global: &GlobalArgs, args: &ScrapeArgs) -> Result<()> {
    let config = global.load_config()?;
    require_api_key(&config)?;
    let ingest = build_ingest(&config)?;

    let sports = match &args.sport {
        Some(sport) => vec![sport.clone()],
        None => config.feed.sports.clone(),
    };

    let mut results = Vec::with_capacity(sports.len());
    let mut failed = 0;
    for sport in &sports {
        match ingest.scrape_odds(sport).await {
            Ok(summary) => {
                output::success(&format!(
                    "{sport}: {} records across {} events",
                    summary.records, summary.events
                ));
                if summary.rejected > 0 {
                    output::warning(&format!("{sport}: rejected {} quotes", summary.rejected));
                }
                results.push(json!({
                    "sport": sport,
                    "events": summary.events,
                    "records": summary.records,
                    "rejected": summary.rejected,
                }));
            }
            Err(e) => {
                output::error(&format!("{sport}: {e}"));
                results.push(json!({ "sport": sport, "error": e.to_string() }));
                failed += 1;
            }
        }
    }

    if output::is_json() {
        output::json_output(json!({ "command": "scrape", "results": results }));
    }
    if !sports.is_empty() && failed == sports.len() {
        return Err(FeedError::AllSportsFailed { count: failed }.into());
    }
    Ok(())
}

/// Execute `analyze`.
pub async fn execute_analyze(global: &GlobalArgs, args: &AnalyzeArgs) -> Result<()> {
    let config = global.load_config()?;
    let store = build_store(&config)?;

    let generator = AlertGenerator::new(store.as_ref(), &config.analysis);
    let pass = generator.run_pass().await?;
    let stored = if args.dry_run {
        0
    } else {
        store.append_alerts(&pass.alerts).await?
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "analyze",
            "dry_run": args.dry_run,
            "stored": stored,
            "report": pass.report,
            "alerts": pass.alerts,
        }));
        return Ok(());
    }

    output::section("Analysis");
    output::field("Events", pass.report.events_scanned);
    output::field("Arbitrage", pass.report.arbitrage_alerts);
    output::field("Value bets", pass.report.value_alerts);
    output::field("Movements", pass.report.movement_alerts);

    if !pass.alerts.is_empty() {
        output::table(pass.alerts.iter().map(alert_row).collect());
    }
    if args.dry_run {
        output::note("Dry run: no alerts stored");
    } else {
        output::success(&format!("Stored {stored} alerts"));
    }
    Ok(())
}

fn alert_row(alert: &Alert) -> AlertRow {
    AlertRow {
        kind: alert.kind.to_string(),
        title: alert.title.clone(),
    }
}
