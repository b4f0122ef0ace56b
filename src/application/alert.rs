//! Analysis pass: turn the latest stored odds into alerts.
//!
//! For every active event the newest observation per
//! `(bookmaker, market, outcome)` is kept, grouped by market type, and run
//! through the arbitrage and value detectors. Optionally each price series
//! is also checked for a fresh line movement.
//!
//! The generator only stages alerts. Committing them is the caller's call,
//! through [`AlertStore::append_alerts`], which writes a whole pass in one
//! transaction. Movement alerts already on record are not raised again, so a
//! pass over unchanged odds stays quiet.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::arbitrage::OddsByOutcome;
use crate::domain::value::{OddsByBookmaker, DEFAULT_SHARP_BOOKS};
use crate::domain::{
    detect_line_movements, find_arbitrage, find_value_bets, Alert, AlertKind, Bookmaker,
    BookmakerId, BookmakerKey, Event, LineKey, OddsRecord, OddsSnapshot, PricePoint, SharpBooks,
};
use crate::error::Result;
use crate::port::outbound::store::{AlertStore, HistoryFilter, OddsStore};

/// Thresholds and reference books for analysis passes (`[analysis]`).
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum arbitrage profit percentage to alert on.
    #[serde(default = "default_min_profit_pct")]
    pub min_profit_pct: Decimal,
    /// Minimum value-bet edge percentage to alert on.
    #[serde(default = "default_min_edge_pct")]
    pub min_edge_pct: Decimal,
    /// Minimum absolute price change percentage for a movement alert.
    #[serde(default = "default_min_movement_pct")]
    pub min_movement_pct: Decimal,
    /// Sharp bookmakers in reference priority order.
    #[serde(default = "default_sharp_books")]
    pub sharp_books: Vec<String>,
    /// Raise alerts for fresh line movements.
    #[serde(default = "default_true")]
    pub movement_alerts: bool,
}

fn default_min_profit_pct() -> Decimal {
    Decimal::new(5, 1)
}

fn default_min_edge_pct() -> Decimal {
    Decimal::new(3, 0)
}

fn default_min_movement_pct() -> Decimal {
    crate::domain::movement::DEFAULT_MIN_MOVEMENT_PCT
}

fn default_sharp_books() -> Vec<String> {
    DEFAULT_SHARP_BOOKS.iter().map(|s| (*s).to_string()).collect()
}

const fn default_true() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_profit_pct: default_min_profit_pct(),
            min_edge_pct: default_min_edge_pct(),
            min_movement_pct: default_min_movement_pct(),
            sharp_books: default_sharp_books(),
            movement_alerts: true,
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn sharp_books(&self) -> SharpBooks {
        SharpBooks::new(self.sharp_books.iter().map(String::as_str))
    }
}

/// Counts from one analysis pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub events_scanned: usize,
    pub arbitrage_alerts: usize,
    pub value_alerts: usize,
    pub movement_alerts: usize,
}

impl AnalysisReport {
    #[must_use]
    pub const fn total_alerts(&self) -> usize {
        self.arbitrage_alerts + self.value_alerts + self.movement_alerts
    }
}

/// Staged output of a pass: alerts not yet committed, plus counts.
#[derive(Debug, Clone)]
pub struct AnalysisPass {
    pub alerts: Vec<Alert>,
    pub report: AnalysisReport,
}

/// One market's latest prices, in both detector shapes.
#[derive(Debug, Default)]
struct MarketView {
    by_outcome: OddsByOutcome,
    by_bookmaker: OddsByBookmaker,
}

/// Bookmaker registry indexed for lookups during a pass.
struct Registry<'a> {
    by_id: HashMap<&'a BookmakerId, &'a Bookmaker>,
    names: HashMap<BookmakerKey, String>,
}

impl<'a> Registry<'a> {
    fn new(bookmakers: &'a [Bookmaker]) -> Self {
        Self {
            by_id: bookmakers.iter().map(|b| (&b.id, b)).collect(),
            names: bookmakers
                .iter()
                .map(|b| (b.key.clone(), b.name.clone()))
                .collect(),
        }
    }

    fn get(&self, id: &BookmakerId) -> Option<&'a Bookmaker> {
        self.by_id.get(id).copied()
    }
}

/// Keep the first occurrence of each `(bookmaker, market, outcome)` in a
/// newest-first scan, i.e. the most recent observation of each series.
#[must_use]
pub fn latest_per_series(newest_first: Vec<OddsRecord>) -> Vec<OddsRecord> {
    let mut seen: HashSet<(BookmakerId, String, String)> = HashSet::new();
    newest_first
        .into_iter()
        .filter(|r| {
            let (bookmaker_id, market_type, outcome_name) = r.series_key();
            seen.insert((
                bookmaker_id.clone(),
                market_type.to_string(),
                outcome_name.to_string(),
            ))
        })
        .collect()
}

fn group_by_market(
    event: &Event,
    latest: &[OddsRecord],
    registry: &Registry<'_>,
) -> BTreeMap<String, MarketView> {
    let mut markets: BTreeMap<String, MarketView> = BTreeMap::new();

    for record in latest {
        let Some(bookmaker) = registry.get(&record.bookmaker_id) else {
            debug!(
                event_id = %event.id,
                bookmaker_id = %record.bookmaker_id,
                "Skipping odds from unknown bookmaker"
            );
            continue;
        };

        let view = markets.entry(record.market_type.clone()).or_default();
        let mut snapshot = OddsSnapshot::new(
            bookmaker.key.clone(),
            bookmaker.name.clone(),
            record.outcome_name.clone(),
            record.price,
        );
        snapshot.point = record.point;
        view.by_outcome
            .entry(record.outcome_name.clone())
            .or_default()
            .push(snapshot);
        view.by_bookmaker
            .entry(bookmaker.key.clone())
            .or_default()
            .insert(record.outcome_name.clone(), record.price);
    }

    markets
}

/// Builds alerts from stored odds.
pub struct AlertGenerator<'a, S> {
    store: &'a S,
    config: &'a AnalysisConfig,
    sharp_books: SharpBooks,
}

impl<'a, S: OddsStore + AlertStore> AlertGenerator<'a, S> {
    pub fn new(store: &'a S, config: &'a AnalysisConfig) -> Self {
        Self {
            store,
            config,
            sharp_books: config.sharp_books(),
        }
    }

    /// Arbitrage alerts over the latest odds of every active event.
    pub async fn generate_arb_alerts(&self) -> Result<Vec<Alert>> {
        let bookmakers = self.store.bookmakers().await?;
        let registry = Registry::new(&bookmakers);
        let mut alerts = Vec::new();

        for event in self.store.active_events().await? {
            for (market_type, view) in self.latest_markets(&event, &registry).await? {
                self.push_arb(&event, &market_type, &view, &mut alerts)?;
            }
        }

        info!(count = alerts.len(), "Generated arbitrage alerts");
        Ok(alerts)
    }

    /// Value-bet alerts over the latest odds of every active event.
    pub async fn generate_value_alerts(&self) -> Result<Vec<Alert>> {
        let bookmakers = self.store.bookmakers().await?;
        let registry = Registry::new(&bookmakers);
        let mut alerts = Vec::new();

        for event in self.store.active_events().await? {
            for (market_type, view) in self.latest_markets(&event, &registry).await? {
                self.push_value(&event, &market_type, &view, &registry, &mut alerts)?;
            }
        }

        info!(count = alerts.len(), "Generated value bet alerts");
        Ok(alerts)
    }

    /// Movement alerts for series whose newest observation moved.
    pub async fn generate_movement_alerts(&self) -> Result<Vec<Alert>> {
        let bookmakers = self.store.bookmakers().await?;
        let registry = Registry::new(&bookmakers);
        let mut alerts = Vec::new();

        for event in self.store.active_events().await? {
            self.push_movements(&event, &registry, &mut alerts).await?;
        }

        info!(count = alerts.len(), "Generated line movement alerts");
        Ok(alerts)
    }

    /// Run every detector over every active event and stage the alerts.
    pub async fn run_pass(&self) -> Result<AnalysisPass> {
        let bookmakers = self.store.bookmakers().await?;
        let registry = Registry::new(&bookmakers);
        let events = self.store.active_events().await?;

        let mut report = AnalysisReport {
            events_scanned: events.len(),
            ..AnalysisReport::default()
        };
        let mut alerts = Vec::new();

        for event in &events {
            for (market_type, view) in self.latest_markets(event, &registry).await? {
                report.arbitrage_alerts += self.push_arb(event, &market_type, &view, &mut alerts)?;
                report.value_alerts +=
                    self.push_value(event, &market_type, &view, &registry, &mut alerts)?;
            }
            if self.config.movement_alerts {
                report.movement_alerts += self.push_movements(event, &registry, &mut alerts).await?;
            }
        }

        info!(
            events = report.events_scanned,
            arbitrage = report.arbitrage_alerts,
            value = report.value_alerts,
            movement = report.movement_alerts,
            "Analysis complete"
        );
        Ok(AnalysisPass { alerts, report })
    }

    async fn latest_markets(
        &self,
        event: &Event,
        registry: &Registry<'_>,
    ) -> Result<BTreeMap<String, MarketView>> {
        let records = self.store.latest_odds_first(&event.id).await?;
        let latest = latest_per_series(records);
        Ok(group_by_market(event, &latest, registry))
    }

    fn push_arb(
        &self,
        event: &Event,
        market_type: &str,
        view: &MarketView,
        alerts: &mut Vec<Alert>,
    ) -> Result<usize> {
        let found = find_arbitrage(
            &event.event_ref(),
            market_type,
            &view.by_outcome,
            self.config.min_profit_pct,
        );
        match found {
            Some(arb) => {
                alerts.push(Alert::arbitrage(&arb)?);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn push_value(
        &self,
        event: &Event,
        market_type: &str,
        view: &MarketView,
        registry: &Registry<'_>,
        alerts: &mut Vec<Alert>,
    ) -> Result<usize> {
        let bets = find_value_bets(
            &event.event_ref(),
            market_type,
            &view.by_bookmaker,
            &registry.names,
            &self.sharp_books,
            self.config.min_edge_pct,
        );
        for bet in &bets {
            alerts.push(Alert::value_bet(bet)?);
        }
        Ok(bets.len())
    }

    async fn push_movements(
        &self,
        event: &Event,
        registry: &Registry<'_>,
        alerts: &mut Vec<Alert>,
    ) -> Result<usize> {
        let history = self
            .store
            .odds_history(&event.id, &HistoryFilter::default())
            .await?;

        if history.is_empty() {
            return Ok(0);
        }
        let alerted = self.last_alerted_moves(event).await?;

        let mut pushed = 0;
        for (key, name, points) in series(event, history, registry) {
            let Some(newest) = points.iter().map(|p| p.observed_at).max() else {
                continue;
            };
            let series_key = (
                key.bookmaker_key.clone(),
                key.market_type.clone(),
                key.outcome_name.clone(),
            );
            if alerted.get(&series_key).is_some_and(|at| *at >= newest) {
                debug!(
                    event_id = %event.id,
                    bookmaker = %key.bookmaker_key,
                    market = %key.market_type,
                    outcome = %key.outcome_name,
                    "Movement already alerted"
                );
                continue;
            }
            let fresh = detect_line_movements(&key, &points, self.config.min_movement_pct)
                .into_iter()
                .filter(|m| m.new_timestamp == newest);
            for movement in fresh {
                alerts.push(Alert::line_movement(&movement, &name)?);
                pushed += 1;
            }
        }
        Ok(pushed)
    }

    /// Latest alerted movement end time per `(bookmaker, market, outcome)`.
    async fn last_alerted_moves(
        &self,
        event: &Event,
    ) -> Result<HashMap<(BookmakerKey, String, String), DateTime<Utc>>> {
        let stored = self
            .store
            .event_alerts(&event.id, AlertKind::LineMovement)
            .await?;

        let mut latest: HashMap<(BookmakerKey, String, String), DateTime<Utc>> = HashMap::new();
        for mark in stored.iter().filter_map(Alert::movement_mark) {
            latest
                .entry(mark.series())
                .and_modify(|at| *at = (*at).max(mark.new_timestamp))
                .or_insert(mark.new_timestamp);
        }
        Ok(latest)
    }

    /// Run a pass and commit its alerts in one transaction.
    pub async fn analyze_and_commit(&self) -> Result<AnalysisReport> {
        let pass = self.run_pass().await?;
        self.store.append_alerts(&pass.alerts).await?;
        Ok(pass.report)
    }
}

/// Split an event's history into per-series price points, each tagged
/// with its line key and bookmaker display name.
fn series(
    event: &Event,
    history: Vec<OddsRecord>,
    registry: &Registry<'_>,
) -> Vec<(LineKey, String, Vec<PricePoint>)> {
    let mut grouped: BTreeMap<(BookmakerKey, String, String), (String, Vec<PricePoint>)> =
        BTreeMap::new();

    for record in history {
        let Some(bookmaker) = registry.get(&record.bookmaker_id) else {
            debug!(
                event_id = %event.id,
                bookmaker_id = %record.bookmaker_id,
                "Skipping history from unknown bookmaker"
            );
            continue;
        };
        let point = record.price_point();
        grouped
            .entry((
                bookmaker.key.clone(),
                record.market_type,
                record.outcome_name,
            ))
            .or_insert_with(|| (bookmaker.name.clone(), Vec::new()))
            .1
            .push(point);
    }

    grouped
        .into_iter()
        .map(|((bookmaker_key, market_type, outcome_name), (name, points))| {
            let key = LineKey {
                event: event.event_ref(),
                bookmaker_key,
                market_type,
                outcome_name,
            };
            (key, name, points)
        })
        .collect()
}

/// Line movements across every series of one event.
///
/// Unlike the alert path this reports every qualifying movement, not just
/// the freshest one.
pub async fn event_movements<S: OddsStore>(
    store: &S,
    event: &Event,
    filter: &HistoryFilter,
    min_price_change_pct: Decimal,
) -> Result<Vec<crate::domain::LineMovement>> {
    let bookmakers = store.bookmakers().await?;
    let registry = Registry::new(&bookmakers);
    let history = store.odds_history(&event.id, filter).await?;

    Ok(series(event, history, &registry)
        .into_iter()
        .flat_map(|(key, _, points)| detect_line_movements(&key, &points, min_price_change_pct))
        .collect())
}
