//! Odds ingestion: fetch from the feed, validate, persist.
//!
//! Feed events arrive nested (event → bookmaker → market → outcome). They
//! are flattened into an [`OddsBatch`] that shares one observation time and
//! written through [`IngestStore::record_batch`] in a single transaction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::{EventQuotes, OddsBatch, OddsSnapshot, Quote, Sport};
use crate::error::Result;
use crate::port::outbound::feed::{FeedEvent, OddsFeed};
use crate::port::outbound::store::IngestStore;

/// Counts from one sport scrape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub events: usize,
    pub records: usize,
    pub rejected: usize,
}

/// Flatten feed events into a batch observed at `observed_at`.
///
/// Quotes priced at or below 1 cannot be real decimal odds and are dropped
/// with a warning. Returns the batch and the number of rejected quotes.
#[must_use]
pub fn flatten_events(events: Vec<FeedEvent>, observed_at: DateTime<Utc>) -> (OddsBatch, usize) {
    let mut rejected = 0;
    let mut flattened = Vec::with_capacity(events.len());

    for event in events {
        let mut quotes = Vec::new();
        for bookmaker in &event.bookmakers {
            for market in &bookmaker.markets {
                for outcome in &market.outcomes {
                    if outcome.price <= rust_decimal::Decimal::ONE {
                        warn!(
                            event = %event.id,
                            bookmaker = %bookmaker.key,
                            market = %market.key,
                            outcome = %outcome.name,
                            price = %outcome.price,
                            "Rejecting quote with price <= 1"
                        );
                        rejected += 1;
                        continue;
                    }
                    let mut snapshot = OddsSnapshot::new(
                        bookmaker.key.as_str(),
                        bookmaker.title.as_str(),
                        outcome.name.as_str(),
                        outcome.price,
                    );
                    snapshot.point = outcome.point;
                    quotes.push(Quote {
                        market_type: market.key.clone(),
                        snapshot,
                    });
                }
            }
        }

        flattened.push(EventQuotes {
            external_id: event.id,
            sport: Sport {
                key: event.sport_key,
                title: event.sport_title,
                active: true,
            },
            home_team: event.home_team,
            away_team: event.away_team,
            commence_time: event.commence_time,
            quotes,
        });
    }

    (
        OddsBatch {
            observed_at,
            events: flattened,
        },
        rejected,
    )
}

/// Moves odds from an [`OddsFeed`] into an [`IngestStore`].
pub struct IngestService<S> {
    feed: Arc<dyn OddsFeed>,
    store: Arc<S>,
}

impl<S: IngestStore> IngestService<S> {
    pub fn new(feed: Arc<dyn OddsFeed>, store: Arc<S>) -> Self {
        Self { feed, store }
    }

    /// Refresh the sports catalog. Returns the number of sports written.
    pub async fn sync_sports(&self) -> Result<usize> {
        let sports = self.feed.sports().await?;
        let written = self.store.upsert_sports(&sports).await?;
        info!(feed = self.feed.feed_name(), count = written, "Synced sports");
        Ok(written)
    }

    /// Fetch and persist current odds for one sport.
    pub async fn scrape_odds(&self, sport_key: &str) -> Result<ScrapeSummary> {
        let events = self.feed.odds(sport_key).await?;
        if events.is_empty() {
            info!(sport = sport_key, "No events returned");
            return Ok(ScrapeSummary::default());
        }

        let (batch, rejected) = flatten_events(events, Utc::now());
        debug!(
            sport = sport_key,
            events = batch.events.len(),
            quotes = batch.quote_count(),
            "Recording odds batch"
        );
        let records = self.store.record_batch(&batch).await?;

        info!(
            sport = sport_key,
            events = batch.events.len(),
            records,
            rejected,
            "Scraped odds"
        );
        Ok(ScrapeSummary {
            events: batch.events.len(),
            records,
            rejected,
        })
    }

    /// Mark events that started more than `grace` ago as completed.
    pub async fn complete_stale_events(&self, grace: chrono::Duration) -> Result<usize> {
        let closed = self.store.complete_events_before(Utc::now() - grace).await?;
        if closed > 0 {
            info!(count = closed, "Marked events completed");
        }
        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::outbound::feed::{FeedBookmaker, FeedMarket, FeedOutcome};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn feed_event(prices: &[(&str, rust_decimal::Decimal)]) -> FeedEvent {
        FeedEvent {
            id: "ext-1".into(),
            sport_key: "basketball_nba".into(),
            sport_title: "NBA".into(),
            commence_time: Utc.with_ymd_and_hms(2026, 3, 1, 19, 0, 0).unwrap(),
            home_team: "Lakers".into(),
            away_team: "Celtics".into(),
            bookmakers: vec![FeedBookmaker {
                key: "fanduel".into(),
                title: "FanDuel".into(),
                markets: vec![FeedMarket {
                    key: "h2h".into(),
                    outcomes: prices
                        .iter()
                        .map(|(name, price)| FeedOutcome {
                            name: (*name).into(),
                            price: *price,
                            point: None,
                        })
                        .collect(),
                }],
            }],
        }
    }

    #[test]
    fn flatten_keeps_valid_quotes_and_counts_rejects() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap();
        let events = vec![feed_event(&[("Lakers", dec!(1.95)), ("Celtics", dec!(1.0))])];

        let (batch, rejected) = flatten_events(events, at);

        assert_eq!(rejected, 1);
        assert_eq!(batch.observed_at, at);
        assert_eq!(batch.quote_count(), 1);
        let event = &batch.events[0];
        assert_eq!(event.external_id, "ext-1");
        assert_eq!(event.sport.key, "basketball_nba");
        assert_eq!(event.quotes[0].market_type, "h2h");
        assert_eq!(event.quotes[0].snapshot.bookmaker_name, "FanDuel");
        assert_eq!(event.quotes[0].snapshot.price, dec!(1.95));
    }

    #[test]
    fn flatten_keeps_events_without_quotes() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap();
        let (batch, rejected) = flatten_events(vec![feed_event(&[])], at);

        assert_eq!(rejected, 0);
        assert_eq!(batch.events.len(), 1);
        assert_eq!(batch.quote_count(), 0);
    }
}
