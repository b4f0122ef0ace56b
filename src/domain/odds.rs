//! Odds observations in the shapes the detectors and the store exchange.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::event::Sport;
use super::id::{BookmakerId, BookmakerKey, EventId};
use super::money::Price;

/// One bookmaker's price for one outcome.
///
/// Two snapshots are comparable only when they share event, market type,
/// and outcome name exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsSnapshot {
    pub bookmaker_key: BookmakerKey,
    pub bookmaker_name: String,
    pub outcome_name: String,
    pub price: Price,
    /// Spread or total line, when the market has one.
    pub point: Option<Decimal>,
}

impl OddsSnapshot {
    pub fn new(
        bookmaker_key: impl Into<BookmakerKey>,
        bookmaker_name: impl Into<String>,
        outcome_name: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            bookmaker_key: bookmaker_key.into(),
            bookmaker_name: bookmaker_name.into(),
            outcome_name: outcome_name.into(),
            price,
            point: None,
        }
    }

    #[must_use]
    pub fn with_point(mut self, point: Decimal) -> Self {
        self.point = Some(point);
        self
    }
}

/// A price observed at a point in time, for temporal tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: Price,
    pub point: Option<Decimal>,
    pub observed_at: DateTime<Utc>,
}

impl PricePoint {
    pub fn new(price: Price, point: Option<Decimal>, observed_at: DateTime<Utc>) -> Self {
        Self {
            price,
            point,
            observed_at,
        }
    }
}

/// A stored odds observation. Records are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsRecord {
    pub id: String,
    pub event_id: EventId,
    pub bookmaker_id: BookmakerId,
    pub market_type: String,
    pub outcome_name: String,
    pub price: Price,
    pub point: Option<Decimal>,
    pub observed_at: DateTime<Utc>,
}

impl OddsRecord {
    /// The `(bookmaker, market, outcome)` triple used for latest-snapshot dedup.
    #[must_use]
    pub fn series_key(&self) -> (&BookmakerId, &str, &str) {
        (&self.bookmaker_id, &self.market_type, &self.outcome_name)
    }

    #[must_use]
    pub fn price_point(&self) -> PricePoint {
        PricePoint::new(self.price, self.point, self.observed_at)
    }
}

/// A single quote from the feed, flattened to one market and outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub market_type: String,
    pub snapshot: OddsSnapshot,
}

/// All quotes for one upstream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuotes {
    pub external_id: String,
    pub sport: Sport,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
    pub quotes: Vec<Quote>,
}

/// One scrape's worth of quotes, all sharing an observation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OddsBatch {
    pub observed_at: DateTime<Utc>,
    pub events: Vec<EventQuotes>,
}

impl OddsBatch {
    /// Total number of quotes across all events.
    #[must_use]
    pub fn quote_count(&self) -> usize {
        self.events.iter().map(|e| e.quotes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn snapshot_builder_sets_point() {
        let snap = OddsSnapshot::new("fanduel", "FanDuel", "Lakers", dec!(1.91)).with_point(dec!(-3.5));
        assert_eq!(snap.point, Some(dec!(-3.5)));
        assert_eq!(snap.bookmaker_key.as_str(), "fanduel");
    }

    #[test]
    fn batch_counts_quotes_across_events() {
        let sport = Sport {
            key: "basketball_nba".into(),
            title: "NBA".into(),
            active: true,
        };
        let quote = Quote {
            market_type: "h2h".into(),
            snapshot: OddsSnapshot::new("fanduel", "FanDuel", "A", dec!(2.0)),
        };
        let event = EventQuotes {
            external_id: "x".into(),
            sport,
            home_team: "A".into(),
            away_team: "B".into(),
            commence_time: Utc::now(),
            quotes: vec![quote.clone(), quote],
        };
        let batch = OddsBatch {
            observed_at: Utc::now(),
            events: vec![event.clone(), event],
        };
        assert_eq!(batch.quote_count(), 4);
    }
}
