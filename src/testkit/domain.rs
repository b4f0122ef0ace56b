//! Builders for domain fixtures used across tests.
//!
//! Timestamps are minutes after a fixed base so ordering in assertions is
//! obvious from the call site.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    Bookmaker, BookmakerKey, Event, EventId, EventQuotes, OddsRecord, OddsSnapshot, Quote, Sport,
};
use crate::port::outbound::feed::{FeedBookmaker, FeedEvent, FeedMarket, FeedOutcome};

/// `(bookmaker key, market, outcome, price)`.
pub type QuoteSpec<'a> = (&'a str, &'a str, &'a str, Decimal);

/// `2026-03-01T12:00:00Z` plus `minutes`.
pub fn ts(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
        + Duration::minutes(minutes)
}

pub fn nba() -> Sport {
    Sport {
        key: "basketball_nba".to_string(),
        title: "NBA".to_string(),
        active: true,
    }
}

/// An active NBA event starting ten hours after [`ts`]`(0)`.
pub fn event(home: &str, away: &str) -> Event {
    Event {
        id: EventId::new(),
        external_id: format!("ext-{}", Uuid::new_v4().simple()),
        sport_key: nba().key,
        home_team: home.to_string(),
        away_team: away.to_string(),
        commence_time: ts(600),
        completed: false,
    }
}

pub fn bookmaker(key: &str, name: &str) -> Bookmaker {
    Bookmaker::new(BookmakerKey::from(key), name)
}

pub fn snap(bookmaker_key: &str, outcome: &str, price: Decimal) -> OddsSnapshot {
    OddsSnapshot::new(bookmaker_key, bookmaker_key, outcome, price)
}

/// A stored odds record for `event` from `bookmaker`.
pub fn odds(
    event: &Event,
    bookmaker: &Bookmaker,
    market: &str,
    outcome: &str,
    price: Decimal,
    observed_at: DateTime<Utc>,
) -> OddsRecord {
    OddsRecord {
        id: Uuid::new_v4().to_string(),
        event_id: event.id.clone(),
        bookmaker_id: bookmaker.id.clone(),
        market_type: market.to_string(),
        outcome_name: outcome.to_string(),
        price,
        point: None,
        observed_at,
    }
}

/// Lakers vs Celtics quotes under `external_id`. Bookmaker names equal keys.
pub fn event_quotes(external_id: &str, quotes: &[QuoteSpec<'_>]) -> EventQuotes {
    EventQuotes {
        external_id: external_id.to_string(),
        sport: nba(),
        home_team: "Lakers".to_string(),
        away_team: "Celtics".to_string(),
        commence_time: ts(600),
        quotes: quotes
            .iter()
            .map(|(book, market, outcome, price)| Quote {
                market_type: (*market).to_string(),
                snapshot: snap(book, outcome, *price),
            })
            .collect(),
    }
}

/// A feed event shaped like an upstream response, grouping quotes by
/// bookmaker then market in first-seen order.
pub fn feed_event(external_id: &str, quotes: &[QuoteSpec<'_>]) -> FeedEvent {
    let mut bookmakers: Vec<FeedBookmaker> = Vec::new();

    for (book, market, outcome, price) in quotes {
        let idx = match bookmakers.iter().position(|b| b.key == *book) {
            Some(idx) => idx,
            None => {
                bookmakers.push(FeedBookmaker {
                    key: (*book).to_string(),
                    title: (*book).to_string(),
                    markets: Vec::new(),
                });
                bookmakers.len() - 1
            }
        };
        let markets = &mut bookmakers[idx].markets;
        let m_idx = match markets.iter().position(|m| m.key == *market) {
            Some(m_idx) => m_idx,
            None => {
                markets.push(FeedMarket {
                    key: (*market).to_string(),
                    outcomes: Vec::new(),
                });
                markets.len() - 1
            }
        };
        markets[m_idx].outcomes.push(FeedOutcome {
            name: (*outcome).to_string(),
            price: *price,
            point: None,
        });
    }

    FeedEvent {
        id: external_id.to_string(),
        sport_key: nba().key,
        sport_title: nba().title,
        commence_time: ts(600),
        home_team: "Lakers".to_string(),
        away_team: "Celtics".to_string(),
        bookmakers,
    }
}
