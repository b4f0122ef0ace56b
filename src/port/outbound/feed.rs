//! Upstream pricing feed port.
//!
//! The feed returns nested event → bookmaker → market → outcome quotes.
//! Ingestion flattens and validates them before anything is stored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::Sport;
use crate::error::Error;

/// One outcome price inside a bookmaker market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOutcome {
    pub name: String,
    pub price: Decimal,
    pub point: Option<Decimal>,
}

/// A bookmaker's market (`h2h`, `spreads`, `totals`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMarket {
    pub key: String,
    pub outcomes: Vec<FeedOutcome>,
}

/// A bookmaker's prices for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedBookmaker {
    pub key: String,
    pub title: String,
    pub markets: Vec<FeedMarket>,
}

/// An event with every bookmaker's quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub id: String,
    pub sport_key: String,
    pub sport_title: String,
    pub commence_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    pub bookmakers: Vec<FeedBookmaker>,
}

/// Source of sports and current odds.
#[async_trait]
pub trait OddsFeed: Send + Sync {
    /// The sports catalog, including inactive sports.
    async fn sports(&self) -> Result<Vec<Sport>, Error>;

    /// Current odds for every upcoming event in a sport.
    async fn odds(&self, sport_key: &str) -> Result<Vec<FeedEvent>, Error>;

    /// Get the feed name for logging.
    fn feed_name(&self) -> &'static str;
}
