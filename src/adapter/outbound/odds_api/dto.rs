//! The Odds API response bodies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::Sport;
use crate::port::outbound::feed::{FeedBookmaker, FeedEvent, FeedMarket, FeedOutcome};

/// A sport from `/sports`.
#[derive(Debug, Clone, Deserialize)]
pub struct SportResponse {
    pub key: String,
    #[serde(default)]
    pub group: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub active: bool,
    #[serde(default)]
    pub has_outrights: bool,
}

/// A single outcome within a market.
#[derive(Debug, Clone, Deserialize)]
pub struct OutcomeResponse {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub point: Option<Decimal>,
}

/// A market (`h2h`, `spreads`, `totals`) from a bookmaker.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketResponse {
    pub key: String,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    pub outcomes: Vec<OutcomeResponse>,
}

/// A bookmaker's odds for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct BookmakerResponse {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    pub markets: Vec<MarketResponse>,
}

/// An event with bookmaker odds from `/sports/{sport}/odds`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventOddsResponse {
    pub id: String,
    pub sport_key: String,
    pub sport_title: String,
    pub commence_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<BookmakerResponse>,
}

impl From<SportResponse> for Sport {
    fn from(s: SportResponse) -> Self {
        Self {
            key: s.key,
            title: s.title,
            active: s.active,
        }
    }
}

impl From<EventOddsResponse> for FeedEvent {
    fn from(e: EventOddsResponse) -> Self {
        Self {
            id: e.id,
            sport_key: e.sport_key,
            sport_title: e.sport_title,
            commence_time: e.commence_time,
            home_team: e.home_team,
            away_team: e.away_team,
            bookmakers: e
                .bookmakers
                .into_iter()
                .map(|b| FeedBookmaker {
                    key: b.key,
                    title: b.title,
                    markets: b
                        .markets
                        .into_iter()
                        .map(|m| FeedMarket {
                            key: m.key,
                            outcomes: m
                                .outcomes
                                .into_iter()
                                .map(|o| FeedOutcome {
                                    name: o.name,
                                    price: o.price,
                                    point: o.point,
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
