//! Database model types for Diesel ORM.
//!
//! Decimals are stored as TEXT so prices survive exactly. Timestamps are
//! fixed-width RFC 3339 UTC strings, which sort chronologically.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{alerts, bookmakers, events, odds_records, sports};
use crate::domain::{
    Alert, AlertId, AlertKind, Bookmaker, BookmakerId, BookmakerKey, Event, EventId, OddsRecord,
    Sport,
};
use crate::error::{Error, Result};

/// Format a timestamp for storage.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("timestamp {raw:?}: {e}")))
}

fn parse_decimal(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| Error::Parse(format!("decimal {raw:?}: {e}")))
}

/// Database row for a sport.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = sports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SportRow {
    pub key: String,
    pub title: String,
    pub active: bool,
}

impl From<&Sport> for SportRow {
    fn from(sport: &Sport) -> Self {
        Self {
            key: sport.key.clone(),
            title: sport.title.clone(),
            active: sport.active,
        }
    }
}

impl From<SportRow> for Sport {
    fn from(row: SportRow) -> Self {
        Self {
            key: row.key,
            title: row.title,
            active: row.active,
        }
    }
}

/// Database row for an event.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EventRow {
    pub id: String,
    pub external_id: String,
    pub sport_key: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: String,
    pub completed: bool,
}

impl TryFrom<EventRow> for Event {
    type Error = Error;

    fn try_from(row: EventRow) -> Result<Self> {
        Ok(Self {
            id: EventId::from(row.id),
            external_id: row.external_id,
            sport_key: row.sport_key,
            home_team: row.home_team,
            away_team: row.away_team,
            commence_time: parse_timestamp(&row.commence_time)?,
            completed: row.completed,
        })
    }
}

/// Database row for a bookmaker.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = bookmakers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BookmakerRow {
    pub id: String,
    pub key: String,
    pub name: String,
    pub is_exchange: bool,
    pub active: bool,
}

impl From<&Bookmaker> for BookmakerRow {
    fn from(bm: &Bookmaker) -> Self {
        Self {
            id: bm.id.to_string(),
            key: bm.key.to_string(),
            name: bm.name.clone(),
            is_exchange: bm.is_exchange,
            active: bm.active,
        }
    }
}

impl From<BookmakerRow> for Bookmaker {
    fn from(row: BookmakerRow) -> Self {
        Self {
            id: BookmakerId::from(row.id),
            key: BookmakerKey::from(row.key),
            name: row.name,
            is_exchange: row.is_exchange,
            active: row.active,
        }
    }
}

/// Database row for an odds observation.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = odds_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OddsRow {
    pub id: String,
    pub event_id: String,
    pub bookmaker_id: String,
    pub market_type: String,
    pub outcome_name: String,
    pub price: String,
    pub point: Option<String>,
    pub observed_at: String,
}

impl TryFrom<OddsRow> for OddsRecord {
    type Error = Error;

    fn try_from(row: OddsRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            event_id: EventId::from(row.event_id),
            bookmaker_id: BookmakerId::from(row.bookmaker_id),
            market_type: row.market_type,
            outcome_name: row.outcome_name,
            price: parse_decimal(&row.price)?,
            point: row.point.as_deref().map(parse_decimal).transpose()?,
            observed_at: parse_timestamp(&row.observed_at)?,
        })
    }
}

/// Database row for an alert.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = alerts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AlertRow {
    pub id: String,
    pub kind: String,
    pub event_id: String,
    pub title: String,
    pub details: String,
    pub is_read: bool,
    pub created_at: String,
}

impl TryFrom<&Alert> for AlertRow {
    type Error = Error;

    fn try_from(alert: &Alert) -> Result<Self> {
        Ok(Self {
            id: alert.id.to_string(),
            kind: alert.kind.as_str().to_string(),
            event_id: alert.event_id.to_string(),
            title: alert.title.clone(),
            details: serde_json::to_string(&alert.details)?,
            is_read: alert.is_read,
            created_at: format_timestamp(&alert.created_at),
        })
    }
}

impl TryFrom<AlertRow> for Alert {
    type Error = Error;

    fn try_from(row: AlertRow) -> Result<Self> {
        Ok(Self {
            id: AlertId::from(row.id),
            kind: AlertKind::from_str(&row.kind).map_err(Error::Parse)?,
            event_id: EventId::from(row.event_id),
            title: row.title,
            details: serde_json::from_str(&row.details)?,
            is_read: row.is_read,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}
