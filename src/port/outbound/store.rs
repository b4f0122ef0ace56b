//! Persistence ports for events, odds, and alerts.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::domain::{
    Alert, AlertId, AlertKind, Bookmaker, BookmakerKey, Event, EventId, OddsBatch, OddsRecord,
    Sport,
};
use crate::error::Result;

/// Filter for listing events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    /// Only events of this sport key.
    pub sport_key: Option<String>,
    /// `None` lists both active and completed events.
    pub completed: Option<bool>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            sport_key: None,
            completed: None,
            limit: 50,
            offset: 0,
        }
    }
}

/// Filter for an event's odds history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub bookmaker: Option<BookmakerKey>,
    pub market_type: Option<String>,
}

/// Query for listing odds records across events, newest observation first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OddsQuery {
    pub event_id: Option<EventId>,
    pub bookmaker: Option<BookmakerKey>,
    pub market_type: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl OddsQuery {
    pub const DEFAULT_LIMIT: u32 = 100;
    pub const MAX_LIMIT: u32 = 500;

    /// Limit clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

impl Default for OddsQuery {
    fn default() -> Self {
        Self {
            event_id: None,
            bookmaker: None,
            market_type: None,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Query for listing alerts, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertQuery {
    pub kind: Option<AlertKind>,
    pub unread_only: bool,
    pub limit: u32,
    pub offset: u32,
}

impl AlertQuery {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 200;

    /// Limit clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

impl Default for AlertQuery {
    fn default() -> Self {
        Self {
            kind: None,
            unread_only: false,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Read access to events, bookmakers, and odds observations.
pub trait OddsStore: Send + Sync {
    /// Sports in the catalog ordered by title, optionally only active ones.
    fn sports(&self, active_only: bool) -> impl Future<Output = Result<Vec<Sport>>> + Send;

    /// All events not yet marked completed.
    fn active_events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// Events matching `filter`, soonest commence time first.
    fn events(&self, filter: &EventFilter) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// Get an event by ID.
    fn event(&self, id: &EventId) -> impl Future<Output = Result<Option<Event>>> + Send;

    /// The full bookmaker registry.
    fn bookmakers(&self) -> impl Future<Output = Result<Vec<Bookmaker>>> + Send;

    /// Every odds record for an event, newest observation first.
    fn latest_odds_first(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = Result<Vec<OddsRecord>>> + Send;

    /// Odds records for an event, oldest observation first.
    fn odds_history(
        &self,
        event_id: &EventId,
        filter: &HistoryFilter,
    ) -> impl Future<Output = Result<Vec<OddsRecord>>> + Send;

    /// Odds records matching `query`, newest observation first.
    fn odds(&self, query: &OddsQuery) -> impl Future<Output = Result<Vec<OddsRecord>>> + Send;
}

/// Append-only alert storage.
pub trait AlertStore: Send + Sync {
    /// Persist a pass's alerts in a single transaction.
    fn append_alerts(&self, alerts: &[Alert]) -> impl Future<Output = Result<usize>> + Send;

    /// List alerts matching `query`, newest first.
    fn list_alerts(&self, query: &AlertQuery) -> impl Future<Output = Result<Vec<Alert>>> + Send;

    /// Every alert of `kind` raised for one event, oldest first.
    fn event_alerts(
        &self,
        event_id: &EventId,
        kind: AlertKind,
    ) -> impl Future<Output = Result<Vec<Alert>>> + Send;

    /// Mark one alert read. Returns false when the alert does not exist.
    fn mark_read(&self, id: &AlertId) -> impl Future<Output = Result<bool>> + Send;

    /// Mark every unread alert read. Returns the number changed.
    fn mark_all_read(&self) -> impl Future<Output = Result<usize>> + Send;
}

/// Write access used by ingestion.
pub trait IngestStore: Send + Sync {
    /// Insert or refresh sports by key.
    fn upsert_sports(&self, sports: &[Sport]) -> impl Future<Output = Result<usize>> + Send;

    /// Persist one scrape in a single transaction. Returns odds rows written.
    fn record_batch(&self, batch: &OddsBatch) -> impl Future<Output = Result<usize>> + Send;

    /// Mark events that started before `cutoff` as completed.
    fn complete_events_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = Result<usize>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_query_limit_is_clamped() {
        let mut query = AlertQuery::default();
        assert_eq!(query.effective_limit(), 50);
        query.limit = 0;
        assert_eq!(query.effective_limit(), 1);
        query.limit = 5000;
        assert_eq!(query.effective_limit(), AlertQuery::MAX_LIMIT);
    }

    #[test]
    fn odds_query_limit_is_clamped() {
        let mut query = OddsQuery::default();
        assert_eq!(query.effective_limit(), 100);
        query.limit = 0;
        assert_eq!(query.effective_limit(), 1);
        query.limit = 10_000;
        assert_eq!(query.effective_limit(), OddsQuery::MAX_LIMIT);
    }
}
