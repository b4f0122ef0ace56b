//! In-memory store implementing every persistence port.
//!
//! Mirrors the SQLite adapter's ordering and filtering so services can be
//! tested without a database. Seed helpers allow states the real store
//! never produces, such as odds pointing at an unknown bookmaker.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::{
    Alert, AlertId, AlertKind, Bookmaker, BookmakerId, BookmakerKey, Event, EventId, OddsBatch,
    OddsRecord, Sport,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{
    AlertQuery, AlertStore, EventFilter, HistoryFilter, IngestStore, OddsQuery, OddsStore,
};

#[derive(Debug, Default)]
struct State {
    sports: Vec<Sport>,
    events: Vec<Event>,
    bookmakers: Vec<Bookmaker>,
    odds: Vec<OddsRecord>,
    alerts: Vec<Alert>,
}

/// Thread-safe in-memory implementation of the store ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    fail_alert_writes: RwLock<bool>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_event(&self, event: Event) {
        self.state.write().events.push(event);
    }

    pub fn insert_bookmaker(&self, bookmaker: Bookmaker) {
        self.state.write().bookmakers.push(bookmaker);
    }

    pub fn insert_odds(&self, record: OddsRecord) {
        self.state.write().odds.push(record);
    }

    /// Make subsequent `append_alerts` calls fail.
    pub fn fail_alert_writes(&self, fail: bool) {
        *self.fail_alert_writes.write() = fail;
    }

    #[must_use]
    pub fn all_events(&self) -> Vec<Event> {
        self.state.read().events.clone()
    }

    #[must_use]
    pub fn all_odds(&self) -> Vec<OddsRecord> {
        self.state.read().odds.clone()
    }

    #[must_use]
    pub fn all_alerts(&self) -> Vec<Alert> {
        self.state.read().alerts.clone()
    }
}

impl State {
    fn bookmaker_id_for(&mut self, key: &BookmakerKey, name: &str) -> BookmakerId {
        if let Some(existing) = self.bookmakers.iter().find(|b| &b.key == key) {
            return existing.id.clone();
        }
        let bookmaker = Bookmaker::new(key.clone(), name);
        let id = bookmaker.id.clone();
        self.bookmakers.push(bookmaker);
        id
    }

    fn upsert_sport(&mut self, sport: &Sport) {
        match self.sports.iter_mut().find(|s| s.key == sport.key) {
            Some(existing) => {
                existing.title.clone_from(&sport.title);
                existing.active = sport.active;
            }
            None => self.sports.push(sport.clone()),
        }
    }

    /// `None` when no key is given, `Some(None)` when the key is unknown.
    fn bookmaker_filter(&self, key: Option<&BookmakerKey>) -> Option<Option<BookmakerId>> {
        key.map(|key| {
            self.bookmakers
                .iter()
                .find(|b| &b.key == key)
                .map(|b| b.id.clone())
        })
    }
}

fn matches_bookmaker(record: &OddsRecord, filter: &Option<Option<BookmakerId>>) -> bool {
    match filter {
        None => true,
        Some(Some(id)) => &record.bookmaker_id == id,
        Some(None) => false,
    }
}

impl OddsStore for InMemoryStore {
    async fn sports(&self, active_only: bool) -> Result<Vec<Sport>> {
        let mut sports: Vec<Sport> = self
            .state
            .read()
            .sports
            .iter()
            .filter(|s| !active_only || s.active)
            .cloned()
            .collect();
        sports.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.key.cmp(&b.key)));
        Ok(sports)
    }

    async fn active_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .state
            .read()
            .events
            .iter()
            .filter(|e| !e.completed)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.commence_time);
        Ok(events)
    }

    async fn events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .state
            .read()
            .events
            .iter()
            .filter(|e| filter.sport_key.as_ref().map_or(true, |k| &e.sport_key == k))
            .filter(|e| filter.completed.map_or(true, |c| e.completed == c))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.commence_time);
        Ok(events
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn event(&self, id: &EventId) -> Result<Option<Event>> {
        Ok(self
            .state
            .read()
            .events
            .iter()
            .find(|e| &e.id == id)
            .cloned())
    }

    async fn bookmakers(&self) -> Result<Vec<Bookmaker>> {
        let mut bookmakers = self.state.read().bookmakers.clone();
        bookmakers.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(bookmakers)
    }

    async fn latest_odds_first(&self, event_id: &EventId) -> Result<Vec<OddsRecord>> {
        let mut odds: Vec<OddsRecord> = self
            .state
            .read()
            .odds
            .iter()
            .filter(|r| &r.event_id == event_id)
            .cloned()
            .collect();
        odds.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));
        Ok(odds)
    }

    async fn odds_history(
        &self,
        event_id: &EventId,
        filter: &HistoryFilter,
    ) -> Result<Vec<OddsRecord>> {
        let state = self.state.read();
        let bookmaker_id = state.bookmaker_filter(filter.bookmaker.as_ref());

        let mut odds: Vec<OddsRecord> = state
            .odds
            .iter()
            .filter(|r| &r.event_id == event_id)
            .filter(|r| {
                filter
                    .market_type
                    .as_ref()
                    .map_or(true, |m| &r.market_type == m)
            })
            .filter(|r| matches_bookmaker(r, &bookmaker_id))
            .cloned()
            .collect();
        odds.sort_by_key(|r| r.observed_at);
        Ok(odds)
    }

    async fn odds(&self, query: &OddsQuery) -> Result<Vec<OddsRecord>> {
        let state = self.state.read();
        let bookmaker_id = state.bookmaker_filter(query.bookmaker.as_ref());

        let mut odds: Vec<OddsRecord> = state
            .odds
            .iter()
            .filter(|r| query.event_id.as_ref().map_or(true, |id| &r.event_id == id))
            .filter(|r| {
                query
                    .market_type
                    .as_ref()
                    .map_or(true, |m| &r.market_type == m)
            })
            .filter(|r| matches_bookmaker(r, &bookmaker_id))
            .cloned()
            .collect();
        odds.sort_by(|a, b| b.observed_at.cmp(&a.observed_at).then_with(|| a.id.cmp(&b.id)));
        Ok(odds
            .into_iter()
            .skip(query.offset as usize)
            .take(query.effective_limit() as usize)
            .collect())
    }
}

impl AlertStore for InMemoryStore {
    async fn append_alerts(&self, alerts: &[Alert]) -> Result<usize> {
        if *self.fail_alert_writes.read() {
            return Err(Error::Database("alert writes disabled".to_string()));
        }
        self.state.write().alerts.extend_from_slice(alerts);
        Ok(alerts.len())
    }

    async fn list_alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self
            .state
            .read()
            .alerts
            .iter()
            .filter(|a| query.kind.map_or(true, |k| a.kind == k))
            .filter(|a| !query.unread_only || !a.is_read)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts
            .into_iter()
            .skip(query.offset as usize)
            .take(query.effective_limit() as usize)
            .collect())
    }

    async fn event_alerts(&self, event_id: &EventId, kind: AlertKind) -> Result<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self
            .state
            .read()
            .alerts
            .iter()
            .filter(|a| &a.event_id == event_id && a.kind == kind)
            .cloned()
            .collect();
        alerts.sort_by_key(|a| a.created_at);
        Ok(alerts)
    }

    async fn mark_read(&self, id: &AlertId) -> Result<bool> {
        let mut state = self.state.write();
        match state.alerts.iter_mut().find(|a| &a.id == id) {
            Some(alert) => {
                alert.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self) -> Result<usize> {
        let mut state = self.state.write();
        let mut changed = 0;
        for alert in state.alerts.iter_mut().filter(|a| !a.is_read) {
            alert.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }
}

impl IngestStore for InMemoryStore {
    async fn upsert_sports(&self, sports: &[Sport]) -> Result<usize> {
        let mut state = self.state.write();
        for sport in sports {
            state.upsert_sport(sport);
        }
        Ok(sports.len())
    }

    async fn record_batch(&self, batch: &OddsBatch) -> Result<usize> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let mut written = 0;

        for quotes in &batch.events {
            state.upsert_sport(&quotes.sport);

            let event_id = match state
                .events
                .iter_mut()
                .find(|e| e.external_id == quotes.external_id)
            {
                Some(event) => {
                    event.home_team.clone_from(&quotes.home_team);
                    event.away_team.clone_from(&quotes.away_team);
                    event.commence_time = quotes.commence_time;
                    event.id.clone()
                }
                None => {
                    let event = Event {
                        id: EventId::new(),
                        external_id: quotes.external_id.clone(),
                        sport_key: quotes.sport.key.clone(),
                        home_team: quotes.home_team.clone(),
                        away_team: quotes.away_team.clone(),
                        commence_time: quotes.commence_time,
                        completed: false,
                    };
                    let id = event.id.clone();
                    state.events.push(event);
                    id
                }
            };

            for quote in &quotes.quotes {
                let snap = &quote.snapshot;
                let bookmaker_id = state.bookmaker_id_for(&snap.bookmaker_key, &snap.bookmaker_name);
                state.odds.push(OddsRecord {
                    id: Uuid::new_v4().to_string(),
                    event_id: event_id.clone(),
                    bookmaker_id,
                    market_type: quote.market_type.clone(),
                    outcome_name: snap.outcome_name.clone(),
                    price: snap.price,
                    point: snap.point,
                    observed_at: batch.observed_at,
                });
                written += 1;
            }
        }

        Ok(written)
    }

    async fn complete_events_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut state = self.state.write();
        let mut closed = 0;
        for event in state
            .events
            .iter_mut()
            .filter(|e| !e.completed && e.commence_time < cutoff)
        {
            event.completed = true;
            closed += 1;
        }
        Ok(closed)
    }
}
