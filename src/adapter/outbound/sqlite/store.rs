//! SQLite store implementation.
//!
//! Implements the odds, alert, and ingestion ports over a single Diesel
//! connection pool. Each write that spans rows runs in one transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    format_timestamp, AlertRow, BookmakerRow, EventRow, OddsRow, SportRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    alerts, bookmakers, events, odds_records, sports,
};
use crate::domain::{
    Alert, AlertId, AlertKind, Bookmaker, BookmakerKey, Event, EventId, EventQuotes, OddsBatch,
    OddsRecord, Sport,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{
    AlertQuery, AlertStore, EventFilter, HistoryFilter, IngestStore, OddsQuery, OddsStore,
};

/// Rows per multi-row insert, well under SQLite's bound-variable limit.
const INSERT_CHUNK: usize = 500;

/// SQLite-backed store for events, odds, and alerts.
#[derive(Clone)]
pub struct SqliteStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }
}

/// Insert the event or refresh its teams and start time. Returns the stored id.
fn upsert_event(conn: &mut SqliteConnection, quotes: &EventQuotes) -> QueryResult<String> {
    let commence = format_timestamp(&quotes.commence_time);

    let existing: Option<String> = events::table
        .filter(events::external_id.eq(quotes.external_id.as_str()))
        .select(events::id)
        .first(conn)
        .optional()?;

    if let Some(id) = existing {
        diesel::update(events::table.find(id.as_str()))
            .set((
                events::home_team.eq(quotes.home_team.as_str()),
                events::away_team.eq(quotes.away_team.as_str()),
                events::commence_time.eq(commence.as_str()),
            ))
            .execute(conn)?;
        return Ok(id);
    }

    let row = EventRow {
        id: EventId::new().to_string(),
        external_id: quotes.external_id.clone(),
        sport_key: quotes.sport.key.clone(),
        home_team: quotes.home_team.clone(),
        away_team: quotes.away_team.clone(),
        commence_time: commence,
        completed: false,
    };
    diesel::insert_into(events::table).values(&row).execute(conn)?;
    Ok(row.id)
}

fn upsert_sport(conn: &mut SqliteConnection, row: &SportRow) -> QueryResult<usize> {
    diesel::insert_into(sports::table)
        .values(row)
        .on_conflict(sports::key)
        .do_update()
        .set((sports::title.eq(row.title.as_str()), sports::active.eq(row.active)))
        .execute(conn)
}

/// Look up a bookmaker by key, creating it on first sight.
fn bookmaker_id(
    conn: &mut SqliteConnection,
    cache: &mut HashMap<BookmakerKey, String>,
    key: &BookmakerKey,
    name: &str,
) -> QueryResult<String> {
    if let Some(id) = cache.get(key) {
        return Ok(id.clone());
    }

    let existing: Option<String> = bookmakers::table
        .filter(bookmakers::key.eq(key.as_str()))
        .select(bookmakers::id)
        .first(conn)
        .optional()?;

    let id = match existing {
        Some(id) => id,
        None => {
            let row = BookmakerRow::from(&Bookmaker::new(key.clone(), name));
            diesel::insert_into(bookmakers::table)
                .values(&row)
                .execute(conn)?;
            debug!(bookmaker = %key, exchange = row.is_exchange, "Created bookmaker");
            row.id
        }
    };

    cache.insert(key.clone(), id.clone());
    Ok(id)
}

impl OddsStore for SqliteStore {
    async fn sports(&self, active_only: bool) -> Result<Vec<Sport>> {
        let mut conn = self.conn()?;

        let mut query = sports::table.select(SportRow::as_select()).into_boxed();
        if active_only {
            query = query.filter(sports::active.eq(true));
        }

        let rows: Vec<SportRow> = query
            .order((sports::title.asc(), sports::key.asc()))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Sport::from).collect())
    }

    async fn active_events(&self) -> Result<Vec<Event>> {
        let mut conn = self.conn()?;

        let rows: Vec<EventRow> = events::table
            .filter(events::completed.eq(false))
            .order(events::commence_time.asc())
            .select(EventRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut conn = self.conn()?;

        let mut query = events::table.select(EventRow::as_select()).into_boxed();
        if let Some(sport) = &filter.sport_key {
            query = query.filter(events::sport_key.eq(sport.clone()));
        }
        if let Some(completed) = filter.completed {
            query = query.filter(events::completed.eq(completed));
        }

        let rows: Vec<EventRow> = query
            .order(events::commence_time.asc())
            .limit(i64::from(filter.limit))
            .offset(i64::from(filter.offset))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn event(&self, id: &EventId) -> Result<Option<Event>> {
        let mut conn = self.conn()?;

        let row: Option<EventRow> = events::table
            .find(id.as_str())
            .select(EventRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Event::try_from).transpose()
    }

    async fn bookmakers(&self) -> Result<Vec<Bookmaker>> {
        let mut conn = self.conn()?;

        let rows: Vec<BookmakerRow> = bookmakers::table
            .order(bookmakers::key.asc())
            .select(BookmakerRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Bookmaker::from).collect())
    }

    async fn latest_odds_first(&self, event_id: &EventId) -> Result<Vec<OddsRecord>> {
        let mut conn = self.conn()?;

        let rows: Vec<OddsRow> = odds_records::table
            .filter(odds_records::event_id.eq(event_id.as_str()))
            .order(odds_records::observed_at.desc())
            .select(OddsRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(OddsRecord::try_from).collect()
    }

    async fn odds_history(
        &self,
        event_id: &EventId,
        filter: &HistoryFilter,
    ) -> Result<Vec<OddsRecord>> {
        let mut conn = self.conn()?;

        let mut query = odds_records::table
            .filter(odds_records::event_id.eq(event_id.as_str()))
            .select(OddsRow::as_select())
            .into_boxed();
        if let Some(market) = &filter.market_type {
            query = query.filter(odds_records::market_type.eq(market.clone()));
        }
        if let Some(key) = &filter.bookmaker {
            let ids = bookmakers::table
                .filter(bookmakers::key.eq(key.to_string()))
                .select(bookmakers::id);
            query = query.filter(odds_records::bookmaker_id.eq_any(ids));
        }

        let rows: Vec<OddsRow> = query
            .order(odds_records::observed_at.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(OddsRecord::try_from).collect()
    }

    async fn odds(&self, query: &OddsQuery) -> Result<Vec<OddsRecord>> {
        let mut conn = self.conn()?;

        let mut q = odds_records::table.select(OddsRow::as_select()).into_boxed();
        if let Some(event_id) = &query.event_id {
            q = q.filter(odds_records::event_id.eq(event_id.to_string()));
        }
        if let Some(market) = &query.market_type {
            q = q.filter(odds_records::market_type.eq(market.clone()));
        }
        if let Some(key) = &query.bookmaker {
            let ids = bookmakers::table
                .filter(bookmakers::key.eq(key.to_string()))
                .select(bookmakers::id);
            q = q.filter(odds_records::bookmaker_id.eq_any(ids));
        }

        let rows: Vec<OddsRow> = q
            .order((odds_records::observed_at.desc(), odds_records::id.asc()))
            .limit(i64::from(query.effective_limit()))
            .offset(i64::from(query.offset))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(OddsRecord::try_from).collect()
    }
}

impl AlertStore for SqliteStore {
    async fn append_alerts(&self, alerts: &[Alert]) -> Result<usize> {
        let rows = alerts
            .iter()
            .map(AlertRow::try_from)
            .collect::<Result<Vec<_>>>()?;
        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let mut written = 0;
            for chunk in rows.chunks(INSERT_CHUNK) {
                written += diesel::insert_into(alerts::table)
                    .values(chunk)
                    .execute(conn)?;
            }
            Ok::<_, diesel::result::Error>(written)
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn list_alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>> {
        let mut conn = self.conn()?;

        let mut q = alerts::table.select(AlertRow::as_select()).into_boxed();
        if let Some(kind) = query.kind {
            q = q.filter(alerts::kind.eq(kind.as_str()));
        }
        if query.unread_only {
            q = q.filter(alerts::is_read.eq(false));
        }

        let rows: Vec<AlertRow> = q
            .order(alerts::created_at.desc())
            .limit(i64::from(query.effective_limit()))
            .offset(i64::from(query.offset))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Alert::try_from).collect()
    }

    async fn event_alerts(&self, event_id: &EventId, kind: AlertKind) -> Result<Vec<Alert>> {
        let mut conn = self.conn()?;

        let rows: Vec<AlertRow> = alerts::table
            .filter(alerts::event_id.eq(event_id.as_str()))
            .filter(alerts::kind.eq(kind.as_str()))
            .order(alerts::created_at.asc())
            .select(AlertRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Alert::try_from).collect()
    }

    async fn mark_read(&self, id: &AlertId) -> Result<bool> {
        let mut conn = self.conn()?;

        let updated = diesel::update(alerts::table.find(id.as_str()))
            .set(alerts::is_read.eq(true))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(updated > 0)
    }

    async fn mark_all_read(&self) -> Result<usize> {
        let mut conn = self.conn()?;

        diesel::update(alerts::table.filter(alerts::is_read.eq(false)))
            .set(alerts::is_read.eq(true))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }
}

impl IngestStore for SqliteStore {
    async fn upsert_sports(&self, sports: &[Sport]) -> Result<usize> {
        let rows: Vec<SportRow> = sports.iter().map(SportRow::from).collect();
        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            for row in &rows {
                upsert_sport(conn, row)?;
            }
            Ok::<_, diesel::result::Error>(rows.len())
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn record_batch(&self, batch: &OddsBatch) -> Result<usize> {
        let observed_at = format_timestamp(&batch.observed_at);
        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let mut bookmaker_ids: HashMap<BookmakerKey, String> = HashMap::new();
            let mut written = 0;

            for event in &batch.events {
                upsert_sport(conn, &SportRow::from(&event.sport))?;
                let event_id = upsert_event(conn, event)?;

                let mut rows = Vec::with_capacity(event.quotes.len());
                for quote in &event.quotes {
                    let snap = &quote.snapshot;
                    let bm_id =
                        bookmaker_id(conn, &mut bookmaker_ids, &snap.bookmaker_key, &snap.bookmaker_name)?;
                    rows.push(OddsRow {
                        id: Uuid::new_v4().to_string(),
                        event_id: event_id.clone(),
                        bookmaker_id: bm_id,
                        market_type: quote.market_type.clone(),
                        outcome_name: snap.outcome_name.clone(),
                        price: snap.price.to_string(),
                        point: snap.point.map(|p| p.to_string()),
                        observed_at: observed_at.clone(),
                    });
                }

                for chunk in rows.chunks(INSERT_CHUNK) {
                    written += diesel::insert_into(odds_records::table)
                        .values(chunk)
                        .execute(conn)?;
                }
            }

            Ok::<_, diesel::result::Error>(written)
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn complete_events_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut conn = self.conn()?;

        diesel::update(
            events::table
                .filter(events::completed.eq(false))
                .filter(events::commence_time.lt(format_timestamp(&cutoff))),
        )
        .set(events::completed.eq(true))
        .execute(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))
    }
}
