//! Handlers for the `odds` command group.

use std::collections::HashMap;

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::{MovementArgs, OddsHistoryArgs, OddsListArgs};
use crate::adapter::inbound::cli::context::GlobalArgs;
use crate::adapter::inbound::cli::output;
use crate::application::alert::event_movements;
use crate::domain::{BookmakerId, BookmakerKey, Event, EventId, LineMovement, OddsRecord};
use crate::error::{Error, Result};
use crate::infrastructure::factory::persistence::build_store;
use crate::port::outbound::store::{HistoryFilter, OddsQuery, OddsStore};

#[derive(Tabled)]
pub(super) struct HistoryRow {
    #[tabled(rename = "Observed")]
    observed: String,
    #[tabled(rename = "Bookmaker")]
    bookmaker: String,
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Point")]
    point: String,
}

impl HistoryRow {
    pub(super) fn new(record: &OddsRecord, keys: &HashMap<BookmakerId, BookmakerKey>) -> Self {
        Self {
            observed: record.observed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            bookmaker: keys
                .get(&record.bookmaker_id)
                .map_or_else(|| record.bookmaker_id.to_string(), ToString::to_string),
            market: record.market_type.clone(),
            outcome: record.outcome_name.clone(),
            price: record.price.to_string(),
            point: record.point.map(|p| p.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Observed")]
    observed: String,
    #[tabled(rename = "Bookmaker")]
    bookmaker: String,
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Point")]
    point: String,
}

#[derive(Tabled)]
struct MovementRow {
    #[tabled(rename = "Bookmaker")]
    bookmaker: String,
    #[tabled(rename = "Market")]
    market: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Old")]
    old: String,
    #[tabled(rename = "New")]
    new: String,
    #[tabled(rename = "Change %")]
    change: String,
    #[tabled(rename = "At")]
    at: String,
}

impl From<&LineMovement> for MovementRow {
    fn from(m: &LineMovement) -> Self {
        Self {
            bookmaker: m.bookmaker_key.to_string(),
            market: m.market_type.clone(),
            outcome: m.outcome_name.clone(),
            old: m.old_price.to_string(),
            new: m.new_price.to_string(),
            change: output::signed(m.price_change_pct),
            at: m.new_timestamp.format("%m-%d %H:%M").to_string(),
        }
    }
}

fn history_filter(market: Option<&String>, bookmaker: Option<&String>) -> HistoryFilter {
    HistoryFilter {
        bookmaker: bookmaker.map(|b| BookmakerKey::new(b.as_str())),
        market_type: market.cloned(),
    }
}

pub(super) async fn find_event<S: OddsStore>(store: &S, id: &str) -> Result<Event> {
    store
        .event(&EventId::from(id))
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "event",
            id: id.to_string(),
        })
}

pub(super) async fn bookmaker_keys<S: OddsStore>(
    store: &S,
) -> Result<HashMap<BookmakerId, BookmakerKey>> {
    Ok(store
        .bookmakers()
        .await?
        .into_iter()
        .map(|b| (b.id, b.key))
        .collect())
}

/// Execute `odds list`.
pub async fn execute_list(global: &GlobalArgs, args: &OddsListArgs) -> Result<()> {
    let config = global.load_config()?;
    let store = build_store(&config)?;

    let query = OddsQuery {
        event_id: args.event.as_deref().map(EventId::from),
        bookmaker: args.bookmaker.as_deref().map(BookmakerKey::from),
        market_type: args.market.clone(),
        limit: args.limit,
        offset: args.offset,
    };
    let records = store.odds(&query).await?;

    if output::is_json() {
        output::json_output(json!({ "command": "odds.list", "odds": records }));
        return Ok(());
    }

    if records.is_empty() {
        output::note("No odds recorded");
        return Ok(());
    }

    let keys = bookmaker_keys(store.as_ref()).await?;
    let rows = records
        .iter()
        .map(|r| {
            let row = HistoryRow::new(r, &keys);
            ListRow {
                event: r.event_id.to_string(),
                observed: row.observed,
                bookmaker: row.bookmaker,
                market: row.market,
                outcome: row.outcome,
                price: row.price,
                point: row.point,
            }
        })
        .collect();
    output::table(rows);
    Ok(())
}

/// Execute `odds history <EVENT>`.
pub async fn execute_history(global: &GlobalArgs, args: &OddsHistoryArgs) -> Result<()> {
    let config = global.load_config()?;
    let store = build_store(&config)?;
    let event = find_event(store.as_ref(), &args.event).await?;

    let filter = history_filter(args.market.as_ref(), args.bookmaker.as_ref());
    let records = store.odds_history(&event.id, &filter).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "odds.history",
            "event": event,
            "odds": records,
        }));
        return Ok(());
    }

    output::section(&event.matchup());
    if records.is_empty() {
        output::note("No odds recorded");
        return Ok(());
    }

    let keys = bookmaker_keys(store.as_ref()).await?;
    output::table(records.iter().map(|r| HistoryRow::new(r, &keys)).collect());
    Ok(())
}

/// Execute `odds movements <EVENT>`.
pub async fn execute_movements(global: &GlobalArgs, args: &MovementArgs) -> Result<()> {
    let config = global.load_config()?;
    let store = build_store(&config)?;
    let event = find_event(store.as_ref(), &args.event).await?;

    let filter = history_filter(args.market.as_ref(), args.bookmaker.as_ref());
    let movements = event_movements(store.as_ref(), &event, &filter, args.min_pct).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "odds.movements",
            "min_pct": args.min_pct,
            "movements": movements,
        }));
        return Ok(());
    }

    output::section(&event.matchup());
    if movements.is_empty() {
        output::note(&format!("No movements of {}% or more", args.min_pct));
        return Ok(());
    }
    output::table(movements.iter().map(MovementRow::from).collect());
    Ok(())
}
