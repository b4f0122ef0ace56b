//! Handlers for the `events` command.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::EventsArgs;
use crate::adapter::inbound::cli::context::GlobalArgs;
use crate::adapter::inbound::cli::odds::{bookmaker_keys, find_event, HistoryRow};
use crate::adapter::inbound::cli::output;
use crate::application::alert::latest_per_series;
use crate::domain::Event;
use crate::error::Result;
use crate::infrastructure::factory::persistence::build_store;
use crate::port::outbound::store::{EventFilter, OddsStore};

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Sport")]
    sport: String,
    #[tabled(rename = "Matchup")]
    matchup: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Done")]
    completed: &'static str,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            sport: event.sport_key.clone(),
            matchup: event.matchup(),
            starts: event.commence_time.format("%Y-%m-%d %H:%M").to_string(),
            completed: if event.completed { "yes" } else { "" },
        }
    }
}

/// Execute `events`.
pub async fn execute_list(global: &GlobalArgs, args: &EventsArgs) -> Result<()> {
    let config = global.load_config()?;
    let store = build_store(&config)?;

    let filter = EventFilter {
        sport_key: args.sport.clone(),
        completed: args.completed,
        limit: args.limit,
        offset: args.offset,
    };
    let events = store.events(&filter).await?;

    if output::is_json() {
        output::json_output(json!({ "command": "events", "events": events }));
        return Ok(());
    }

    if events.is_empty() {
        output::note("No events");
        output::hint("run `sharpline scrape` to fetch odds");
        return Ok(());
    }
    output::table(events.iter().map(EventRow::from).collect());
    Ok(())
}

/// Execute `events show <ID>`.
pub async fn execute_show(global: &GlobalArgs, id: &str) -> Result<()> {
    let config = global.load_config()?;
    let store = build_store(&config)?;
    let event = find_event(store.as_ref(), id).await?;

    let latest = latest_per_series(store.latest_odds_first(&event.id).await?);

    if output::is_json() {
        output::json_output(json!({
            "command": "events.show",
            "event": event,
            "latest_odds": latest,
        }));
        return Ok(());
    }

    output::section(&event.matchup());
    output::field("ID", &event.id);
    output::field("Sport", &event.sport_key);
    output::field("Starts", event.commence_time.format("%Y-%m-%d %H:%M UTC"));
    output::field("Completed", if event.completed { "yes" } else { "no" });

    if latest.is_empty() {
        output::note("No odds recorded");
        return Ok(());
    }
    let keys = bookmaker_keys(store.as_ref()).await?;
    output::table(latest.iter().map(|r| HistoryRow::new(r, &keys)).collect());
    Ok(())
}
