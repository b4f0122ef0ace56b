//! Handler for the `sports` command.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::SportsArgs;
use crate::adapter::inbound::cli::context::GlobalArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::Sport;
use crate::error::Result;
use crate::infrastructure::factory::persistence::build_store;
use crate::port::outbound::store::OddsStore;

#[derive(Tabled)]
struct SportRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

impl From<&Sport> for SportRow {
    fn from(sport: &Sport) -> Self {
        Self {
            key: sport.key.clone(),
            title: sport.title.clone(),
            active: if sport.active { "yes" } else { "" },
        }
    }
}

/// Execute `sports`.
pub async fn execute(global: &GlobalArgs, args: &SportsArgs) -> Result<()> {
    let config = global.load_config()?;
    let store = build_store(&config)?;

    let sports = store.sports(!args.all).await?;

    if output::is_json() {
        output::json_output(json!({ "command": "sports", "sports": sports }));
        return Ok(());
    }

    if sports.is_empty() {
        output::note("No sports");
        output::hint("run `sharpline run --once` to sync the catalog");
        return Ok(());
    }
    output::table(sports.iter().map(SportRow::from).collect());
    Ok(())
}
