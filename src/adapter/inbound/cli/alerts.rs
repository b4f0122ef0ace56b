//! Handlers for the `alerts` command group.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::AlertListArgs;
use crate::adapter::inbound::cli::context::GlobalArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::{Alert, AlertId};
use crate::error::{Error, Result};
use crate::infrastructure::factory::persistence::build_store;
use crate::port::outbound::store::{AlertQuery, AlertStore};

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Read")]
    read: &'static str,
}

impl From<&Alert> for AlertRow {
    fn from(alert: &Alert) -> Self {
        Self {
            id: alert.id.to_string(),
            kind: alert.kind.to_string(),
            title: alert.title.clone(),
            created: alert.created_at.format("%Y-%m-%d %H:%M").to_string(),
            read: if alert.is_read { "yes" } else { "" },
        }
    }
}

/// Execute `alerts list`.
pub async fn execute_list(global: &GlobalArgs, args: &AlertListArgs) -> Result<()> {
    let config = global.load_config()?;
    let store = build_store(&config)?;

    let query = AlertQuery {
        kind: args.kind,
        unread_only: args.unread,
        limit: args.limit,
        offset: args.offset,
    };
    let alerts = store.list_alerts(&query).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "alerts.list",
            "alerts": alerts,
        }));
        return Ok(());
    }

    if alerts.is_empty() {
        output::note("No alerts");
        return Ok(());
    }
    output::table(alerts.iter().map(AlertRow::from).collect());
    Ok(())
}

/// Execute `alerts read <ID>`.
pub async fn execute_read(global: &GlobalArgs, id: &str) -> Result<()> {
    let config = global.load_config()?;
    let store = build_store(&config)?;

    if !store.mark_read(&AlertId::from(id)).await? {
        return Err(Error::NotFound {
            entity: "alert",
            id: id.to_string(),
        });
    }

    if output::is_json() {
        output::json_output(json!({ "command": "alerts.read", "id": id }));
    } else {
        output::success(&format!("Marked {id} read"));
    }
    Ok(())
}

/// Execute `alerts read-all`.
pub async fn execute_read_all(global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    let store = build_store(&config)?;
    let changed = store.mark_all_read().await?;

    if output::is_json() {
        output::json_output(json!({ "command": "alerts.read_all", "marked": changed }));
    } else {
        output::success(&format!("Marked {changed} alerts read"));
    }
    Ok(())
}
