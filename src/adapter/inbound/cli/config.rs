//! Handlers for the `config` command group.

use serde_json::json;

use crate::adapter::inbound::cli::context::GlobalArgs;
use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::{Config, API_KEY_ENV};

/// Execute `config validate`. A missing file is an error here.
pub fn execute_validate(global: &GlobalArgs) -> Result<()> {
    if !global.config.exists() {
        return Err(ConfigError::ReadFile(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", global.config.display()),
        ))
        .into());
    }
    let config = Config::load(&global.config)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "valid": true,
            "path": global.config.display().to_string(),
            "api_key_set": config.api_key.is_some(),
        }));
        return Ok(());
    }

    output::success(&format!("{} is valid", global.config.display()));
    if config.api_key.is_none() {
        output::warning(&format!("{API_KEY_ENV} is not set; scraping will fail"));
    }
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "database": config.database,
            "feed": {
                "api_url": config.feed.api_url,
                "regions": config.feed.regions,
                "markets": config.feed.markets,
                "sports": config.feed.sports,
            },
            "analysis": {
                "min_profit_pct": config.analysis.min_profit_pct,
                "min_edge_pct": config.analysis.min_edge_pct,
                "min_movement_pct": config.analysis.min_movement_pct,
                "sharp_books": config.analysis.sharp_books,
                "movement_alerts": config.analysis.movement_alerts,
            },
            "scheduler": {
                "interval_secs": config.scheduler.interval_secs,
                "completion_grace_hours": config.scheduler.completion_grace_hours,
            },
            "api_key_set": config.api_key.is_some(),
        }));
        return Ok(());
    }

    output::section("Storage");
    output::field("Database", &config.database);

    output::section("Feed");
    output::field("API", &config.feed.api_url);
    output::field("Regions", &config.feed.regions);
    output::field("Markets", &config.feed.markets);
    output::field("Sports", config.feed.sports.join(", "));
    output::field(
        "API key",
        if config.api_key.is_some() {
            output::positive("set")
        } else {
            output::negative("missing")
        },
    );

    output::section("Analysis");
    output::field("Min profit", format!("{}%", config.analysis.min_profit_pct));
    output::field("Min edge", format!("{}%", config.analysis.min_edge_pct));
    output::field("Min movement", format!("{}%", config.analysis.min_movement_pct));
    output::field("Sharp books", config.analysis.sharp_books.join(", "));
    output::field("Move alerts", config.analysis.movement_alerts);

    output::section("Scheduler");
    output::field("Interval", format!("{}s", config.scheduler.interval_secs));
    output::field(
        "Grace",
        format!("{}h", config.scheduler.completion_grace_hours),
    );
    Ok(())
}
