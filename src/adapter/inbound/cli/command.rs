//! Command-line interface definitions.
//!
//! Defines the CLI structure for sharpline using `clap`. Subcommands cover
//! the periodic runner, one-off scrape and analysis passes, and read-only
//! queries over stored events, odds, and alerts.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use super::paths;
use crate::domain::AlertKind;

/// Sportsbook odds analysis: arbitrage, value bets, and line movement
#[derive(Parser, Debug)]
#[command(name = "sharpline")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the SQLite database (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync, scrape, and analyze on a fixed interval
    Run(RunArgs),

    /// Fetch and store current odds once
    Scrape(ScrapeArgs),

    /// Run one analysis pass over stored odds
    Analyze(AnalyzeArgs),

    /// Inspect and acknowledge alerts
    #[command(subcommand)]
    Alerts(AlertsCommand),

    /// List the synced sports catalog
    Sports(SportsArgs),

    /// List events, or show one with its latest odds
    Events(EventsArgs),

    /// Inspect stored odds
    #[command(subcommand)]
    Odds(OddsCommand),

    /// Compute closing line value for a bet
    Clv(ClvArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for `run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}

/// Arguments for `scrape`.
#[derive(Parser, Debug)]
pub struct ScrapeArgs {
    /// Scrape one sport instead of every configured sport
    #[arg(long)]
    pub sport: Option<String>,
}

/// Arguments for `analyze`.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Print alerts without storing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Subcommands for `sharpline alerts`.
#[derive(Subcommand, Debug)]
pub enum AlertsCommand {
    /// List alerts, newest first
    List(AlertListArgs),
    /// Mark one alert read
    Read {
        /// Alert ID
        id: String,
    },
    /// Mark every alert read
    ReadAll,
}

/// Arguments for `alerts list`.
#[derive(Parser, Debug)]
pub struct AlertListArgs {
    /// Filter by kind [arbitrage, value_bet, line_movement]
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<AlertKind>,

    /// Only unread alerts
    #[arg(long)]
    pub unread: bool,

    /// Maximum rows (1-200)
    #[arg(long, default_value_t = 50)]
    pub limit: u32,

    /// Rows to skip
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

fn parse_kind(raw: &str) -> Result<AlertKind, String> {
    raw.parse()
}

/// Arguments for `sports`.
#[derive(Parser, Debug)]
pub struct SportsArgs {
    /// Include inactive sports
    #[arg(long)]
    pub all: bool,
}

/// Arguments for `events`. Without a subcommand, lists events.
#[derive(Parser, Debug)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: Option<EventsCommand>,

    /// Filter by sport key (e.g. basketball_nba)
    #[arg(long)]
    pub sport: Option<String>,

    /// Filter by completion state
    #[arg(long)]
    pub completed: Option<bool>,

    /// Maximum rows
    #[arg(long, default_value_t = 50)]
    pub limit: u32,

    /// Rows to skip
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

/// Subcommands for `sharpline events`.
#[derive(Subcommand, Debug)]
pub enum EventsCommand {
    /// Show one event with the latest price of each series
    Show {
        /// Event ID
        id: String,
    },
}

/// Subcommands for `sharpline odds`.
#[derive(Subcommand, Debug)]
pub enum OddsCommand {
    /// Odds records across events, newest first
    List(OddsListArgs),
    /// Odds history for an event, oldest first
    History(OddsHistoryArgs),
    /// Line movements for an event
    Movements(MovementArgs),
}

/// Arguments for `odds list`.
#[derive(Parser, Debug)]
pub struct OddsListArgs {
    /// Only this event ID
    #[arg(long)]
    pub event: Option<String>,

    /// Only this bookmaker key
    #[arg(long)]
    pub bookmaker: Option<String>,

    /// Only this market type (e.g. h2h, spreads, totals)
    #[arg(long)]
    pub market: Option<String>,

    /// Maximum rows (1-500)
    #[arg(long, default_value_t = 100)]
    pub limit: u32,

    /// Rows to skip
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

/// Arguments for `odds history`.
#[derive(Parser, Debug)]
pub struct OddsHistoryArgs {
    /// Event ID
    pub event: String,

    /// Only this market type (e.g. h2h, spreads, totals)
    #[arg(long)]
    pub market: Option<String>,

    /// Only this bookmaker key
    #[arg(long)]
    pub bookmaker: Option<String>,
}

/// Arguments for `odds movements`.
#[derive(Parser, Debug)]
pub struct MovementArgs {
    /// Event ID
    pub event: String,

    /// Minimum absolute price change percentage
    #[arg(long, default_value = "2.0")]
    pub min_pct: Decimal,

    /// Only this market type
    #[arg(long)]
    pub market: Option<String>,

    /// Only this bookmaker key
    #[arg(long)]
    pub bookmaker: Option<String>,
}

/// Arguments for `clv`.
#[derive(Parser, Debug)]
pub struct ClvArgs {
    /// Decimal odds the bet was placed at
    pub bet: Decimal,

    /// Closing decimal odds
    pub close: Decimal,
}

/// Subcommands for `sharpline config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the configuration file
    Validate,
    /// Display the effective configuration with defaults applied
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "sharpline", "--json", "-q", "-vv", "--db", "odds.db", "analyze",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.db, Some(PathBuf::from("odds.db")));
        assert!(matches!(cli.command, Commands::Analyze(AnalyzeArgs { dry_run: false })));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sharpline", "events", "--json", "-c", "x.toml"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn config_defaults_under_home() {
        let cli = Cli::try_parse_from(["sharpline", "config", "validate"]).unwrap();
        assert!(cli.config.ends_with("config.toml"));
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommand::Validate)
        ));
    }

    #[test]
    fn parse_run_once() {
        let cli = Cli::try_parse_from(["sharpline", "run", "--once"]).unwrap();
        assert!(matches!(cli.command, Commands::Run(RunArgs { once: true })));
    }

    #[test]
    fn parse_alert_list_filters() {
        let cli = Cli::try_parse_from([
            "sharpline", "alerts", "list", "--kind", "value_bet", "--unread", "--limit", "10",
        ])
        .unwrap();
        let Commands::Alerts(AlertsCommand::List(args)) = cli.command else {
            panic!("expected alerts list");
        };
        assert_eq!(args.kind, Some(AlertKind::ValueBet));
        assert!(args.unread);
        assert_eq!(args.limit, 10);
        assert_eq!(args.offset, 0);
    }

    #[test]
    fn unknown_alert_kind_is_rejected() {
        let result = Cli::try_parse_from(["sharpline", "alerts", "list", "--kind", "parlay"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_clv_decimals() {
        let cli = Cli::try_parse_from(["sharpline", "clv", "2.10", "1.90"]).unwrap();
        let Commands::Clv(args) = cli.command else {
            panic!("expected clv");
        };
        assert_eq!(args.bet, dec!(2.10));
        assert_eq!(args.close, dec!(1.90));
    }

    #[test]
    fn movements_default_threshold() {
        let cli = Cli::try_parse_from(["sharpline", "odds", "movements", "evt-1"]).unwrap();
        let Commands::Odds(OddsCommand::Movements(args)) = cli.command else {
            panic!("expected odds movements");
        };
        assert_eq!(args.event, "evt-1");
        assert_eq!(args.min_pct, dec!(2.0));
    }

    #[test]
    fn events_completed_filter() {
        let cli = Cli::try_parse_from(["sharpline", "events", "--completed", "true"]).unwrap();
        let Commands::Events(args) = cli.command else {
            panic!("expected events");
        };
        assert_eq!(args.completed, Some(true));
        assert!(args.command.is_none());
    }

    #[test]
    fn events_sport_filter_and_show() {
        let cli = Cli::try_parse_from(["sharpline", "events", "--sport", "basketball_nba"]).unwrap();
        let Commands::Events(args) = cli.command else {
            panic!("expected events");
        };
        assert_eq!(args.sport.as_deref(), Some("basketball_nba"));

        let cli = Cli::try_parse_from(["sharpline", "events", "show", "evt-1"]).unwrap();
        let Commands::Events(EventsArgs {
            command: Some(EventsCommand::Show { id }),
            ..
        }) = cli.command
        else {
            panic!("expected events show");
        };
        assert_eq!(id, "evt-1");
    }

    #[test]
    fn sports_defaults_to_active_only() {
        let cli = Cli::try_parse_from(["sharpline", "sports"]).unwrap();
        assert!(matches!(cli.command, Commands::Sports(SportsArgs { all: false })));
        let cli = Cli::try_parse_from(["sharpline", "sports", "--all"]).unwrap();
        assert!(matches!(cli.command, Commands::Sports(SportsArgs { all: true })));
    }

    #[test]
    fn odds_list_filters_and_paging() {
        let cli = Cli::try_parse_from([
            "sharpline", "odds", "list", "--bookmaker", "fanduel", "--market", "h2h", "--offset",
            "20",
        ])
        .unwrap();
        let Commands::Odds(OddsCommand::List(args)) = cli.command else {
            panic!("expected odds list");
        };
        assert_eq!(args.event, None);
        assert_eq!(args.bookmaker.as_deref(), Some("fanduel"));
        assert_eq!(args.market.as_deref(), Some("h2h"));
        assert_eq!(args.limit, 100);
        assert_eq!(args.offset, 20);
    }
}
