//! CLI module graph.

pub mod alerts;
pub mod clv;
pub mod command;
pub mod config;
pub mod context;
pub mod events;
pub mod odds;
pub mod output;
pub mod paths;
pub mod run;
pub mod sports;

use command::{AlertsCommand, Cli, Commands, ConfigCommand, EventsCommand, OddsCommand};

use crate::error::Result;

/// Dispatch a parsed command line to its handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let global = context::GlobalArgs::from(&cli);
    global.apply_output();

    match cli.command {
        Commands::Run(args) => run::execute_run(&global, &args).await,
        Commands::Scrape(args) => run::execute_scrape(&global, &args).await,
        Commands::Analyze(args) => run::execute_analyze(&global, &args).await,
        Commands::Alerts(AlertsCommand::List(args)) => alerts::execute_list(&global, &args).await,
        Commands::Alerts(AlertsCommand::Read { id }) => alerts::execute_read(&global, &id).await,
        Commands::Alerts(AlertsCommand::ReadAll) => alerts::execute_read_all(&global).await,
        Commands::Sports(args) => sports::execute(&global, &args).await,
        Commands::Events(args) => match &args.command {
            Some(EventsCommand::Show { id }) => events::execute_show(&global, id).await,
            None => events::execute_list(&global, &args).await,
        },
        Commands::Odds(OddsCommand::List(args)) => odds::execute_list(&global, &args).await,
        Commands::Odds(OddsCommand::History(args)) => odds::execute_history(&global, &args).await,
        Commands::Odds(OddsCommand::Movements(args)) => {
            odds::execute_movements(&global, &args).await
        }
        Commands::Clv(args) => clv::execute(&args),
        Commands::Config(ConfigCommand::Validate) => config::execute_validate(&global),
        Commands::Config(ConfigCommand::Show) => config::execute_show(&global),
    }
}
