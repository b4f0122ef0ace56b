//! Shared setup for command handlers: config resolution and logging.

use std::path::PathBuf;

use tracing::debug;

use super::command::Cli;
use super::output::{self, OutputConfig};
use super::paths;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Global flags every handler sees.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub json: bool,
    pub quiet: bool,
    pub verbose: u8,
    pub db: Option<PathBuf>,
    pub config: PathBuf,
}

impl From<&Cli> for GlobalArgs {
    fn from(cli: &Cli) -> Self {
        Self {
            json: cli.json,
            quiet: cli.quiet,
            verbose: cli.verbose,
            db: cli.db.clone(),
            config: cli.config.clone(),
        }
    }
}

impl GlobalArgs {
    /// Configure terminal output from the global flags.
    pub fn apply_output(&self) {
        output::configure(OutputConfig::new(self.json, self.quiet));
    }

    /// Load the effective config and start logging.
    ///
    /// A missing config file means defaults, with the database under
    /// `~/.sharpline/`. `--db` always wins.
    pub fn load_config(&self) -> Result<Config> {
        let file_exists = self.config.exists();
        let mut config = Config::load_or_default(&self.config)?;

        if let Some(db) = &self.db {
            config.database = db.to_string_lossy().into_owned();
        } else if !file_exists {
            paths::ensure_home_dir()?;
            config.database = paths::default_database().to_string_lossy().into_owned();
        }

        match self.verbose {
            0 => {}
            1 => config.logging.level = "debug".to_string(),
            _ => config.logging.level = "trace".to_string(),
        }
        if self.quiet && self.verbose == 0 {
            config.logging.level = "warn".to_string();
        }
        config.init_logging();

        debug!(
            config = %self.config.display(),
            loaded = file_exists,
            database = %config.database,
            "Resolved configuration"
        );
        Ok(config)
    }
}
