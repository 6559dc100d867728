use std::path::PathBuf;

use crate::commands::{Command, Setup};
use crate::config::Config;
use crate::env::Env;
use crate::error::{Context, Error};
use crate::runner::CommandRunner;

#[derive(Clone, Debug, clap::Parser)]
#[command(version, disable_help_subcommand = true)]
pub struct Args {
    /// Read settings from this JSON config file
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Path of the pdnssec or pdnsutil binary, overrides the config file
    #[arg(long = "pdnssec-command", value_name = "PATH", global = true)]
    pub pdnssec_command: Option<PathBuf>,

    /// Path of the domain store, overrides the config file
    #[arg(long = "database", value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// Log more, repeat for even more
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// The configuration with the command line overrides applied.
    pub fn config(&self, env: &impl Env) -> Result<Config, Error> {
        let mut config = Config::load_or_default(env, self.config.as_deref())?;
        if let Some(command) = &self.pdnssec_command {
            config.pdnssec_command = Some(command.clone());
        }
        if let Some(database) = &self.database {
            config.database = Some(database.clone());
        }
        Ok(config)
    }

    pub fn execute(self, env: impl Env) -> Result<(), Error> {
        let config = self.config(&env).context("reading the configuration")?;
        let setup = Setup {
            runner: CommandRunner::from_config(&config),
            database: config.database,
        };
        self.command.execute(env, &setup)
    }
}
