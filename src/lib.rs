//! Running the PowerDNS DNSSEC utility for zone administration tools.
//!
//! The [`runner`] module holds the library interface. The rest of the crate
//! makes it available as the `dnssec-runner` command.
pub mod args;
pub mod commands;
pub mod config;
pub mod database;
pub mod env;
pub mod error;
pub mod log;
pub mod parse;
pub mod runner;

use clap::Parser;

pub use self::args::Args;

use env::Env;
use error::Error;

/// Parse the command line arguments of the environment.
pub fn parse_args(env: impl Env) -> Result<Args, Error> {
    let args = Args::try_parse_from(env.args_os())?;
    Ok(args)
}

/// Run the program in the given environment and return its exit code.
pub fn run(env: impl Env) -> u8 {
    let res = parse_args(&env).and_then(|args| {
        let subscriber = log::subscriber(env.stderr(), args.verbose);
        tracing::subscriber::with_default(subscriber, || args.execute(&env))
    });

    match res {
        Ok(()) => 0,
        Err(err) => {
            err.pretty_print(&env);
            err.exit_code()
        }
    }
}
