//! Output for humans on stderr.
//!
//! Direct messages such as the final error of a run go through [`log`].
//! Everything else is emitted with the [`tracing`] macros and ends up on the
//! same stream through the subscriber built by [`subscriber`].

use std::fmt::Display;
use std::io;
use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing::{Level, Subscriber};

use crate::env::{Env, Stream};

mod color {
    pub const BLUE: u8 = 34;
    pub const YELLOW: u8 = 33;
    pub const RED: u8 = 31;
}

fn color(level: Level) -> u8 {
    if level == Level::ERROR {
        color::RED
    } else if level == Level::WARN {
        color::YELLOW
    } else {
        color::BLUE
    }
}

/// Write a single message to stderr, prefixed with the program name.
pub fn log(env: impl Env, level: Level, text: impl Display) {
    let mut err = env.stderr();
    let prog = program_name(&env);

    if err.is_terminal() {
        let color = color(level);
        writeln!(err, "[{prog}] \x1B[{color}m{level}\x1B[0m: {text}");
    } else {
        writeln!(err, "[{prog}] {level}: {text}");
    }
}

/// The level filter for the number of `-v` flags given.
pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Build a subscriber that writes to the given stream.
///
/// Pass the stderr of the environment, see [`Env::stderr`].
pub fn subscriber<W>(stderr: Stream<W>, verbosity: u8) -> impl Subscriber + Send + Sync + 'static
where
    W: io::Write + Send + Sync + 'static,
{
    let ansi = stderr.is_terminal();
    tracing_subscriber::fmt()
        .with_writer(stderr)
        .with_max_level(level_filter(verbosity))
        .with_ansi(ansi)
        .with_target(false)
        .without_time()
        .finish()
}

fn program_name(env: &impl Env) -> String {
    env.args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").into())
}
