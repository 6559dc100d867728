use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Mutex;

use super::{Env, ProcessOutput, Stream};

/// Use real I/O
pub struct RealEnv;

impl Env for RealEnv {
    fn args_os(&self) -> impl Iterator<Item = OsString> {
        std::env::args_os()
    }

    fn stdout(&self) -> Stream<impl io::Write> {
        let stdout = io::stdout();
        Stream {
            is_terminal: stdout.is_terminal(),
            writer: Mutex::new(stdout),
        }
    }

    fn stderr(&self) -> Stream<impl io::Write + Send + Sync + 'static> {
        let stderr = io::stderr();
        Stream {
            is_terminal: stderr.is_terminal(),
            writer: Mutex::new(stderr),
        }
    }

    fn in_cwd<'a>(&self, path: &'a impl AsRef<Path>) -> Cow<'a, Path> {
        let path = path.as_ref();
        if path.is_relative() {
            if let Ok(cwd) = std::env::current_dir() {
                return cwd.join(path).into();
            }
        }
        path.into()
    }

    fn execute(&self, program: &Path, args: &[&OsStr]) -> io::Result<ProcessOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&output.status);
        #[cfg(not(unix))]
        let signal = None;

        Ok(ProcessOutput {
            code: output.status.code(),
            signal,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
