use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::{fmt, io};

use crate::error::Error;
use crate::{parse_args, run, Args};

use super::{Env, ProcessOutput, Stream};

/// A command to run in a [`FakeEnv`]
///
/// This is used for testing the utilities, running the real code in a fake
/// environment.
#[derive(Clone)]
pub struct FakeCmd {
    /// The command to run, including `argv[0]`
    cmd: Vec<OsString>,
    cwd: Option<PathBuf>,
    process: Option<FakeProcess>,
}

/// The scripted behaviour of every child process spawned in a [`FakeEnv`]
#[derive(Clone, Debug, Default)]
pub struct FakeProcess {
    pub code: Option<i32>,
    pub signal: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// A child process that was spawned in a [`FakeEnv`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

/// The result of running a [`FakeCmd`]
///
/// The fields are public to allow for easy assertions in tests.
#[derive(Debug)]
pub struct FakeResult {
    pub exit_code: u8,
    pub stdout: String,
    pub stderr: String,
    pub invocations: Vec<Invocation>,
}

/// An environment that mocks interaction with the outside world
pub struct FakeEnv {
    /// Description of the command being run
    pub cmd: FakeCmd,

    /// The mocked stdout
    pub stdout: FakeStream,

    /// The mocked stderr
    pub stderr: FakeStream,

    /// Every child process spawned so far
    pub invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl Env for FakeEnv {
    fn args_os(&self) -> impl Iterator<Item = OsString> {
        self.cmd.cmd.iter().map(Into::into)
    }

    fn stdout(&self) -> Stream<impl io::Write> {
        Stream {
            writer: Mutex::new(self.stdout.clone()),
            is_terminal: false,
        }
    }

    fn stderr(&self) -> Stream<impl io::Write + Send + Sync + 'static> {
        Stream {
            writer: Mutex::new(self.stderr.clone()),
            is_terminal: false,
        }
    }

    fn in_cwd<'a>(&self, path: &'a impl AsRef<Path>) -> Cow<'a, Path> {
        match &self.cmd.cwd {
            Some(cwd) => cwd.join(path).into(),
            None => path.as_ref().into(),
        }
    }

    fn execute(&self, program: &Path, args: &[&OsStr]) -> io::Result<ProcessOutput> {
        let Some(process) = &self.cmd.process else {
            panic!("Tried spawning a process without setting up a fake process")
        };

        self.invocations.lock().unwrap().push(Invocation {
            program: program.to_path_buf(),
            args: args.iter().map(|arg| arg.to_os_string()).collect(),
        });

        Ok(ProcessOutput {
            code: process.code,
            signal: process.signal,
            stdout: process.stdout.clone().into_bytes(),
            stderr: process.stderr.clone().into_bytes(),
        })
    }
}

impl FakeProcess {
    /// A process that exits normally with the given code
    pub fn exit(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Default::default()
        }
    }

    /// A process that is killed by the given signal
    pub fn killed(signal: i32) -> Self {
        Self {
            signal: Some(signal),
            ..Default::default()
        }
    }

    pub fn stdout(self, stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..self
        }
    }

    pub fn stderr(self, stderr: impl Into<String>) -> Self {
        Self {
            stderr: stderr.into(),
            ..self
        }
    }
}

impl FakeCmd {
    /// Construct a new [`FakeCmd`] with a given command.
    ///
    /// The command can consist of multiple strings to specify a subcommand.
    pub fn new<S: Into<OsString>>(cmd: impl IntoIterator<Item = S>) -> Self {
        Self {
            cmd: cmd.into_iter().map(Into::into).collect(),
            cwd: None,
            process: None,
        }
    }

    pub fn cwd(&self, path: impl AsRef<Path>) -> Self {
        Self {
            cwd: Some(path.as_ref().to_path_buf()),
            ..self.clone()
        }
    }

    /// Script the child processes spawned by this command
    pub fn process(&self, process: FakeProcess) -> Self {
        Self {
            process: Some(process),
            ..self.clone()
        }
    }

    /// Add arguments to a clone of the [`FakeCmd`]
    ///
    /// ```rust,ignore
    /// let cmd = FakeCmd::new(["dnssec-runner"])
    /// let sub1 = cmd.args(["sub1"]);  // dnssec-runner sub1
    /// let sub2 = cmd.args(["sub2"]);  // dnssec-runner sub2
    /// let sub3 = sub2.args(["sub3"]); // dnssec-runner sub2 sub3
    /// ```
    pub fn args<S: Into<OsString>>(&self, args: impl IntoIterator<Item = S>) -> Self {
        let mut new = self.clone();
        new.cmd.extend(args.into_iter().map(Into::into));
        new
    }

    /// Build the [`FakeEnv`] this command runs in
    pub fn env(&self) -> FakeEnv {
        FakeEnv {
            cmd: self.clone(),
            stdout: Default::default(),
            stderr: Default::default(),
            invocations: Default::default(),
        }
    }

    /// Parse the arguments of this [`FakeCmd`] and return the result
    pub fn parse(&self) -> Result<Args, Error> {
        debug_assert!(
            self.process.is_none(),
            "We shouldn't need child processes for argument parsing"
        );
        parse_args(self.env())
    }

    /// Run the [`FakeCmd`] in a [`FakeEnv`], returning a [`FakeResult`]
    pub fn run(&self) -> FakeResult {
        let env = self.env();

        let exit_code = run(&env);

        FakeResult {
            exit_code,
            stdout: env.get_stdout(),
            stderr: env.get_stderr(),
            invocations: env.get_invocations(),
        }
    }
}

impl FakeEnv {
    pub fn get_stdout(&self) -> String {
        String::from_utf8(self.stdout.0.lock().unwrap().clone()).unwrap()
    }

    pub fn get_stderr(&self) -> String {
        String::from_utf8(self.stderr.0.lock().unwrap().clone()).unwrap()
    }

    pub fn get_invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

/// A type to used to mock stdout and stderr
#[derive(Clone, Default)]
pub struct FakeStream(Arc<Mutex<Vec<u8>>>);

impl io::Write for FakeStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // do nothing
        Ok(())
    }
}

impl fmt::Display for FakeStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(std::str::from_utf8(&self.0.lock().unwrap()).unwrap())
    }
}
