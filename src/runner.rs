//! Running the PowerDNS DNSSEC utility.
//!
//! [`CommandRunner`] spawns `pdnssec` (or its successor `pdnsutil`) with a
//! subcommand and arguments and reports the output lines and exit code. The
//! zone operations used by the administration tool are built on top of it.
//!
//! No shell is involved: the subcommand and every argument end up in the
//! argument vector of the child as they are.

use std::ffi::OsStr;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::database::DomainStore;
use crate::env::{Env, ProcessOutput};
use crate::error::Error;
use crate::parse::{DomainId, ZoneName};

/// The exit code reported when the utility was not run at all.
pub const NOT_RUN: i32 = -1;

/// Text printed by `show-zone` for zones without active keys.
const NOT_SECURED_MARKER: &str = "is not actively secured";

//------------ Subcommand ----------------------------------------------------

/// The subcommands of the DNSSEC utility that are used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subcommand {
    SecureZone,
    DisableDnssec,
    ShowZone,
    RectifyZone,
}

impl Subcommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Subcommand::SecureZone => "secure-zone",
            Subcommand::DisableDnssec => "disable-dnssec",
            Subcommand::ShowZone => "show-zone",
            Subcommand::RectifyZone => "rectify-zone",
        }
    }
}

impl AsRef<OsStr> for Subcommand {
    fn as_ref(&self) -> &OsStr {
        self.as_str().as_ref()
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//------------ ExecutionResult -----------------------------------------------

/// The outcome of a single run of the utility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    /// The lines written to stdout.
    pub output: Vec<String>,

    /// The exit code, [`NOT_RUN`] if nothing was run.
    ///
    /// A process killed by a signal gets `128 + signal`, as a shell would
    /// report it.
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn not_run() -> Self {
        Self {
            output: Vec::new(),
            exit_code: NOT_RUN,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    fn from_process(output: &ProcessOutput) -> Self {
        let exit_code = match (output.code, output.signal) {
            (Some(code), _) => code,
            (None, Some(signal)) => 128 + signal,
            (None, None) => NOT_RUN,
        };
        Self {
            output: String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(|line| line.trim_end().to_string())
                .collect(),
            exit_code,
        }
    }
}

//------------ RectifyOutcome ------------------------------------------------

/// What [`CommandRunner::rectify_zone`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RectifyOutcome {
    /// The zone was rectified.
    Rectified,

    /// No utility is configured and the domain has no metadata, so there
    /// was nothing to do.
    Skipped,
}

impl RectifyOutcome {
    pub fn applied(self) -> bool {
        matches!(self, RectifyOutcome::Rectified)
    }
}

//------------ DnssecError ---------------------------------------------------

/// Why a DNSSEC operation was not applied.
#[derive(Debug)]
pub enum DnssecError {
    /// Spawning processes is not allowed in this environment.
    ExecNotAllowed,

    /// No path to the utility is configured.
    CommandNotConfigured,

    /// The configured path does not exist.
    CommandMissing(PathBuf),

    /// The configured path is not an executable file.
    CommandNotExecutable(PathBuf),

    /// The utility could not be started.
    Spawn { path: PathBuf, reason: String },

    /// `secure-zone` exited unsuccessfully.
    SecureZone { exit_code: i32 },

    /// `disable-dnssec` exited unsuccessfully.
    DisableZone { exit_code: i32 },

    /// `show-zone` exited unsuccessfully.
    ShowZone { exit_code: i32 },

    /// `rectify-zone` exited unsuccessfully.
    RectifyZone { exit_code: i32 },

    /// The domain has DNSSEC metadata but no utility is configured.
    MetadataWithoutCommand { domain: DomainId },

    /// The domain store failed.
    Store(Error),
}

impl DnssecError {
    /// Whether this error means the utility cannot be run at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DnssecError::ExecNotAllowed
                | DnssecError::CommandNotConfigured
                | DnssecError::CommandMissing(_)
                | DnssecError::CommandNotExecutable(_)
        )
    }

    /// The exit code of the utility, if it ran.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            DnssecError::SecureZone { exit_code }
            | DnssecError::DisableZone { exit_code }
            | DnssecError::ShowZone { exit_code }
            | DnssecError::RectifyZone { exit_code } => Some(*exit_code),
            _ => None,
        }
    }
}

impl fmt::Display for DnssecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnssecError::ExecNotAllowed => {
                f.write_str("Failed to run the DNSSEC utility: spawning processes is not allowed.")
            }
            DnssecError::CommandNotConfigured => {
                f.write_str("Failed to call the DNSSEC utility: no pdnssec command is configured.")
            }
            DnssecError::CommandMissing(path) => write!(
                f,
                "Failed to call the DNSSEC utility: {} does not exist.",
                path.display()
            ),
            DnssecError::CommandNotExecutable(path) => write!(
                f,
                "Failed to call the DNSSEC utility: {} is not executable.",
                path.display()
            ),
            DnssecError::Spawn { path, reason } => write!(
                f,
                "Failed to call the DNSSEC utility {}: {reason}",
                path.display()
            ),
            DnssecError::SecureZone { .. } => f.write_str("Failed to secure zone."),
            DnssecError::DisableZone { .. } => f.write_str("Failed to disable DNSSEC for zone."),
            DnssecError::ShowZone { .. } => f.write_str("Failed to query DNSSEC status of zone."),
            DnssecError::RectifyZone { .. } => f.write_str("Failed to rectify zone."),
            DnssecError::MetadataWithoutCommand { domain } => write!(
                f,
                "Domain {domain} has DNSSEC metadata but no pdnssec command is configured."
            ),
            DnssecError::Store(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for DnssecError {}

impl From<Error> for DnssecError {
    fn from(err: Error) -> Self {
        DnssecError::Store(err)
    }
}

impl From<DnssecError> for Error {
    fn from(err: DnssecError) -> Self {
        match err {
            DnssecError::Store(err) => err,
            other => Error::error(&other.to_string()),
        }
    }
}

//------------ CommandRunner -------------------------------------------------

/// Runs the DNSSEC utility.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandRunner {
    /// Path of the utility.
    command: Option<PathBuf>,

    /// Whether spawning processes is allowed.
    allow_exec: bool,
}

impl CommandRunner {
    pub fn new(command: Option<PathBuf>, allow_exec: bool) -> Self {
        Self {
            command,
            allow_exec,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pdnssec_command.clone(), config.allow_exec)
    }

    /// Check that the utility can be run.
    ///
    /// Returns the path to spawn, resolved against the working directory.
    /// The returned path always contains a directory part, so spawning it
    /// never searches `PATH`.
    pub fn check(&self, env: &impl Env) -> Result<PathBuf, DnssecError> {
        if !self.allow_exec {
            return Err(DnssecError::ExecNotAllowed);
        }
        let Some(command) = &self.command else {
            return Err(DnssecError::CommandNotConfigured);
        };

        let mut path = env.in_cwd(command).into_owned();
        if path.is_relative() {
            path = Path::new(".").join(path);
        }
        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(DnssecError::CommandMissing(command.clone()))
            }
            Err(err) => {
                debug!("cannot access {}: {err}", path.display());
                return Err(DnssecError::CommandNotExecutable(command.clone()));
            }
        };
        if !metadata.is_file() || !is_executable(&path) {
            return Err(DnssecError::CommandNotExecutable(command.clone()));
        }
        Ok(path)
    }

    /// Whether the utility can be run.
    pub fn is_available(&self, env: &impl Env) -> bool {
        match self.check(env) {
            Ok(_) => true,
            Err(err) => {
                warn!("{err}");
                false
            }
        }
    }

    /// Run the utility, failing if it cannot be run.
    pub fn execute<S: AsRef<OsStr>>(
        &self,
        env: &impl Env,
        subcommand: Subcommand,
        args: &[S],
    ) -> Result<ExecutionResult, DnssecError> {
        let path = self.check(env)?;

        let mut argv: Vec<&OsStr> = Vec::with_capacity(args.len() + 1);
        argv.push(subcommand.as_ref());
        argv.extend(args.iter().map(AsRef::as_ref));
        debug!("running {} {:?}", path.display(), argv);

        let output = env
            .execute(&path, &argv)
            .map_err(|e| DnssecError::Spawn {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        let result = ExecutionResult::from_process(&output);

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim_end();
        if result.success() {
            info!("{subcommand} exited successfully");
            if !stderr.is_empty() {
                debug!("{subcommand} stderr: {stderr}");
            }
        } else {
            info!("{subcommand} exited with code {}", result.exit_code);
            if !stderr.is_empty() {
                warn!("{subcommand} stderr: {stderr}");
            }
        }
        Ok(result)
    }

    /// Run the utility.
    ///
    /// If the utility cannot be run, nothing is spawned and the result has
    /// no output and an exit code of [`NOT_RUN`].
    pub fn run<S: AsRef<OsStr>>(
        &self,
        env: &impl Env,
        subcommand: Subcommand,
        args: &[S],
    ) -> ExecutionResult {
        self.execute(env, subcommand, args)
            .unwrap_or_else(|err| {
                warn!("{err}");
                ExecutionResult::not_run()
            })
    }

    /// Enable DNSSEC for a zone.
    pub fn secure_zone(&self, env: &impl Env, zone: &ZoneName) -> Result<(), DnssecError> {
        let result = self.execute(env, Subcommand::SecureZone, &[zone])?;
        if !result.success() {
            return Err(DnssecError::SecureZone {
                exit_code: result.exit_code,
            });
        }
        Ok(())
    }

    /// Disable DNSSEC for a zone.
    pub fn disable_zone(&self, env: &impl Env, zone: &ZoneName) -> Result<(), DnssecError> {
        let result = self.execute(env, Subcommand::DisableDnssec, &[zone])?;
        if !result.success() {
            return Err(DnssecError::DisableZone {
                exit_code: result.exit_code,
            });
        }
        Ok(())
    }

    /// Whether a zone is secured.
    ///
    /// Asks `show-zone`, which only reads. A zone counts as secured unless
    /// the utility reports that it is not actively secured.
    pub fn zone_secured(&self, env: &impl Env, zone: &ZoneName) -> Result<bool, DnssecError> {
        let result = self.execute(env, Subcommand::ShowZone, &[zone])?;
        if !result.success() {
            return Err(DnssecError::ShowZone {
                exit_code: result.exit_code,
            });
        }
        Ok(!result
            .output
            .iter()
            .any(|line| line.contains(NOT_SECURED_MARKER)))
    }

    /// Rectify the zone of a domain.
    ///
    /// When the utility is configured, every zone is rectified, with or
    /// without DNSSEC metadata: PowerDNS needs the auth and ordername columns
    /// of all zones once DNSSEC is used for any of them. Without the utility
    /// this is only an error if the domain does have metadata.
    pub fn rectify_zone(
        &self,
        env: &impl Env,
        store: &impl DomainStore,
        domain: DomainId,
    ) -> Result<RectifyOutcome, DnssecError> {
        let count = store.metadata_count(domain)?;

        if self.command.is_some() {
            let zone = store.zone_name(domain)?;
            let result = self.execute(env, Subcommand::RectifyZone, &[&zone])?;
            if !result.success() {
                return Err(DnssecError::RectifyZone {
                    exit_code: result.exit_code,
                });
            }
            Ok(RectifyOutcome::Rectified)
        } else if count >= 1 {
            Err(DnssecError::MetadataWithoutCommand { domain })
        } else {
            debug!("no pdnssec command configured, not rectifying domain {domain}");
            Ok(RectifyOutcome::Skipped)
        }
    }
}

/// Whether the current user may execute the file at `path`.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use rustix::fs::{access, Access};
    access(path, Access::EXEC_OK).is_ok()
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
