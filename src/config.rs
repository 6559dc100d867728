//! Configuration of the runner.
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::env::Env;
use crate::error::Error;

/// Settings that are read from the config file.
///
/// Every field can be left out of the file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path of the `pdnssec` or `pdnsutil` binary.
    ///
    /// When this is not set, no DNSSEC operations can be performed.
    #[serde(default)]
    pub pdnssec_command: Option<PathBuf>,

    /// Whether this host allows spawning processes at all.
    #[serde(default = "default_allow_exec")]
    pub allow_exec: bool,

    /// Path of the domain store.
    #[serde(default)]
    pub database: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pdnssec_command: None,
            allow_exec: default_allow_exec(),
            database: None,
        }
    }
}

/// Helper function for serde.
fn default_allow_exec() -> bool {
    true
}

impl Config {
    /// Load a config file.
    ///
    /// Relative paths inside the file are kept as they are. They are
    /// resolved against the working directory when used.
    pub fn load(env: &impl Env, path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(env.in_cwd(&path))
            .map_err(|e| format!("unable to open config file {}: {e}", path.display()))?;
        let config: Config = serde_json::from_reader(file).map_err::<Error, _>(|e| {
            format!("error loading config file {}: {e}", path.display()).into()
        })?;
        Ok(config)
    }

    /// Load a config file if one is given, use the defaults otherwise.
    pub fn load_or_default(env: &impl Env, path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::load(env, path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::env::fake::FakeCmd;

    #[test]
    fn defaults() {
        let env = FakeCmd::new(["dnssec-runner"]).env();
        let config = Config::load_or_default(&env, None).unwrap();
        assert_eq!(config.pdnssec_command, None);
        assert!(config.allow_exec);
        assert_eq!(config.database, None);
    }

    #[test]
    fn load_relative_to_cwd() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("runner.json"),
            r#"{ "pdnssec_command": "/usr/bin/pdnsutil", "database": "domains.json" }"#,
        )
        .unwrap();

        let env = FakeCmd::new(["dnssec-runner"]).cwd(&dir).env();
        let config = Config::load(&env, "runner.json").unwrap();
        assert_eq!(
            config,
            Config {
                pdnssec_command: Some("/usr/bin/pdnsutil".into()),
                allow_exec: true,
                database: Some("domains.json".into()),
            }
        );
    }

    #[test]
    fn exec_can_be_disallowed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("runner.json");
        fs::write(&path, r#"{ "allow_exec": false }"#).unwrap();

        let env = FakeCmd::new(["dnssec-runner"]).env();
        let config = Config::load(&env, &path).unwrap();
        assert!(!config.allow_exec);
    }

    #[test]
    fn rejects_unknown_keys_and_missing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("runner.json");
        fs::write(&path, r#"{ "pdnssec": "/usr/bin/pdnssec" }"#).unwrap();

        let env = FakeCmd::new(["dnssec-runner"]).env();
        let err = Config::load(&env, &path).unwrap_err();
        assert!(err.to_string().starts_with("error loading config file"));

        let err = Config::load(&env, dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().starts_with("unable to open config file"));
    }
}
