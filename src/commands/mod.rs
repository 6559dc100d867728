//! The commands of _dnssec-runner_.
pub mod check;
pub mod disable_dnssec;
pub mod rectify_zone;
pub mod secure_zone;
pub mod zone_secured;

use std::path::PathBuf;

use crate::database::JsonDomainStore;
use crate::env::Env;
use crate::error::Error;
use crate::runner::CommandRunner;

#[derive(Clone, Debug, clap::Subcommand)]
pub enum Command {
    /// Check that the DNSSEC utility can be run
    ///
    /// Prints the path of the utility when it is configured, exists and is
    /// executable. Fails otherwise.
    #[command(name = "check")]
    Check(self::check::Check),

    /// Enable DNSSEC for a zone
    ///
    /// Runs `secure-zone` for the zone. DOMAIN is either a zone name or the
    /// id of a domain in the domain store.
    #[command(name = "secure-zone")]
    SecureZone(self::secure_zone::SecureZone),

    /// Disable DNSSEC for a zone
    ///
    /// Runs `disable-dnssec` for the zone. DOMAIN is either a zone name or
    /// the id of a domain in the domain store.
    #[command(name = "disable-dnssec")]
    DisableDnssec(self::disable_dnssec::DisableDnssec),

    /// Report whether a zone is secured with DNSSEC
    ///
    /// Runs `show-zone` for the zone and looks at what it reports.
    #[command(name = "zone-secured")]
    ZoneSecured(self::zone_secured::ZoneSecured),

    /// Rectify a zone
    ///
    /// Runs `rectify-zone` for the zone whenever the utility is configured.
    /// Without the utility, this only fails if the domain has metadata in the
    /// domain store.
    #[command(name = "rectify-zone")]
    RectifyZone(self::rectify_zone::RectifyZone),
}

/// Everything a command needs besides its own arguments.
#[derive(Clone, Debug)]
pub struct Setup {
    pub runner: CommandRunner,

    /// Path of the domain store, if any.
    pub database: Option<PathBuf>,
}

impl Setup {
    /// Load the domain store.
    ///
    /// Without a configured store this is an empty store, so only zone
    /// names can be used to refer to domains.
    pub fn store(&self, env: &impl Env) -> Result<JsonDomainStore, Error> {
        JsonDomainStore::load_or_empty(env, self.database.as_deref())
    }
}

impl Command {
    pub fn execute(self, env: impl Env, setup: &Setup) -> Result<(), Error> {
        match self {
            Self::Check(check) => check.execute(env, setup),
            Self::SecureZone(secure) => secure.execute(env, setup),
            Self::DisableDnssec(disable) => disable.execute(env, setup),
            Self::ZoneSecured(secured) => secured.execute(env, setup),
            Self::RectifyZone(rectify) => rectify.execute(env, setup),
        }
    }
}
