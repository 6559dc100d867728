use clap::builder::ValueParser;

use crate::database::DomainStore;
use crate::env::Env;
use crate::error::{Context, Error};
use crate::parse::{DomainReference, ZoneName};

use super::Setup;

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub struct SecureZone {
    /// The zone name or domain id
    #[arg(value_name = "DOMAIN", value_parser = ValueParser::new(DomainReference::parse))]
    domain: DomainReference,
}

impl SecureZone {
    pub fn execute(self, env: impl Env, setup: &Setup) -> Result<(), Error> {
        let zone = resolve_zone(&env, setup, &self.domain)?;
        setup
            .runner
            .secure_zone(&env, &zone)
            .map_err(Error::from)
            .with_context(|| format!("securing {zone}"))?;
        writeln!(env.stdout(), "secured {zone}");
        Ok(())
    }
}

/// Find the zone name for a domain reference.
///
/// The domain store is only consulted for domain ids.
pub(super) fn resolve_zone(
    env: &impl Env,
    setup: &Setup,
    domain: &DomainReference,
) -> Result<ZoneName, Error> {
    match domain {
        DomainReference::Name(zone) => Ok(zone.clone()),
        DomainReference::Id(_) => setup
            .store(env)?
            .resolve_zone(domain)
            .with_context(|| format!("looking up {domain}")),
    }
}
