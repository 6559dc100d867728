use clap::builder::ValueParser;

use crate::env::Env;
use crate::error::{Context, Error};
use crate::parse::DomainReference;

use super::secure_zone::resolve_zone;
use super::Setup;

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub struct DisableDnssec {
    /// The zone name or domain id
    #[arg(value_name = "DOMAIN", value_parser = ValueParser::new(DomainReference::parse))]
    domain: DomainReference,
}

impl DisableDnssec {
    pub fn execute(self, env: impl Env, setup: &Setup) -> Result<(), Error> {
        let zone = resolve_zone(&env, setup, &self.domain)?;
        setup
            .runner
            .disable_zone(&env, &zone)
            .map_err(Error::from)
            .with_context(|| format!("disabling DNSSEC for {zone}"))?;
        writeln!(env.stdout(), "disabled DNSSEC for {zone}");
        Ok(())
    }
}
