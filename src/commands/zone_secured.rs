use clap::builder::ValueParser;

use crate::env::Env;
use crate::error::{Context, Error};
use crate::parse::DomainReference;

use super::secure_zone::resolve_zone;
use super::Setup;

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub struct ZoneSecured {
    /// The zone name or domain id
    #[arg(value_name = "DOMAIN", value_parser = ValueParser::new(DomainReference::parse))]
    domain: DomainReference,
}

impl ZoneSecured {
    pub fn execute(self, env: impl Env, setup: &Setup) -> Result<(), Error> {
        let zone = resolve_zone(&env, setup, &self.domain)?;
        let secured = setup
            .runner
            .zone_secured(&env, &zone)
            .map_err(Error::from)
            .with_context(|| format!("querying {zone}"))?;
        if secured {
            writeln!(env.stdout(), "{zone} is secured");
        } else {
            writeln!(env.stdout(), "{zone} is not secured");
        }
        Ok(())
    }
}
