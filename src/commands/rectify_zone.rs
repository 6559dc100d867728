use clap::builder::ValueParser;

use crate::database::DomainStore;
use crate::env::Env;
use crate::error::{Context, Error};
use crate::parse::DomainReference;
use crate::runner::RectifyOutcome;

use super::Setup;

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub struct RectifyZone {
    /// The zone name or domain id
    ///
    /// The domain has to be in the domain store.
    #[arg(value_name = "DOMAIN", value_parser = ValueParser::new(DomainReference::parse))]
    domain: DomainReference,
}

impl RectifyZone {
    pub fn execute(self, env: impl Env, setup: &Setup) -> Result<(), Error> {
        let store = setup.store(&env).context("loading the domain store")?;
        let (id, zone) = store
            .resolve(&self.domain)
            .with_context(|| format!("looking up {}", self.domain))?;

        let outcome = setup
            .runner
            .rectify_zone(&env, &store, id)
            .map_err(Error::from)
            .with_context(|| format!("rectifying {zone}"))?;
        match outcome {
            RectifyOutcome::Rectified => writeln!(env.stdout(), "rectified {zone}"),
            RectifyOutcome::Skipped => writeln!(env.stdout(), "nothing to rectify for {zone}"),
        }
        Ok(())
    }
}
