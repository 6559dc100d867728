use crate::env::Env;
use crate::error::Error;

use super::Setup;

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub struct Check;

impl Check {
    pub fn execute(self, env: impl Env, setup: &Setup) -> Result<(), Error> {
        let path = setup.runner.check(&env)?;
        writeln!(env.stdout(), "{}", path.display());
        Ok(())
    }
}
