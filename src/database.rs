//! The domain store.
//!
//! The runner needs two things from the database of the administration tool:
//! the zone name belonging to a domain id and the number of domain metadata
//! rows a domain has. [`DomainStore`] describes exactly that.
//! [`JsonDomainStore`] keeps the domains in a JSON file.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::env::Env;
use crate::error::{bail, Error};
use crate::parse::{DomainId, DomainReference, ZoneName};

//------------ DomainStore ---------------------------------------------------

pub trait DomainStore {
    /// The zone name of a domain.
    ///
    /// It is an error if the domain does not exist.
    fn zone_name(&self, id: DomainId) -> Result<ZoneName, Error>;

    /// The id of the domain with the given zone name.
    ///
    /// It is an error if the domain does not exist.
    fn domain_id(&self, zone: &ZoneName) -> Result<DomainId, Error>;

    /// The number of domain metadata rows of a domain.
    ///
    /// A domain that does not exist has no metadata.
    fn metadata_count(&self, id: DomainId) -> Result<usize, Error>;

    /// Turn a reference into a domain id and a zone name.
    fn resolve(&self, reference: &DomainReference) -> Result<(DomainId, ZoneName), Error> {
        match reference {
            DomainReference::Id(id) => Ok((*id, self.zone_name(*id)?)),
            DomainReference::Name(zone) => Ok((self.domain_id(zone)?, zone.clone())),
        }
    }

    /// Turn a reference into a zone name.
    ///
    /// Unlike [`DomainStore::resolve`] this does not need the store when a
    /// zone name is given.
    fn resolve_zone(&self, reference: &DomainReference) -> Result<ZoneName, Error> {
        match reference {
            DomainReference::Id(id) => self.zone_name(*id),
            DomainReference::Name(zone) => Ok(zone.clone()),
        }
    }
}

impl<S: DomainStore> DomainStore for &S {
    fn zone_name(&self, id: DomainId) -> Result<ZoneName, Error> {
        (**self).zone_name(id)
    }

    fn domain_id(&self, zone: &ZoneName) -> Result<DomainId, Error> {
        (**self).domain_id(zone)
    }

    fn metadata_count(&self, id: DomainId) -> Result<usize, Error> {
        (**self).metadata_count(id)
    }
}

//------------ Stored types --------------------------------------------------

/// The contents of the domain store file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreFile {
    #[serde(default)]
    pub domains: Vec<Domain>,
}

/// A domain and its metadata.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Domain {
    pub id: DomainId,
    pub name: ZoneName,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
}

/// A single domain metadata row, e.g. `NSEC3PARAM` or `ALSO-NOTIFY`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    pub kind: String,
    #[serde(default)]
    pub content: String,
}

//------------ JsonDomainStore -----------------------------------------------

/// A domain store kept in a JSON file.
#[derive(Clone, Debug, Default)]
pub struct JsonDomainStore {
    domains: BTreeMap<DomainId, Domain>,
    by_name: BTreeMap<ZoneName, DomainId>,
}

impl JsonDomainStore {
    /// A store without any domains.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from a list of domains.
    ///
    /// Ids and zone names have to be unique.
    pub fn from_domains(domains: impl IntoIterator<Item = Domain>) -> Result<Self, Error> {
        let mut store = Self::empty();
        for domain in domains {
            if store.domains.contains_key(&domain.id) {
                bail!("duplicate domain id {}", domain.id);
            }
            if store.by_name.contains_key(&domain.name) {
                bail!("duplicate zone name {}", domain.name);
            }
            store.by_name.insert(domain.name.clone(), domain.id);
            store.domains.insert(domain.id, domain);
        }
        Ok(store)
    }

    /// Load the store from a file.
    pub fn load(env: &impl Env, path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(env.in_cwd(&path))
            .map_err(|e| format!("unable to open domain store {}: {e}", path.display()))?;
        let contents: StoreFile = serde_json::from_reader(file).map_err::<Error, _>(|e| {
            format!("error loading domain store {}: {e}", path.display()).into()
        })?;
        let store = Self::from_domains(contents.domains)
            .map_err(|e| e.context(&format!("loading domain store {}", path.display())))?;
        debug!(
            "loaded {} domains from {}",
            store.domains.len(),
            path.display()
        );
        Ok(store)
    }

    /// Load the store from a file if one is given.
    pub fn load_or_empty(env: &impl Env, path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::load(env, path),
            None => Ok(Self::empty()),
        }
    }
}

impl DomainStore for JsonDomainStore {
    fn zone_name(&self, id: DomainId) -> Result<ZoneName, Error> {
        match self.domains.get(&id) {
            Some(domain) => Ok(domain.name.clone()),
            None => bail!("no domain with id {id}"),
        }
    }

    fn domain_id(&self, zone: &ZoneName) -> Result<DomainId, Error> {
        match self.by_name.get(zone) {
            Some(id) => Ok(*id),
            None => bail!("no domain for zone {zone}"),
        }
    }

    fn metadata_count(&self, id: DomainId) -> Result<usize, Error> {
        Ok(self
            .domains
            .get(&id)
            .map(|domain| domain.metadata.len())
            .unwrap_or(0))
    }
}
