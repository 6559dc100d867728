use core::fmt;
use core::str::FromStr;

use domain::base::Name;
use serde::Deserialize;

use crate::error::{bail, Error};

//------------ ZoneName ------------------------------------------------------

/// The name of a zone, checked to be safe to hand to the DNSSEC utility.
///
/// Zone names are lowercased and stored without a trailing dot, except for
/// the root zone which is kept as `.`. Only letters, digits, `-` and `_` may
/// appear in labels and no label may start with a `-`, so a zone name can
/// never be mistaken for an option or carry shell metacharacters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct ZoneName(String);

impl ZoneName {
    pub fn parse(arg: &str) -> Result<Self, Error> {
        if arg.is_empty() {
            bail!("zone name is empty");
        }
        if arg == "." {
            return Ok(ZoneName(".".into()));
        }

        let lower = arg.to_ascii_lowercase();
        let trimmed = lower.strip_suffix('.').unwrap_or(&lower);

        for label in trimmed.split('.') {
            if label.is_empty() {
                bail!("invalid zone name '{arg}': empty label");
            }
            if label.starts_with('-') {
                bail!("invalid zone name '{arg}': label '{label}' starts with '-'");
            }
            if let Some(c) = label
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
            {
                bail!("invalid zone name '{arg}': unexpected character {c:?}");
            }
        }

        // Leave label and name lengths to the real thing.
        Name::<Vec<u8>>::from_str(trimmed)
            .map_err(|e| Error::from(format!("invalid zone name '{arg}': {e}")))?;

        Ok(ZoneName(trimmed.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ZoneName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ZoneName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl AsRef<std::ffi::OsStr> for ZoneName {
    fn as_ref(&self) -> &std::ffi::OsStr {
        self.0.as_ref()
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//------------ DomainId ------------------------------------------------------

/// The numeric identifier of a domain in the domain store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct DomainId(pub u32);

impl FromStr for DomainId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .map(DomainId)
            .map_err(|e| format!("invalid domain id '{s}': {e}").into())
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

//------------ DomainReference -----------------------------------------------

/// A domain given either by its zone name or by its id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainReference {
    Id(DomainId),
    Name(ZoneName),
}

impl DomainReference {
    /// Parse a domain reference.
    ///
    /// Anything consisting of ASCII digits only is taken to be an id.
    pub fn parse(arg: &str) -> Result<Self, Error> {
        if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) {
            arg.parse().map(DomainReference::Id)
        } else {
            ZoneName::parse(arg).map(DomainReference::Name)
        }
    }
}

impl FromStr for DomainReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DomainReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainReference::Id(id) => write!(f, "domain #{id}"),
            DomainReference::Name(name) => fmt::Display::fmt(name, f),
        }
    }
}
