//! Caller-supplied section keys.
//!
//! Older call sites address sections by their `order` value; newer ones use
//! the persistent id. A key that reads as a plain integer is an ordinal,
//! everything else is a persistent id.

use crate::{Error, Result, SectionId};
use std::fmt;
use std::str::FromStr;

/// A reference to a section, either by persistent id or by legacy ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionKey {
    /// Opaque identifier assigned by the store.
    Id(SectionId),
    /// Legacy `order` value.
    Ordinal(i64),
}

impl SectionKey {
    /// Classifies a raw key.
    ///
    /// An optional leading `-` followed only by ASCII digits is an ordinal.
    /// Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyKey);
        }

        if looks_ordinal(trimmed) {
            let ordinal = trimmed
                .parse::<i64>()
                .map_err(|_| Error::OrdinalOutOfRange(trimmed.to_string()))?;
            return Ok(Self::Ordinal(ordinal));
        }

        Ok(Self::Id(SectionId::new(trimmed)))
    }

    /// Returns the ordinal, if this key is one.
    #[must_use]
    pub fn as_ordinal(&self) -> Option<i64> {
        match self {
            Self::Ordinal(order) => Some(*order),
            Self::Id(_) => None,
        }
    }

    /// Returns the persistent id, if this key is one.
    #[must_use]
    pub fn as_id(&self) -> Option<&SectionId> {
        match self {
            Self::Id(id) => Some(id),
            Self::Ordinal(_) => None,
        }
    }
}

fn looks_ordinal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Ordinal(order) => write!(f, "{order}"),
        }
    }
}

impl FromStr for SectionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<SectionId> for SectionKey {
    fn from(id: SectionId) -> Self {
        Self::Id(id)
    }
}

impl From<&SectionId> for SectionKey {
    fn from(id: &SectionId) -> Self {
        Self::Id(id.clone())
    }
}

impl From<i64> for SectionKey {
    fn from(order: i64) -> Self {
        Self::Ordinal(order)
    }
}

impl From<i32> for SectionKey {
    fn from(order: i32) -> Self {
        Self::Ordinal(i64::from(order))
    }
}

/// Infallible conversion for string literals. An empty string becomes an
/// empty persistent id, which the store will reject as not found.
impl From<&str> for SectionKey {
    fn from(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|_| Self::Id(SectionId::new(raw)))
    }
}
