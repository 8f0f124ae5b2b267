//! Identifier types for storefront homepage sections.
//!
//! A section is addressed in two ways:
//! - [`SectionId`]: the opaque identifier assigned by the authoritative store
//! - an ordinal `order` value, used as a legacy key by older call sites
//!
//! [`SectionKey`] is what callers hand in when they do not know which of the
//! two they hold.

mod ids;
mod key;

pub use ids::SectionId;
pub use key::SectionKey;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("section key is empty")]
    EmptyKey,

    #[error("ordinal key out of range: {0}")]
    OrdinalOutOfRange(String),
}
