use crate::error::NormalizationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of homepage section variants.
///
/// The wire name is the kebab-case tag stored in a section's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    Banner,
    Categories,
    Products,
    IconCategories,
    Custom,
}

impl SectionType {
    /// Every variant, in declaration order.
    pub const ALL: [SectionType; 5] = [
        SectionType::Banner,
        SectionType::Categories,
        SectionType::Products,
        SectionType::IconCategories,
        SectionType::Custom,
    ];

    /// Returns the wire tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SectionType::Banner => "banner",
            SectionType::Categories => "categories",
            SectionType::Products => "products",
            SectionType::IconCategories => "icon-categories",
            SectionType::Custom => "custom",
        }
    }

    /// Parses a wire tag. Unknown tags are a normalization error.
    pub fn parse(tag: &str) -> Result<Self, NormalizationError> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == tag)
            .ok_or_else(|| NormalizationError::UnknownType {
                found: tag.to_string(),
            })
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = NormalizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
