use super::{SectionContent, decode, entry_list};
use crate::error::{NormalizationError, NormalizeResult, json_kind};
use crate::section_type::SectionType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const TYPE: SectionType = SectionType::Products;

/// A product carousel, referencing catalogue products by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductsContent {
    #[serde(rename = "productIds")]
    pub product_ids: Vec<ProductId>,
}

/// A catalogue product id. The catalogue uses both numeric and string ids,
/// and each keeps its JSON kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{n}"),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        ProductId::Number(n)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId::Text(s.to_string())
    }
}

pub(super) fn normalize(raw: &Value) -> NormalizeResult<SectionContent> {
    let Some(value) = decode(TYPE, raw)? else {
        return Ok(SectionContent::Products(ProductsContent::default()));
    };

    let product_ids = entry_list(TYPE, value, "productIds")?
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::String(s) => Ok(ProductId::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(ProductId::Number).ok_or_else(|| {
                NormalizationError::invalid_entry(
                    TYPE,
                    index,
                    "product id must be an integer",
                    entry,
                )
            }),
            other => Err(NormalizationError::invalid_entry(
                TYPE,
                index,
                format!("product id must be a string or an integer, found {}", json_kind(other)),
                entry,
            )),
        })
        .collect::<NormalizeResult<Vec<_>>>()?;

    Ok(SectionContent::Products(ProductsContent { product_ids }))
}
