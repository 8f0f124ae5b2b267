//! Canonical section content and the normalizer that produces it.
//!
//! Each section type has one canonical shape. [`normalize`] accepts content
//! that is already structured, JSON-encoded in a string (possibly twice), or
//! in an older layout, and returns that canonical shape or an error that
//! points at the offending part of the payload.
//!
//! Dispatch is a single table from [`SectionType`] to a per-variant function;
//! adding a variant means adding a row to [`NORMALIZERS`].

mod banner;
mod categories;
mod custom;
mod icon_categories;
mod products;

pub use banner::{BannerContent, Slide};
pub use categories::{CategoriesContent, CategoryRef};
pub use custom::CustomContent;
pub use icon_categories::{IconCategoriesContent, IconCategory};
pub use products::{ProductId, ProductsContent};

use crate::error::{NormalizationError, NormalizeResult};
use crate::section_type::SectionType;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Stored in place of any `blob:` image reference.
pub const PLACEHOLDER_IMAGE: &str = "/uploads/placeholder.svg";

const BLOB_SCHEME: &str = "blob:";

/// How many times string-encoded content may be nested inside another string.
const MAX_STRING_NESTING: usize = 2;

type NormalizeFn = fn(&Value) -> NormalizeResult<SectionContent>;

const NORMALIZERS: [(SectionType, NormalizeFn); 5] = [
    (SectionType::Banner, banner::normalize),
    (SectionType::Categories, categories::normalize),
    (SectionType::Products, products::normalize),
    (SectionType::IconCategories, icon_categories::normalize),
    (SectionType::Custom, custom::normalize),
];

/// Normalizes raw content for the given section type.
///
/// `raw` may be any JSON value; a `Value::String` is treated as JSON-encoded
/// content. `null` and blank strings yield the type's empty content.
pub fn normalize(section_type: SectionType, raw: &Value) -> NormalizeResult<SectionContent> {
    let normalize_fn = NORMALIZERS
        .iter()
        .find(|(ty, _)| *ty == section_type)
        .map(|(_, f)| *f)
        .ok_or_else(|| NormalizationError::UnknownType {
            found: section_type.to_string(),
        })?;
    normalize_fn(raw)
}

/// Canonical content of a section. The variant is the section's type.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Banner(BannerContent),
    Categories(CategoriesContent),
    Products(ProductsContent),
    IconCategories(IconCategoriesContent),
    Custom(CustomContent),
}

impl SectionContent {
    /// Empty canonical content for a section type.
    #[must_use]
    pub fn empty(section_type: SectionType) -> Self {
        match section_type {
            SectionType::Banner => Self::Banner(BannerContent::default()),
            SectionType::Categories => Self::Categories(CategoriesContent::default()),
            SectionType::Products => Self::Products(ProductsContent::default()),
            SectionType::IconCategories => Self::IconCategories(IconCategoriesContent::default()),
            SectionType::Custom => Self::Custom(CustomContent::default()),
        }
    }

    /// The section type this content belongs to.
    #[must_use]
    pub fn section_type(&self) -> SectionType {
        match self {
            Self::Banner(_) => SectionType::Banner,
            Self::Categories(_) => SectionType::Categories,
            Self::Products(_) => SectionType::Products,
            Self::IconCategories(_) => SectionType::IconCategories,
            Self::Custom(_) => SectionType::Custom,
        }
    }

    /// True when there is nothing to render (no slides, no entries, empty custom block).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Banner(c) => c.slides.is_empty(),
            Self::Categories(c) => c.categories.is_empty(),
            Self::Products(c) => c.product_ids.is_empty(),
            Self::IconCategories(c) => c.categories.is_empty(),
            Self::Custom(c) => c.is_empty(),
        }
    }

    /// The canonical content as a JSON value, without the type tag.
    #[must_use]
    pub fn to_value(&self) -> Value {
        // Every canonical shape is string-keyed, so this cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl Serialize for SectionContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Banner(c) => c.serialize(serializer),
            Self::Categories(c) => c.serialize(serializer),
            Self::Products(c) => c.serialize(serializer),
            Self::IconCategories(c) => c.serialize(serializer),
            Self::Custom(c) => c.serialize(serializer),
        }
    }
}

// ── Shared helpers ───────────────────────────────────────────────

/// Resolves string-encoded content into a structured value.
///
/// Returns `None` for absent content (`null` or a blank string).
pub(crate) fn decode(section_type: SectionType, raw: &Value) -> NormalizeResult<Option<Value>> {
    let mut current = raw.clone();
    for _ in 0..=MAX_STRING_NESTING {
        match current {
            Value::Null => return Ok(None),
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                current = serde_json::from_str(trimmed).map_err(|e| {
                    NormalizationError::parse_failure(section_type, e.to_string(), &text)
                })?;
            }
            structured => return Ok(Some(structured)),
        }
    }
    Err(NormalizationError::shape_mismatch(
        section_type,
        "structured content",
        &current,
    ))
}

/// Extracts the entry list of a list-shaped content value.
///
/// Accepts a bare array or an object holding the array under `key`. An object
/// without the key (or with `null` under it) is an empty list.
pub(crate) fn entry_list(
    section_type: SectionType,
    value: Value,
    key: &str,
) -> NormalizeResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(NormalizationError::shape_mismatch(
                section_type,
                "an array",
                &other,
            )),
        },
        other => Err(NormalizationError::shape_mismatch(
            section_type,
            "an object or an array",
            &other,
        )),
    }
}

/// Borrows an entry as an object or reports it as invalid.
pub(crate) fn entry_object<'a>(
    section_type: SectionType,
    index: usize,
    entry: &'a Value,
) -> NormalizeResult<&'a Map<String, Value>> {
    match entry {
        Value::Object(map) => Ok(map),
        Value::Null => Err(NormalizationError::invalid_entry(
            section_type,
            index,
            "entry is missing",
            entry,
        )),
        other => Err(NormalizationError::invalid_entry(
            section_type,
            index,
            format!("entry must be an object, found {}", crate::error::json_kind(other)),
            entry,
        )),
    }
}

/// Reads the first present text field among `keys`.
///
/// `null` counts as absent; numbers and booleans are rendered as text;
/// arrays and objects are invalid.
pub(crate) fn text_field(
    section_type: SectionType,
    index: usize,
    entry: &Map<String, Value>,
    keys: &[&str],
) -> NormalizeResult<Option<String>> {
    for key in keys {
        match entry.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(Value::Number(n)) => return Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => return Ok(Some(b.to_string())),
            Some(other) => {
                return Err(NormalizationError::invalid_entry(
                    section_type,
                    index,
                    format!("field `{key}` must be text, found {}", crate::error::json_kind(other)),
                    &Value::Object(entry.clone()),
                ));
            }
        }
    }
    Ok(None)
}

/// Replaces an ephemeral `blob:` reference with the placeholder image.
///
/// Blob URLs only resolve inside the browser session that created them.
pub(crate) fn stable_image_url(url: String) -> String {
    if is_blob_url(&url) {
        PLACEHOLDER_IMAGE.to_string()
    } else {
        url
    }
}

pub(crate) fn is_blob_url(url: &str) -> bool {
    url.trim_start()
        .get(..BLOB_SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(BLOB_SCHEME))
}
