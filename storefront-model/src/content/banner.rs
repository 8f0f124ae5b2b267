use super::{SectionContent, decode, entry_object, stable_image_url, text_field};
use crate::error::{NormalizationError, NormalizeResult};
use crate::section_type::SectionType;
use serde::Serialize;
use serde_json::{Map, Value};

const TYPE: SectionType = SectionType::Banner;

/// Top-level keys of the single-banner layout that predates `slides`.
const LEGACY_KEYS: [&str; 6] = [
    "image",
    "imageUrl",
    "title",
    "subtitle",
    "buttonText",
    "buttonLink",
];

/// A banner carousel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BannerContent {
    pub slides: Vec<Slide>,
}

/// One banner slide. Only the image is required.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_link: Option<String>,
}

impl Slide {
    /// A slide with just an image.
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: stable_image_url(image_url.into()),
            title: None,
            subtitle: None,
            button_text: None,
            button_link: None,
        }
    }
}

pub(super) fn normalize(raw: &Value) -> NormalizeResult<SectionContent> {
    let Some(value) = decode(TYPE, raw)? else {
        return Ok(SectionContent::Banner(BannerContent::default()));
    };

    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("slides") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None if has_legacy_keys(&map) => vec![Value::Object(map)],
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(NormalizationError::shape_mismatch(
                    TYPE,
                    "an array of slides",
                    &other,
                ));
            }
        },
        other => {
            return Err(NormalizationError::shape_mismatch(
                TYPE,
                "an object or an array",
                &other,
            ));
        }
    };

    let slides = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| slide_from_entry(index, entry))
        .collect::<NormalizeResult<Vec<_>>>()?;

    Ok(SectionContent::Banner(BannerContent { slides }))
}

fn has_legacy_keys(map: &Map<String, Value>) -> bool {
    LEGACY_KEYS.iter().any(|key| map.contains_key(*key))
}

fn slide_from_entry(index: usize, entry: &Value) -> NormalizeResult<Slide> {
    let map = entry_object(TYPE, index, entry)?;
    let image_url = text_field(TYPE, index, map, &["imageUrl", "image"])?.ok_or_else(|| {
        NormalizationError::invalid_entry(TYPE, index, "slide has no imageUrl", entry)
    })?;

    Ok(Slide {
        image_url: stable_image_url(image_url),
        title: text_field(TYPE, index, map, &["title"])?,
        subtitle: text_field(TYPE, index, map, &["subtitle"])?,
        button_text: text_field(TYPE, index, map, &["buttonText"])?,
        button_link: text_field(TYPE, index, map, &["buttonLink"])?,
    })
}
