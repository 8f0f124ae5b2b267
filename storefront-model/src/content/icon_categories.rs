use super::{SectionContent, decode, entry_list, entry_object, stable_image_url, text_field};
use crate::error::NormalizeResult;
use crate::section_type::SectionType;
use serde::Serialize;
use serde_json::Value;

const TYPE: SectionType = SectionType::IconCategories;

/// A strip of small category icons.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IconCategoriesContent {
    pub categories: Vec<IconCategory>,
}

/// An icon link. Every field is always present; missing ones are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconCategory {
    pub name: String,
    pub image_url: String,
    pub link: String,
}

pub(super) fn normalize(raw: &Value) -> NormalizeResult<SectionContent> {
    let Some(value) = decode(TYPE, raw)? else {
        return Ok(SectionContent::IconCategories(
            IconCategoriesContent::default(),
        ));
    };

    let categories = entry_list(TYPE, value, "categories")?
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let map = entry_object(TYPE, index, entry)?;
            Ok(IconCategory {
                name: text_field(TYPE, index, map, &["name"])?.unwrap_or_default(),
                image_url: stable_image_url(
                    text_field(TYPE, index, map, &["imageUrl", "image"])?.unwrap_or_default(),
                ),
                link: text_field(TYPE, index, map, &["link"])?.unwrap_or_default(),
            })
        })
        .collect::<NormalizeResult<Vec<_>>>()?;

    Ok(SectionContent::IconCategories(IconCategoriesContent {
        categories,
    }))
}
