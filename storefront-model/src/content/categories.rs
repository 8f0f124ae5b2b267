use super::{SectionContent, decode, entry_list, entry_object, stable_image_url, text_field};
use crate::error::NormalizeResult;
use crate::section_type::SectionType;
use serde::Serialize;
use serde_json::Value;

const TYPE: SectionType = SectionType::Categories;

/// A grid of category tiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoriesContent {
    pub categories: Vec<CategoryRef>,
}

/// A category tile. `image` is accepted on input as an alias of `imageUrl`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub(super) fn normalize(raw: &Value) -> NormalizeResult<SectionContent> {
    let Some(value) = decode(TYPE, raw)? else {
        return Ok(SectionContent::Categories(CategoriesContent::default()));
    };

    let categories = entry_list(TYPE, value, "categories")?
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let map = entry_object(TYPE, index, entry)?;
            Ok(CategoryRef {
                name: text_field(TYPE, index, map, &["name"])?.unwrap_or_default(),
                image_url: text_field(TYPE, index, map, &["imageUrl", "image"])?
                    .map(stable_image_url),
                description: text_field(TYPE, index, map, &["description"])?,
            })
        })
        .collect::<NormalizeResult<Vec<_>>>()?;

    Ok(SectionContent::Categories(CategoriesContent { categories }))
}
