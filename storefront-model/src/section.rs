//! Sections and the wire shapes they are built from.

use crate::content::{SectionContent, normalize};
use crate::error::{NormalizationError, NormalizeResult};
use crate::section_type::SectionType;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use storefront_types::SectionId;

fn default_active() -> bool {
    true
}

/// Accepts ids sent as strings or as integers (older backends number their rows).
fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<SectionId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(i64),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => SectionId::new(s),
        TextOrNumber::Number(n) => SectionId::new(n.to_string()),
    })
}

// ── Section ──────────────────────────────────────────────────────

/// A section as served by the store, before its content is normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSection {
    #[serde(alias = "_id", deserialize_with = "id_from_text_or_number")]
    pub id: SectionId,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl RawSection {
    /// Validates the type tag and normalizes the content.
    pub fn normalize(&self) -> NormalizeResult<Section> {
        let section_type = SectionType::parse(&self.section_type)?;
        Ok(Section {
            id: self.id.clone(),
            order: self.order,
            title: self.title.clone(),
            content: normalize(section_type, &self.content)?,
            active: self.active,
        })
    }
}

/// One homepage content block with canonical content.
///
/// Deserializing a `Section` runs the normalizer, so a `Section` value never
/// holds string-encoded or legacy-shaped content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSection", into = "RawSection")]
pub struct Section {
    pub id: SectionId,
    pub order: i64,
    pub title: String,
    pub content: SectionContent,
    pub active: bool,
}

impl Section {
    /// Creates an active section.
    pub fn new(
        id: impl Into<SectionId>,
        order: i64,
        title: impl Into<String>,
        content: SectionContent,
    ) -> Self {
        Self {
            id: id.into(),
            order,
            title: title.into(),
            content,
            active: true,
        }
    }

    /// The section's type, carried by its content.
    #[must_use]
    pub fn section_type(&self) -> SectionType {
        self.content.section_type()
    }

    /// The wire form of this section.
    #[must_use]
    pub fn to_raw(&self) -> RawSection {
        RawSection::from(self.clone())
    }

    /// Applies a partial update. Absent fields are left unchanged; content,
    /// when present, replaces the old content entirely.
    pub fn apply(&mut self, patch: &SectionPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
    }
}

impl TryFrom<RawSection> for Section {
    type Error = NormalizationError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        raw.normalize()
    }
}

impl From<Section> for RawSection {
    fn from(section: Section) -> Self {
        Self {
            id: section.id,
            order: section.order,
            title: section.title,
            section_type: section.content.section_type().to_string(),
            content: section.content.to_value(),
            active: section.active,
        }
    }
}

// ── Create input ─────────────────────────────────────────────────

/// Input for creating a section, as an editor submits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSectionInput {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl RawSectionInput {
    pub fn new(section_type: SectionType, title: impl Into<String>, content: Value) -> Self {
        Self {
            title: title.into(),
            section_type: section_type.to_string(),
            content,
            order: None,
            active: true,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Validates the type tag and normalizes the content.
    pub fn normalize(&self) -> NormalizeResult<SectionInput> {
        let section_type = SectionType::parse(&self.section_type)?;
        Ok(SectionInput {
            title: self.title.clone(),
            content: normalize(section_type, &self.content)?,
            order: self.order,
            active: self.active,
        })
    }
}

/// Normalized input for creating a section. The store assigns the id, and
/// the order too when none is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSectionInput", into = "RawSectionInput")]
pub struct SectionInput {
    pub title: String,
    pub content: SectionContent,
    pub order: Option<i64>,
    pub active: bool,
}

impl SectionInput {
    #[must_use]
    pub fn section_type(&self) -> SectionType {
        self.content.section_type()
    }

    /// Builds the section the store will hold once it assigns `id` and `order`.
    pub fn into_section(self, id: SectionId, order: i64) -> Section {
        Section {
            id,
            order,
            title: self.title,
            content: self.content,
            active: self.active,
        }
    }
}

impl TryFrom<RawSectionInput> for SectionInput {
    type Error = NormalizationError;

    fn try_from(raw: RawSectionInput) -> Result<Self, Self::Error> {
        raw.normalize()
    }
}

impl From<SectionInput> for RawSectionInput {
    fn from(input: SectionInput) -> Self {
        Self {
            title: input.title,
            section_type: input.content.section_type().to_string(),
            content: input.content.to_value(),
            order: input.order,
            active: input.active,
        }
    }
}

// ── Update patch ─────────────────────────────────────────────────

/// A partial update as an editor submits it. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSectionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub section_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl RawSectionPatch {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Replaces the content, declaring its type.
    #[must_use]
    pub fn with_content(mut self, section_type: SectionType, content: Value) -> Self {
        self.section_type = Some(section_type.to_string());
        self.content = Some(content);
        self
    }

    /// Replaces the content, keeping the section's current type.
    #[must_use]
    pub fn with_untyped_content(mut self, content: Value) -> Self {
        self.content = Some(content);
        self
    }

    /// The declared section type, if any.
    pub fn declared_type(&self) -> NormalizeResult<Option<SectionType>> {
        self.section_type
            .as_deref()
            .map(SectionType::parse)
            .transpose()
    }

    /// True when normalizing depends on the section's current type: content
    /// without a declared type, or a declared type without content.
    #[must_use]
    pub fn needs_current_type(&self) -> bool {
        self.content.is_some() != self.section_type.is_some()
    }

    /// Normalizes the patch against the section's current type.
    ///
    /// Content without a declared type is read as `current`. A declared type
    /// that differs from `current` with no content resets the content to the
    /// new type's empty value.
    pub fn normalize(&self, current: Option<SectionType>) -> NormalizeResult<SectionPatch> {
        let declared = self.declared_type()?;
        let content = match (&self.content, declared) {
            (Some(raw), Some(section_type)) => Some(normalize(section_type, raw)?),
            (Some(raw), None) => {
                let section_type = current.ok_or(NormalizationError::MissingType)?;
                Some(normalize(section_type, raw)?)
            }
            (None, Some(section_type)) if current != Some(section_type) => {
                Some(SectionContent::empty(section_type))
            }
            (None, _) => None,
        };

        Ok(SectionPatch {
            title: self.title.clone(),
            order: self.order,
            active: self.active,
            content,
        })
    }
}

/// A normalized partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(into = "RawSectionPatch")]
pub struct SectionPatch {
    pub title: Option<String>,
    pub order: Option<i64>,
    pub active: Option<bool>,
    pub content: Option<SectionContent>,
}

impl SectionPatch {
    /// A patch that only toggles visibility.
    #[must_use]
    pub fn active_only(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Default::default()
        }
    }

    /// True when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.order.is_none()
            && self.active.is_none()
            && self.content.is_none()
    }
}

impl From<SectionPatch> for RawSectionPatch {
    fn from(patch: SectionPatch) -> Self {
        Self {
            title: patch.title,
            order: patch.order,
            active: patch.active,
            section_type: patch
                .content
                .as_ref()
                .map(|c| c.section_type().to_string()),
            content: patch.content.as_ref().map(SectionContent::to_value),
        }
    }
}

// ── Ordering ─────────────────────────────────────────────────────

/// Stable sort by `order`.
pub fn sort_by_order(sections: &mut [Section]) {
    sections.sort_by_key(|s| s.order);
}

/// Reassigns `order` so the listed ids come first, at their index.
///
/// Sections not listed keep their relative order and follow the listed ones,
/// so the result is always a total order. Ids that match no section are
/// ignored.
pub fn reorder_sections(sections: &mut [Section], ids: &[SectionId]) {
    sort_by_order(sections);

    let positions: HashMap<&SectionId, usize> =
        ids.iter().enumerate().map(|(index, id)| (id, index)).collect();

    let mut next_unlisted = ids.len() as i64;
    for section in sections.iter_mut() {
        match positions.get(&section.id) {
            Some(&index) => section.order = index as i64,
            None => {
                section.order = next_unlisted;
                next_unlisted += 1;
            }
        }
    }

    sort_by_order(sections);
}
