use super::{MAX_STRING_NESTING, PLACEHOLDER_IMAGE, SectionContent, is_blob_url};
use crate::error::NormalizeResult;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Free-form content, kept as supplied.
///
/// Always an object or an array once normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CustomContent(Value);

impl CustomContent {
    /// Borrows the stored value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns the stored value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// True for an empty object or array.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl Default for CustomContent {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

pub(super) fn normalize(raw: &Value) -> NormalizeResult<SectionContent> {
    let mut value = match raw {
        Value::Null => Value::Object(Map::new()),
        Value::String(text) => from_text(text, 0),
        Value::Object(_) | Value::Array(_) => raw.clone(),
        scalar => json!({ "content": scalar }),
    };
    scrub_image_urls(&mut value);
    Ok(SectionContent::Custom(CustomContent(value)))
}

/// Best-effort decoding of string content. Never fails: parsed scalars are
/// wrapped as `{"content": value}`, and text that does not parse as
/// `{"content": text}`.
fn from_text(text: &str, depth: usize) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Object(Map::new());
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Null) => Value::Object(Map::new()),
        Ok(Value::String(inner)) if depth < MAX_STRING_NESTING => from_text(&inner, depth + 1),
        Ok(Value::String(_)) | Err(_) => json!({ "content": text }),
        Ok(parsed @ (Value::Object(_) | Value::Array(_))) => parsed,
        Ok(scalar) => json!({ "content": scalar }),
    }
}

/// Replaces `blob:` values of every nested `imageUrl` field.
fn scrub_image_urls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if key == "imageUrl" && field.as_str().is_some_and(is_blob_url) {
                    *field = Value::String(PLACEHOLDER_IMAGE.to_string());
                } else {
                    scrub_image_urls(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(scrub_image_urls),
        _ => {}
    }
}
