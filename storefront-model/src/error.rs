//! Error types for content normalization.

use crate::section_type::SectionType;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Result type for normalization.
pub type NormalizeResult<T> = Result<T, NormalizationError>;

/// Maximum number of characters of the offending payload kept in an error.
pub const PAYLOAD_EXCERPT_LEN: usize = 120;

/// Coarse classification of a normalization failure, for UI messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationErrorKind {
    ParseFailure,
    ShapeMismatch,
    InvalidEntry,
}

/// Raw content could not be turned into canonical content.
///
/// Every variant that concerns a payload carries an excerpt of it so an editor
/// can point at what was wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    /// String-encoded content is not valid JSON.
    #[error("{section_type} content is not valid JSON: {message} (payload: {payload})")]
    ParseFailure {
        section_type: SectionType,
        message: String,
        payload: String,
    },

    /// Content is the wrong JSON kind for its section type.
    #[error("{section_type} content must be {expected}, found {found} (payload: {payload})")]
    ShapeMismatch {
        section_type: SectionType,
        expected: &'static str,
        found: &'static str,
        payload: String,
    },

    /// One entry of a list is unusable.
    #[error("{section_type} entry {index} is invalid: {reason} (payload: {payload})")]
    InvalidEntry {
        section_type: SectionType,
        index: usize,
        reason: String,
        payload: String,
    },

    /// The `type` tag is not one of the known section types.
    #[error("unknown section type: {found:?}")]
    UnknownType { found: String },

    /// Content was supplied without any way to know its section type.
    #[error("content supplied without a section type")]
    MissingType,
}

impl NormalizationError {
    /// Returns the coarse kind of this error.
    ///
    /// An unknown or missing type means the content shape cannot be determined,
    /// so both report as a shape mismatch.
    #[must_use]
    pub fn kind(&self) -> NormalizationErrorKind {
        match self {
            Self::ParseFailure { .. } => NormalizationErrorKind::ParseFailure,
            Self::ShapeMismatch { .. } | Self::UnknownType { .. } | Self::MissingType => {
                NormalizationErrorKind::ShapeMismatch
            }
            Self::InvalidEntry { .. } => NormalizationErrorKind::InvalidEntry,
        }
    }

    /// Index of the offending entry, for `InvalidEntry`.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::InvalidEntry { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Truncated offending payload, when there is one.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::ParseFailure { payload, .. }
            | Self::ShapeMismatch { payload, .. }
            | Self::InvalidEntry { payload, .. } => Some(payload),
            Self::UnknownType { .. } | Self::MissingType => None,
        }
    }

    pub(crate) fn parse_failure(
        section_type: SectionType,
        message: impl Into<String>,
        raw: &str,
    ) -> Self {
        Self::ParseFailure {
            section_type,
            message: message.into(),
            payload: excerpt(raw),
        }
    }

    pub(crate) fn shape_mismatch(
        section_type: SectionType,
        expected: &'static str,
        found: &Value,
    ) -> Self {
        Self::ShapeMismatch {
            section_type,
            expected,
            found: json_kind(found),
            payload: excerpt(&found.to_string()),
        }
    }

    pub(crate) fn invalid_entry(
        section_type: SectionType,
        index: usize,
        reason: impl Into<String>,
        entry: &Value,
    ) -> Self {
        Self::InvalidEntry {
            section_type,
            index,
            reason: reason.into(),
            payload: excerpt(&entry.to_string()),
        }
    }
}

/// Human-readable name of a JSON value's kind.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn excerpt(raw: &str) -> String {
    if raw.chars().count() <= PAYLOAD_EXCERPT_LEN {
        return raw.to_string();
    }
    let mut cut: String = raw.chars().take(PAYLOAD_EXCERPT_LEN).collect();
    cut.push_str("...");
    cut
}
