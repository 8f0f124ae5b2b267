//! Error types for the sync layer.

use storefront_model::{NormalizationError, SectionId};
use storefront_storage::StorageError;
use thiserror::Error;

/// Result type for repository calls.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type for coordinator operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Failure reported by the remote section store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Transport failure, timeout, or a server-side (5xx) error.
    #[error("section store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request (4xx other than 404).
    #[error("request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// The addressed section does not exist.
    #[error("section not found: {0}")]
    NotFound(String),
}

impl RepositoryError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Rejected { .. } => "rejected",
            Self::NotFound(_) => "not_found",
        }
    }

    /// True when the cache may stand in for the remote store.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Errors that can occur in coordinator operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Content failed local normalization.
    #[error("invalid section content: {0}")]
    Normalization(#[from] NormalizationError),

    /// The remote store failed or refused the request.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The local cache could not be read or written.
    #[error("cache error: {0}")]
    Storage(#[from] StorageError),

    /// The remote store is unreachable and nothing is cached.
    #[error("no cached sections to fall back on: {cause}")]
    NoFallback { cause: RepositoryError },

    /// The remote store accepted a write but returned a section that fails
    /// normalization. The change is saved.
    #[error("section {id} was saved but the stored copy is invalid: {source}")]
    SavedInvalid {
        id: SectionId,
        source: NormalizationError,
    },

    /// A reorder listed the same section twice.
    #[error("section {0} listed more than once")]
    DuplicateId(SectionId),
}

impl SyncError {
    /// Short machine-readable label, for UI messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Normalization(_) => "invalid_content",
            Self::Repository(e) => e.kind(),
            Self::Storage(_) => "cache",
            Self::NoFallback { .. } => "no_fallback",
            Self::SavedInvalid { .. } => "saved_invalid",
            Self::DuplicateId(_) => "duplicate_id",
        }
    }

    /// The repository failure behind this error, if any.
    #[must_use]
    pub fn repository_error(&self) -> Option<&RepositoryError> {
        match self {
            Self::Repository(e) | Self::NoFallback { cause: e } => Some(e),
            _ => None,
        }
    }
}
