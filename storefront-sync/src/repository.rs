//! The remote section store boundary.

use crate::error::RepositoryResult;
use async_trait::async_trait;
use std::sync::Arc;
use storefront_model::{RawSection, SectionId, SectionInput, SectionPatch};

/// CRUD access to the authoritative section store.
///
/// Implementations return sections exactly as served; normalizing them is the
/// coordinator's job. Implementations never retry.
#[async_trait]
pub trait SectionRepository: Send + Sync {
    /// Lists sections, inactive ones included when asked.
    async fn list(&self, include_inactive: bool) -> RepositoryResult<Vec<RawSection>>;

    /// Creates a section. The store assigns its id.
    async fn create(&self, input: &SectionInput) -> RepositoryResult<RawSection>;

    /// Applies a partial update. Content, when present, is replaced entirely.
    async fn update(&self, id: &SectionId, patch: &SectionPatch) -> RepositoryResult<RawSection>;

    async fn delete(&self, id: &SectionId) -> RepositoryResult<()>;

    /// Shows or hides a section.
    async fn set_active(&self, id: &SectionId, active: bool) -> RepositoryResult<RawSection> {
        self.update(id, &SectionPatch::active_only(active)).await
    }

    /// Assigns `order = index` to each listed section.
    async fn reorder(&self, ids: &[SectionId]) -> RepositoryResult<()>;
}

#[async_trait]
impl<R: SectionRepository + ?Sized> SectionRepository for Arc<R> {
    async fn list(&self, include_inactive: bool) -> RepositoryResult<Vec<RawSection>> {
        (**self).list(include_inactive).await
    }

    async fn create(&self, input: &SectionInput) -> RepositoryResult<RawSection> {
        (**self).create(input).await
    }

    async fn update(&self, id: &SectionId, patch: &SectionPatch) -> RepositoryResult<RawSection> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &SectionId) -> RepositoryResult<()> {
        (**self).delete(id).await
    }

    async fn set_active(&self, id: &SectionId, active: bool) -> RepositoryResult<RawSection> {
        (**self).set_active(id, active).await
    }

    async fn reorder(&self, ids: &[SectionId]) -> RepositoryResult<()> {
        (**self).reorder(ids).await
    }
}
