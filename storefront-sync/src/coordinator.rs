//! Keeps the client cache and the remote store in step.
//!
//! Reads prefer the remote store and fall back to the cache only when the
//! store is unreachable. Writes go to the remote store once, and the cache is
//! touched only after the store confirms them.

use crate::error::{RepositoryError, SyncError, SyncResult};
use crate::repository::SectionRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use storefront_model::{
    NormalizationError, RawSection, RawSectionInput, RawSectionPatch, Section, SectionId,
    SectionKey, SectionType, sort_by_order,
};
use storefront_storage::{
    IdentityResolver, KeyValueStore, MemoryKeyValueStore, SectionStore, StorageResult, StoreKeys,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Upper bound on list attempts: the first call plus one retry.
pub const MAX_READ_ATTEMPTS: u32 = 2;

/// Coordinator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// List attempts before falling back to the cache, capped at
    /// [`MAX_READ_ATTEMPTS`]. Zero behaves as one.
    pub read_attempts: u32,
    /// Keys of the cached values.
    pub keys: StoreKeys,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            read_attempts: MAX_READ_ATTEMPTS,
            keys: StoreKeys::default(),
        }
    }
}

/// Progress of the most recent operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    Idle,
    InFlight,
    Succeeded,
    /// Served from the cache because the remote store was unreachable.
    FailedFallback,
    FailedFatal,
}

/// Where listed sections came from.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionsOrigin {
    Remote,
    /// Stale copy, served because the remote store failed with `cause`.
    Cache { cause: RepositoryError },
}

/// A section the remote store served but that failed normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidSection {
    pub id: SectionId,
    pub error: NormalizationError,
}

/// Result of [`SectionCoordinator::list_sections`].
#[derive(Debug, Clone, PartialEq)]
pub struct SectionListing {
    /// Valid sections, sorted by order.
    pub sections: Vec<Section>,
    pub origin: SectionsOrigin,
    /// Sections left out because their content could not be normalized.
    pub invalid: Vec<InvalidSection>,
}

impl SectionListing {
    /// True when the sections come from the cache.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self.origin, SectionsOrigin::Cache { .. })
    }
}

/// Owns the repository, the section cache and the identity table.
pub struct SectionCoordinator<R> {
    repository: R,
    store: SectionStore,
    identities: IdentityResolver,
    config: CoordinatorConfig,
    state: watch::Sender<OperationState>,
}

impl<R: SectionRepository> SectionCoordinator<R> {
    /// Creates a coordinator caching into `kv`.
    pub fn new(repository: R, kv: Arc<dyn KeyValueStore>, config: CoordinatorConfig) -> Self {
        let store = SectionStore::new(kv.clone(), config.keys.sections_key.clone());
        let identities = IdentityResolver::new(kv, config.keys.identity_key.clone());
        Self {
            repository,
            store,
            identities,
            config,
            state: watch::Sender::new(OperationState::Idle),
        }
    }

    /// Creates a coordinator with a process-local cache and default settings.
    pub fn in_memory(repository: R) -> Self {
        Self::new(
            repository,
            Arc::new(MemoryKeyValueStore::new()),
            CoordinatorConfig::default(),
        )
    }

    /// State of the most recent operation.
    pub fn state(&self) -> OperationState {
        *self.state.borrow()
    }

    /// Watches state transitions.
    pub fn subscribe(&self) -> watch::Receiver<OperationState> {
        self.state.subscribe()
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn store(&self) -> &SectionStore {
        &self.store
    }

    pub fn identities(&self) -> &IdentityResolver {
        &self.identities
    }

    fn transition(&self, operation: &str, state: OperationState) {
        let previous = self.state.send_replace(state);
        debug!("{}: {:?} -> {:?}", operation, previous, state);
    }

    /// Marks the end of a write operation.
    fn finish<T>(&self, operation: &str, result: &SyncResult<T>) {
        match result {
            Ok(_) => self.transition(operation, OperationState::Succeeded),
            Err(e) => {
                warn!("{} failed: {}", operation, e);
                self.transition(operation, OperationState::FailedFatal);
            }
        }
    }

    /// A failed cache write after a confirmed remote change is logged only;
    /// the next successful listing rebuilds the cache.
    fn log_cache_failure(&self, what: &str, result: StorageResult<()>) {
        if let Err(e) = result {
            warn!("Could not update cache after {}: {}", what, e);
        }
    }

    // ── Read path ────────────────────────────────────────────────

    /// Lists sections, falling back to the cache when the store is unreachable.
    pub async fn list_sections(&self, include_inactive: bool) -> SyncResult<SectionListing> {
        self.transition("list", OperationState::InFlight);

        let attempts = self.config.read_attempts.clamp(1, MAX_READ_ATTEMPTS);
        let mut attempt = 1;
        let result = loop {
            match self.repository.list(include_inactive).await {
                Err(RepositoryError::Unavailable(detail)) if attempt < attempts => {
                    warn!(
                        "List attempt {}/{} failed, retrying: {}",
                        attempt, attempts, detail
                    );
                    attempt += 1;
                }
                other => break other,
            }
        };

        match result {
            Ok(raw) => {
                let listing = self.accept_listing(raw);
                self.transition("list", OperationState::Succeeded);
                Ok(listing)
            }
            Err(cause @ RepositoryError::Unavailable(_)) => self.fall_back(include_inactive, cause),
            Err(e) => {
                warn!("List rejected: {}", e);
                self.transition("list", OperationState::FailedFatal);
                Err(e.into())
            }
        }
    }

    fn accept_listing(&self, raw: Vec<RawSection>) -> SectionListing {
        let mut sections = Vec::with_capacity(raw.len());
        let mut invalid = Vec::new();
        for raw_section in raw {
            match raw_section.normalize() {
                Ok(section) => sections.push(section),
                Err(error) => {
                    warn!("Skipping section {}: {}", raw_section.id, error);
                    invalid.push(InvalidSection {
                        id: raw_section.id,
                        error,
                    });
                }
            }
        }
        sort_by_order(&mut sections);

        self.log_cache_failure("list", self.identities.record(&sections));
        self.log_cache_failure("list", self.store.save(&sections));
        info!(
            "Listed {} sections ({} invalid)",
            sections.len(),
            invalid.len()
        );

        SectionListing {
            sections,
            origin: SectionsOrigin::Remote,
            invalid,
        }
    }

    fn fall_back(
        &self,
        include_inactive: bool,
        cause: RepositoryError,
    ) -> SyncResult<SectionListing> {
        let cached = match self.store.load() {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Cache unreadable during fallback: {}", e);
                Vec::new()
            }
        };
        let sections: Vec<Section> = cached
            .into_iter()
            .filter(|s| include_inactive || s.active)
            .collect();

        if sections.is_empty() {
            warn!("Section store unavailable and nothing cached: {}", cause);
            self.transition("list", OperationState::FailedFatal);
            return Err(SyncError::NoFallback { cause });
        }

        warn!(
            "Section store unavailable, serving {} cached sections: {}",
            sections.len(),
            cause
        );
        self.transition("list", OperationState::FailedFallback);
        Ok(SectionListing {
            sections,
            origin: SectionsOrigin::Cache { cause },
            invalid: Vec::new(),
        })
    }

    // ── Write path ───────────────────────────────────────────────

    /// Creates a section from editor input.
    pub async fn create_section(&self, input: RawSectionInput) -> SyncResult<Section> {
        self.transition("create", OperationState::InFlight);
        let result = self.create_inner(input).await;
        self.finish("create", &result);
        result
    }

    async fn create_inner(&self, input: RawSectionInput) -> SyncResult<Section> {
        let input = input.normalize()?;
        let created = self.repository.create(&input).await?;
        let section = self.accept_saved("create", created)?;
        info!("Created section {} at order {}", section.id, section.order);
        Ok(section)
    }

    /// Applies a partial update to the section addressed by `key`.
    pub async fn update_section(
        &self,
        key: impl Into<SectionKey>,
        patch: RawSectionPatch,
    ) -> SyncResult<Section> {
        self.transition("update", OperationState::InFlight);
        let result = self.update_inner(key.into(), patch).await;
        self.finish("update", &result);
        result
    }

    async fn update_inner(&self, key: SectionKey, patch: RawSectionPatch) -> SyncResult<Section> {
        let id = self.identities.resolve(&key)?;
        let current_type = if patch.needs_current_type() {
            Some(self.remote_type(&id).await?)
        } else {
            None
        };
        let patch = patch.normalize(current_type)?;

        let updated = self.repository.update(&id, &patch).await?;
        let section = self.accept_saved("update", updated)?;
        info!("Updated section {}", section.id);
        Ok(section)
    }

    /// Reads the stored type of `id` from the remote store.
    async fn remote_type(&self, id: &SectionId) -> SyncResult<SectionType> {
        let sections = self.repository.list(true).await?;
        let section = sections
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("no section {id}")))?;
        Ok(SectionType::parse(&section.section_type)?)
    }

    /// Deletes the section addressed by `key`.
    pub async fn delete_section(&self, key: impl Into<SectionKey>) -> SyncResult<()> {
        self.transition("delete", OperationState::InFlight);
        let result = self.delete_inner(key.into()).await;
        self.finish("delete", &result);
        result
    }

    async fn delete_inner(&self, key: SectionKey) -> SyncResult<()> {
        let id = self.identities.resolve(&key)?;
        self.repository.delete(&id).await?;
        self.log_cache_failure("delete", self.store.remove(&id).map(|_| ()));
        self.log_cache_failure("delete", self.identities.forget(&id));
        info!("Deleted section {}", id);
        Ok(())
    }

    /// Shows or hides the section addressed by `key`.
    pub async fn set_section_active(
        &self,
        key: impl Into<SectionKey>,
        active: bool,
    ) -> SyncResult<Section> {
        self.transition("set_active", OperationState::InFlight);
        let result = self.set_active_inner(key.into(), active).await;
        self.finish("set_active", &result);
        result
    }

    async fn set_active_inner(&self, key: SectionKey, active: bool) -> SyncResult<Section> {
        let id = self.identities.resolve(&key)?;
        let updated = self.repository.set_active(&id, active).await?;
        let section = self.accept_saved("set_active", updated)?;
        info!("Section {} is now {}", section.id, if active { "active" } else { "hidden" });
        Ok(section)
    }

    /// Gives each listed section `order = index`.
    pub async fn reorder_sections(&self, ids: &[SectionId]) -> SyncResult<()> {
        self.transition("reorder", OperationState::InFlight);
        let result = self.reorder_inner(ids).await;
        self.finish("reorder", &result);
        result
    }

    async fn reorder_inner(&self, ids: &[SectionId]) -> SyncResult<()> {
        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(duplicate) = ids.iter().find(|id| !seen.insert(*id)) {
            return Err(SyncError::DuplicateId(duplicate.clone()));
        }

        self.repository.reorder(ids).await?;
        let reordered = self
            .store
            .apply_reorder(ids)
            .and_then(|sections| self.identities.record(&sections));
        self.log_cache_failure("reorder", reordered);
        info!("Reordered {} sections", ids.len());
        Ok(())
    }

    /// Drops the cached sections and the identity table.
    pub fn reset_cache(&self) -> SyncResult<()> {
        self.store.clear()?;
        self.identities.clear()?;
        info!("Cleared section cache");
        Ok(())
    }

    /// Caches a section the remote store just saved. An echo that fails
    /// normalization evicts the stale cached copy.
    fn accept_saved(&self, operation: &str, saved: RawSection) -> SyncResult<Section> {
        match saved.normalize() {
            Ok(section) => {
                self.log_cache_failure(operation, self.store.upsert(section.clone()));
                self.log_cache_failure(operation, self.identities.upsert(&section));
                Ok(section)
            }
            Err(source) => {
                warn!("{}: section {} saved but invalid: {}", operation, saved.id, source);
                self.log_cache_failure(operation, self.store.remove(&saved.id).map(|_| ()));
                Err(SyncError::SavedInvalid {
                    id: saved.id,
                    source,
                })
            }
        }
    }
}
