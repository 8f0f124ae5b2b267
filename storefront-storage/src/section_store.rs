//! The client-side copy of the last confirmed section list.

use crate::error::StorageResult;
use crate::kv::{KeyValueStore, read_json, write_json};
use std::sync::Arc;
use storefront_model::{Section, SectionId, reorder_sections, sort_by_order};
use tracing::debug;

/// Cached sections, stored as one JSON array of canonical sections.
///
/// Every helper is a whole-collection read-modify-write. The cache is only
/// read back when the remote store cannot be reached.
#[derive(Clone)]
pub struct SectionStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl SectionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// The storage key holding the collection.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the cached sections, sorted by order. Empty when nothing is cached.
    pub fn load(&self) -> StorageResult<Vec<Section>> {
        let mut sections: Vec<Section> =
            read_json(self.kv.as_ref(), &self.key)?.unwrap_or_default();
        sort_by_order(&mut sections);
        Ok(sections)
    }

    /// Replaces the whole cached collection.
    pub fn save(&self, sections: &[Section]) -> StorageResult<()> {
        write_json(self.kv.as_ref(), &self.key, sections)?;
        debug!("Cached {} sections", sections.len());
        Ok(())
    }

    /// Drops the cached collection.
    pub fn clear(&self) -> StorageResult<()> {
        self.kv.remove(&self.key)
    }

    pub fn get(&self, id: &SectionId) -> StorageResult<Option<Section>> {
        Ok(self.load()?.into_iter().find(|s| &s.id == id))
    }

    /// Inserts `section`, or replaces the cached section with the same id.
    pub fn upsert(&self, section: Section) -> StorageResult<()> {
        let mut sections = self.load()?;
        match sections.iter_mut().find(|s| s.id == section.id) {
            Some(existing) => *existing = section,
            None => sections.push(section),
        }
        sort_by_order(&mut sections);
        self.save(&sections)
    }

    /// Removes a section. Returns whether it was cached.
    pub fn remove(&self, id: &SectionId) -> StorageResult<bool> {
        let mut sections = self.load()?;
        let before = sections.len();
        sections.retain(|s| &s.id != id);
        if sections.len() == before {
            return Ok(false);
        }
        self.save(&sections)?;
        Ok(true)
    }

    /// Reassigns cached orders to follow `ids` and returns the reordered list.
    pub fn apply_reorder(&self, ids: &[SectionId]) -> StorageResult<Vec<Section>> {
        let mut sections = self.load()?;
        reorder_sections(&mut sections, ids);
        self.save(&sections)?;
        Ok(sections)
    }
}
