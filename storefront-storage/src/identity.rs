//! Mapping from display ordinals to persistent section ids.
//!
//! Editors address sections by position while the remote store addresses
//! them by id. The table is rebuilt after every successful listing so the
//! two never drift for long.

use crate::error::StorageResult;
use crate::kv::{KeyValueStore, read_json, write_json};
use std::collections::BTreeMap;
use std::sync::Arc;
use storefront_model::{Section, SectionId, SectionKey};
use tracing::{debug, warn};

/// Persisted as a JSON object `{"<order>": "<id>"}`.
type IdTable = BTreeMap<i64, SectionId>;

/// Resolves ordinals to the ids recorded at the last successful listing.
#[derive(Clone)]
pub struct IdentityResolver {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl IdentityResolver {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    fn load(&self) -> StorageResult<IdTable> {
        Ok(read_json(self.kv.as_ref(), &self.key)?.unwrap_or_default())
    }

    fn save(&self, table: &IdTable) -> StorageResult<()> {
        write_json(self.kv.as_ref(), &self.key, table)
    }

    /// Rebuilds the whole table from `sections`.
    ///
    /// When two sections share an order the later one wins.
    pub fn record(&self, sections: &[Section]) -> StorageResult<()> {
        let mut table = IdTable::new();
        for section in sections {
            if let Some(previous) = table.insert(section.order, section.id.clone()) {
                warn!(
                    "Sections {} and {} share order {}; keeping {}",
                    previous, section.id, section.order, section.id
                );
            }
        }
        self.save(&table)?;
        debug!("Recorded {} section ids", table.len());
        Ok(())
    }

    /// Looks up the id recorded for `order`.
    pub fn resolve_id(&self, order: i64) -> StorageResult<Option<SectionId>> {
        Ok(self.load()?.remove(&order))
    }

    /// Turns a caller-supplied key into an id for the remote store.
    ///
    /// An unmapped ordinal is passed through as its decimal text; the remote
    /// store then decides whether such a section exists.
    pub fn resolve(&self, key: &SectionKey) -> StorageResult<SectionId> {
        match key {
            SectionKey::Id(id) => Ok(id.clone()),
            SectionKey::Ordinal(order) => match self.resolve_id(*order)? {
                Some(id) => Ok(id),
                None => {
                    debug!("No id recorded for ordinal {}, passing it through", order);
                    Ok(SectionId::new(order.to_string()))
                }
            },
        }
    }

    /// Records one confirmed section, dropping stale entries for its id.
    pub fn upsert(&self, section: &Section) -> StorageResult<()> {
        let mut table = self.load()?;
        table.retain(|_, id| id != &section.id);
        table.insert(section.order, section.id.clone());
        self.save(&table)
    }

    /// Drops every entry pointing at `id`.
    pub fn forget(&self, id: &SectionId) -> StorageResult<()> {
        let mut table = self.load()?;
        let before = table.len();
        table.retain(|_, mapped| mapped != id);
        if table.len() != before {
            self.save(&table)?;
        }
        Ok(())
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.kv.remove(&self.key)
    }
}
