//! Client-side persistence for homepage sections.
//!
//! Two small stores sit on top of a [`KeyValueStore`]:
//!
//! - [`SectionStore`] keeps the last confirmed section list, used as a
//!   fallback when the remote store is unreachable.
//! - [`IdentityResolver`] keeps the `order -> id` table that lets editors
//!   address sections by position.
//!
//! Both replace their whole value on every write. Unreadable stored data is
//! treated as empty and discarded.

mod error;
mod identity;
mod kv;
mod section_store;

pub use error::{StorageError, StorageResult};
pub use identity::IdentityResolver;
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use section_store::SectionStore;

use serde::{Deserialize, Serialize};

/// Storage keys for the two cached values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreKeys {
    /// JSON array of canonical sections.
    pub sections_key: String,
    /// JSON object mapping order to id.
    pub identity_key: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            sections_key: "homepage_sections".to_string(),
            identity_key: "homepage_section_ids".to_string(),
        }
    }
}
