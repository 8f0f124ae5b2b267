//! Reconciliation between the remote section store and the client cache.
//!
//! # Components
//!
//! - **Repository**: [`SectionRepository`], the async CRUD boundary, with an
//!   HTTP implementation in [`HttpSectionRepository`]
//! - **Coordinator**: [`SectionCoordinator`], which normalizes everything that
//!   crosses the boundary and keeps the cache in step
//!
//! # Read path
//!
//! 1. List from the remote store, retrying once when it is unreachable
//! 2. Normalize every section; invalid ones are reported, not cached
//! 3. Cache the valid sections and their `order -> id` table
//! 4. When the store stays unreachable, serve the cache, marked stale
//!
//! # Write path
//!
//! Content is normalized locally first, so invalid input never reaches the
//! store. The store is called once, and the cache changes only after the
//! store confirms the write.
//!
//! # Example
//!
//! ```no_run
//! use storefront_sync::{HttpRepositoryConfig, HttpSectionRepository, SectionCoordinator};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = HttpSectionRepository::new(HttpRepositoryConfig::default())?;
//! let coordinator = SectionCoordinator::in_memory(repository);
//! let listing = coordinator.list_sections(false).await?;
//! println!("{} sections", listing.sections.len());
//! # Ok(())
//! # }
//! ```

mod coordinator;
mod error;
mod http;
mod repository;

pub use coordinator::{
    CoordinatorConfig, InvalidSection, MAX_READ_ATTEMPTS, OperationState, SectionCoordinator,
    SectionListing, SectionsOrigin,
};
pub use error::{RepositoryError, RepositoryResult, SyncError, SyncResult};
pub use http::{HttpRepositoryConfig, HttpSectionRepository};
pub use repository::SectionRepository;
