//! Unified service container for the phonebook
//!
//! Provides shared access to all core services.

use crate::core::config::Config;
use crate::core::entries::EntryService;
use crate::core::error::Result;
use crate::core::storage::{SqliteEntryStore, TantivySearchIndex};
use std::sync::Arc;

/// Unified services container
///
/// All adapters (HTTP, web UI, CLI) use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Entry service (store + search index)
    pub entries: Arc<EntryService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Open the configured database and search index
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteEntryStore::open(&config.storage.database_path)?);
        let index = Arc::new(TantivySearchIndex::open_or_create(
            &config.storage.index_dir,
        )?);

        Ok(Self::from_parts(EntryService::new(store, index), config))
    }

    /// Build services with in-memory backends
    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteEntryStore::open_in_memory()?);
        let index = Arc::new(TantivySearchIndex::in_memory()?);

        Ok(Self::from_parts(EntryService::new(store, index), config))
    }

    /// Wrap an existing entry service
    pub fn from_parts(entries: EntryService, config: Config) -> Self {
        Self {
            entries: Arc::new(entries),
            config: Arc::new(config),
        }
    }

    /// Clamp a requested page size to the configured maximum
    pub fn clamp_page_size(&self, size: usize) -> usize {
        size.min(self.config.pagination.max_page_size)
    }
}
