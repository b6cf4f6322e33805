//! Entry service: the single place where the store and the search index
//! are kept in sync.
//!
//! Writes go to the store first. The index is only touched after the store
//! write succeeded, and an index failure does not undo the store write: it
//! is returned as `SyncOutcome::Diverged` and logged. `reindex` rebuilds
//! the mirror from the store to repair such divergence.

use crate::core::error::{PhonebookError, Result, ValidationError};
use crate::core::sanitize::{sanitize_name, sanitize_phone};
use crate::core::storage::{EntryStore, SearchIndex};
use crate::core::types::{
    NewEntry, Page, PageRequest, PhonebookEntry, SearchDocument, SyncOutcome,
};
use std::sync::Arc;

/// Batch size used when walking the store during a reindex
const REINDEX_BATCH_SIZE: usize = 500;

/// Orchestrates validation, the entry store and the search index
pub struct EntryService {
    store: Arc<dyn EntryStore>,
    index: Arc<dyn SearchIndex>,
}

impl EntryService {
    pub fn new(store: Arc<dyn EntryStore>, index: Arc<dyn SearchIndex>) -> Self {
        Self { store, index }
    }

    /// Persist a new entry and mirror it into the index
    pub fn create(&self, candidate: NewEntry) -> Result<SyncOutcome<PhonebookEntry>> {
        let candidate = validate_candidate(candidate)?;
        let saved = self.store.insert(&candidate)?;

        tracing::debug!(id = saved.id, "Entry created");

        Ok(self.mirror(saved))
    }

    /// Fully replace an existing entry, keeping its id
    pub fn update(&self, id: i64, candidate: NewEntry) -> Result<SyncOutcome<PhonebookEntry>> {
        if !self.store.exists(id)? {
            return Err(PhonebookError::EntryNotFound(id));
        }

        let entry = validate_candidate(candidate)?.with_id(id);
        let saved = self.store.save(&entry)?;

        tracing::debug!(id = saved.id, "Entry updated");

        Ok(self.mirror(saved))
    }

    /// Remove an entry from the store, then its document from the index
    pub fn delete(&self, id: i64) -> Result<SyncOutcome<()>> {
        self.store.delete_by_id(id)?;

        tracing::debug!(id, "Entry deleted");

        match self.index.delete_by_id(&id.to_string()) {
            Ok(()) => Ok(SyncOutcome::Synced(())),
            Err(index_error) => {
                tracing::warn!(
                    id,
                    error = %index_error,
                    "Entry deleted from store but still present in search index"
                );
                Ok(SyncOutcome::Diverged {
                    value: (),
                    index_error,
                })
            }
        }
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<PhonebookEntry>> {
        self.store.find_by_id(id)
    }

    pub fn exists(&self, id: i64) -> Result<bool> {
        self.store.exists(id)
    }

    /// Page through the store, ordered by id ascending
    pub fn list(&self, page: PageRequest) -> Result<Page<PhonebookEntry>> {
        let (items, total) = self.store.find_all(page)?;
        Ok(Page::new(items, page, total))
    }

    /// Prefix search over name or phone. Never touches the store.
    ///
    /// `keyword` is expected in the form produced by
    /// [`sanitize_search_keyword`](crate::core::sanitize::sanitize_search_keyword).
    pub fn search_by_name_or_phone(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Page<SearchDocument>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ValidationError::MissingKeyword.into());
        }

        let (items, total) = self.index.query_prefix(keyword, page)?;
        Ok(Page::new(items, page, total))
    }

    /// Rebuild the search index from the store.
    ///
    /// Returns the number of documents written.
    pub fn reindex(&self) -> Result<usize> {
        self.index.clear()?;

        let mut written = 0;
        let mut page = PageRequest::new(0, REINDEX_BATCH_SIZE);
        loop {
            let (entries, _) = self.store.find_all(page)?;
            if entries.is_empty() {
                break;
            }
            for entry in &entries {
                self.index.upsert(&SearchDocument::from(entry))?;
                written += 1;
            }
            page.page += 1;
        }

        tracing::info!(documents = written, "Search index rebuilt");

        Ok(written)
    }

    /// Write the entry's document to the index, reporting divergence
    fn mirror(&self, saved: PhonebookEntry) -> SyncOutcome<PhonebookEntry> {
        match self.index.upsert(&SearchDocument::from(&saved)) {
            Ok(()) => SyncOutcome::Synced(saved),
            Err(index_error) => {
                tracing::warn!(
                    id = saved.id,
                    error = %index_error,
                    "Entry stored but search index write failed"
                );
                SyncOutcome::Diverged {
                    value: saved,
                    index_error,
                }
            }
        }
    }
}

/// Run both fields through the sanitizer.
///
/// Boundaries sanitize first; sanitized values pass through unchanged.
fn validate_candidate(candidate: NewEntry) -> Result<NewEntry> {
    Ok(NewEntry {
        phone: sanitize_phone(&candidate.phone)?,
        name: sanitize_name(&candidate.name)?,
    })
}
