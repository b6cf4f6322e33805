//! Persistence backends.
//!
//! Two independent stores hold phonebook data:
//!
//! - **entries**: the relational system of record (SQLite)
//! - **index**: the search mirror used for prefix queries (Tantivy)
//!
//! Both sit behind traits so the entry service can be exercised against
//! failing or in-memory backends.

pub mod entries;
pub mod index;

use crate::core::error::Result;
use crate::core::types::{NewEntry, PageRequest, PhonebookEntry, SearchDocument};

pub use entries::SqliteEntryStore;
pub use index::TantivySearchIndex;

/// Relational store contract.
///
/// Implementations enforce UNIQUE on `phone` and NOT NULL on both text
/// columns, surfacing violations as `PhonebookError::Conflict`.
pub trait EntryStore: Send + Sync {
    /// Insert a new row and return it with its assigned id
    fn insert(&self, entry: &NewEntry) -> Result<PhonebookEntry>;

    fn find_by_id(&self, id: i64) -> Result<Option<PhonebookEntry>>;

    /// Rows ordered by id ascending, plus the total row count
    fn find_all(&self, page: PageRequest) -> Result<(Vec<PhonebookEntry>, usize)>;

    /// Insert or fully replace the row with `entry.id`
    fn save(&self, entry: &PhonebookEntry) -> Result<PhonebookEntry>;

    /// Remove the row; absent ids are a no-op
    fn delete_by_id(&self, id: i64) -> Result<()>;

    fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }

    fn count(&self) -> Result<usize>;
}

/// Search index contract.
pub trait SearchIndex: Send + Sync {
    /// Insert or overwrite the document with `doc.id`
    fn upsert(&self, doc: &SearchDocument) -> Result<()>;

    /// Remove the document; absent ids are a no-op
    fn delete_by_id(&self, id: &str) -> Result<()>;

    /// Documents whose name or phone starts with `keyword`, ordered by
    /// entry id, plus the total match count
    fn query_prefix(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<(Vec<SearchDocument>, usize)>;

    /// Remove every document
    fn clear(&self) -> Result<()>;
}
