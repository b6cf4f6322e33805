//! Domain data structures shared by the core and its adapters.

use crate::core::error::PhonebookError;
use serde::{Deserialize, Serialize};

/// A persisted phonebook entry (system of record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonebookEntry {
    /// Store-assigned identifier, never reused
    pub id: i64,

    /// Exactly 8 ASCII digits, unique across entries
    pub phone: String,

    /// Title-cased name
    pub name: String,
}

/// Candidate entry supplied by a caller, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub phone: String,
    pub name: String,
}

impl NewEntry {
    pub fn new(phone: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            name: name.into(),
        }
    }

    /// Attach an identifier, producing the full record to save
    pub fn with_id(self, id: i64) -> PhonebookEntry {
        PhonebookEntry {
            id,
            phone: self.phone,
            name: self.name,
        }
    }
}

/// Denormalized projection of an entry held in the search index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Decimal string form of the entry id
    pub id: String,
    pub phone: String,
    pub name: String,
}

impl From<&PhonebookEntry> for SearchDocument {
    fn from(entry: &PhonebookEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            phone: entry.phone.clone(),
            name: entry.name.clone(),
        }
    }
}

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Number of items to skip, saturating on absurd page numbers
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results plus the total across all pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_elements: usize) -> Self {
        let total_pages = if request.size == 0 {
            0
        } else {
            total_elements.div_ceil(request.size)
        };

        Self {
            items,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}

/// Outcome of a write that touches both the store and the search index.
///
/// The store is the system of record, so a store success with an index
/// failure is still a success for the caller, reported as `Diverged`.
#[derive(Debug)]
pub enum SyncOutcome<T> {
    /// Store and index both written
    Synced(T),

    /// Store written, index write failed
    Diverged {
        value: T,
        index_error: PhonebookError,
    },
}

impl<T> SyncOutcome<T> {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced(_))
    }

    pub fn value(&self) -> &T {
        match self {
            SyncOutcome::Synced(value) | SyncOutcome::Diverged { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            SyncOutcome::Synced(value) | SyncOutcome::Diverged { value, .. } => value,
        }
    }

    pub fn index_error(&self) -> Option<&PhonebookError> {
        match self {
            SyncOutcome::Synced(_) => None,
            SyncOutcome::Diverged { index_error, .. } => Some(index_error),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
