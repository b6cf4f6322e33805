//! Tantivy-backed search mirror.
//!
//! Holds one document per phonebook entry and answers case-insensitive
//! prefix queries on name or phone.

use crate::core::error::{PhonebookError, Result};
use crate::core::sanitize::escape_html;
use crate::core::storage::SearchIndex;
use crate::core::types::{PageRequest, SearchDocument};
use chrono::Utc;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{BooleanQuery, Occur, Query, RegexQuery};
use tantivy::schema::*;
use tantivy::{doc, Index, IndexReader, IndexWriter, Order, ReloadPolicy, TantivyDocument, Term};

const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Create the Tantivy schema for entry documents
///
/// Fields:
/// - id: Entry id as a string (STRING | STORED), used for deletes
/// - entry_id: Entry id as a number (INDEXED | FAST | STORED), used for ordering
/// - name: Display name (STORED)
/// - name_key: Lower-cased, HTML-escaped name (STRING), prefix-matched
/// - phone: Phone digits (STRING | STORED), prefix-matched
/// - indexed_at: Timestamp (Date | STORED)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();

    builder.add_text_field("id", STRING | STORED);
    builder.add_i64_field("entry_id", INDEXED | FAST | STORED);

    builder.add_text_field("name", STORED);
    builder.add_text_field("name_key", STRING);
    builder.add_text_field("phone", STRING | STORED);

    builder.add_date_field("indexed_at", STORED);

    builder.build()
}

/// Key stored for name matching.
///
/// Search keywords arrive HTML-escaped from the sanitizer, so names are
/// keyed in the same escaped form ("o'c" becomes "o&#x27;c" on both sides).
pub fn name_key(name: &str) -> String {
    escape_html(name).to_lowercase()
}

/// Resolved schema fields
#[derive(Clone, Copy)]
struct Fields {
    id: Field,
    entry_id: Field,
    name: Field,
    name_key: Field,
    phone: Field,
    indexed_at: Field,
}

impl Fields {
    fn resolve(schema: &Schema) -> Result<Self> {
        let get = |name: &str| {
            schema
                .get_field(name)
                .map_err(|e| PhonebookError::IndexError(format!("Missing {name} field: {e}")))
        };

        Ok(Self {
            id: get("id")?,
            entry_id: get("entry_id")?,
            name: get("name")?,
            name_key: get("name_key")?,
            phone: get("phone")?,
            indexed_at: get("indexed_at")?,
        })
    }
}

/// Tantivy index wrapper
pub struct TantivySearchIndex {
    /// Tantivy index instance
    index: Index,

    fields: Fields,

    /// Index writer (for adding and deleting documents)
    writer: Mutex<IndexWriter>,

    /// Reader, reloaded after every commit
    reader: IndexReader,
}

impl std::fmt::Debug for TantivySearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivySearchIndex")
            .field("schema", &"<schema>")
            .finish()
    }
}

impl TantivySearchIndex {
    /// Open the index in `index_dir`, creating it when absent
    pub fn open_or_create(index_dir: &Path) -> Result<Self> {
        if index_dir.join("meta.json").exists() {
            let index = Index::open_in_dir(index_dir)
                .map_err(|e| PhonebookError::IndexError(format!("Failed to open index: {e}")))?;
            tracing::info!(path = %index_dir.display(), "Search index opened");
            Self::from_index(index)
        } else {
            std::fs::create_dir_all(index_dir)?;
            let index = Index::create_in_dir(index_dir, create_schema())
                .map_err(|e| PhonebookError::IndexError(format!("Failed to create index: {e}")))?;
            tracing::info!(path = %index_dir.display(), "Search index created");
            Self::from_index(index)
        }
    }

    /// Create a throwaway in-memory index
    pub fn in_memory() -> Result<Self> {
        Self::from_index(Index::create_in_ram(create_schema()))
    }

    fn from_index(index: Index) -> Result<Self> {
        let fields = Fields::resolve(&index.schema())?;

        let writer = index
            .writer_with_num_threads(1, WRITER_HEAP_BYTES)
            .map_err(|e| PhonebookError::IndexError(format!("Failed to create writer: {e}")))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| PhonebookError::IndexError(format!("Failed to create reader: {e}")))?;

        Ok(Self {
            index,
            fields,
            writer: Mutex::new(writer),
            reader,
        })
    }

    /// Get a reference to the underlying Tantivy index
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Number of live documents
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    fn lock_writer(&self) -> Result<MutexGuard<'_, IndexWriter>> {
        self.writer
            .lock()
            .map_err(|_| PhonebookError::IndexError("Writer lock poisoned".to_string()))
    }

    /// Commit pending operations and make them visible to searches
    fn commit(&self, writer: &mut IndexWriter) -> Result<()> {
        writer
            .commit()
            .map_err(|e| PhonebookError::IndexError(format!("Failed to commit: {e}")))?;
        self.reader
            .reload()
            .map_err(|e| PhonebookError::IndexError(format!("Failed to reload reader: {e}")))?;
        Ok(())
    }

    fn prefix_query(&self, keyword: &str) -> Result<Box<dyn Query>> {
        let pattern = format!("{}.*", escape_regex(&keyword.to_lowercase()));

        let by_name = RegexQuery::from_pattern(&pattern, self.fields.name_key)
            .map_err(|e| PhonebookError::IndexError(format!("Invalid prefix pattern: {e}")))?;
        let by_phone = RegexQuery::from_pattern(&pattern, self.fields.phone)
            .map_err(|e| PhonebookError::IndexError(format!("Invalid prefix pattern: {e}")))?;

        Ok(Box::new(BooleanQuery::new(vec![
            (Occur::Should, Box::new(by_name) as Box<dyn Query>),
            (Occur::Should, Box::new(by_phone) as Box<dyn Query>),
        ])))
    }

    fn to_search_document(&self, doc: &TantivyDocument) -> SearchDocument {
        SearchDocument {
            id: extract_text(doc, self.fields.id),
            phone: extract_text(doc, self.fields.phone),
            name: extract_text(doc, self.fields.name),
        }
    }
}

impl SearchIndex for TantivySearchIndex {
    fn upsert(&self, document: &SearchDocument) -> Result<()> {
        let entry_id: i64 = document.id.parse().map_err(|_| {
            PhonebookError::IndexError(format!("Document id is not numeric: {}", document.id))
        })?;

        let f = self.fields;
        let mut writer = self.lock_writer()?;

        writer.delete_term(Term::from_field_text(f.id, &document.id));
        writer
            .add_document(doc!(
                f.id => document.id.as_str(),
                f.entry_id => entry_id,
                f.name => document.name.as_str(),
                f.name_key => name_key(&document.name),
                f.phone => document.phone.as_str(),
                f.indexed_at => tantivy::DateTime::from_timestamp_secs(Utc::now().timestamp()),
            ))
            .map_err(|e| PhonebookError::IndexError(format!("Failed to add document: {e}")))?;

        self.commit(&mut writer)
    }

    fn delete_by_id(&self, id: &str) -> Result<()> {
        let mut writer = self.lock_writer()?;
        writer.delete_term(Term::from_field_text(self.fields.id, id));
        self.commit(&mut writer)
    }

    fn query_prefix(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<(Vec<SearchDocument>, usize)> {
        let query = self.prefix_query(keyword)?;
        let searcher = self.reader.searcher();

        let total = searcher
            .search(&query, &Count)
            .map_err(|e| PhonebookError::IndexError(format!("Search failed: {e}")))?;

        // TopDocs sizes its heap by limit + offset, so pages past the end
        // must never reach it
        let offset = page.offset();
        if page.size == 0 || offset >= total {
            return Ok((Vec::new(), total));
        }

        let top = TopDocs::with_limit(page.size.min(total - offset))
            .and_offset(offset)
            .order_by_fast_field::<i64>("entry_id", Order::Asc);

        let hits = searcher
            .search(&query, &top)
            .map_err(|e| PhonebookError::IndexError(format!("Search failed: {e}")))?;

        let mut documents = Vec::with_capacity(hits.len());
        for (_entry_id, address) in hits {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| {
                PhonebookError::IndexError(format!("Failed to retrieve document: {e}"))
            })?;
            documents.push(self.to_search_document(&doc));
        }

        Ok((documents, total))
    }

    fn clear(&self) -> Result<()> {
        let mut writer = self.lock_writer()?;
        writer
            .delete_all_documents()
            .map_err(|e| PhonebookError::IndexError(format!("Failed to clear index: {e}")))?;
        self.commit(&mut writer)
    }
}

/// Escape regex metacharacters for Tantivy's regex query syntax
fn escape_regex(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for ch in s.chars() {
        match ch {
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' => {
                result.push('\\');
                result.push(ch);
            }
            _ => result.push(ch),
        }
    }
    result
}

/// Extract text field from document
fn extract_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}
