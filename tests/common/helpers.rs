// Test helper functions

use axum::body::Body;
use axum::http::Response;
use axum::Router;
use phonebook::core::config::Config;
use phonebook::core::entries::EntryService;
use phonebook::core::error::{PhonebookError, Result};
use phonebook::core::services::Services;
use phonebook::core::storage::{SearchIndex, SqliteEntryStore, TantivySearchIndex};
use phonebook::core::types::{PageRequest, SearchDocument};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Config pointing storage into a temporary directory
#[allow(dead_code)]
pub fn temp_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.database_path = temp_dir.path().join("phonebook.db");
    config.storage.index_dir = temp_dir.path().join("index");
    config
}

/// Create file-backed test services
///
/// The returned `TempDir` must be kept alive for the duration of the test.
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services() -> (Arc<Services>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let services = Services::new(temp_config(&temp_dir)).expect("Failed to open services");
    (Arc::new(services), temp_dir)
}

/// Create the full router over fresh test services
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<Services>, TempDir) {
    let (services, temp_dir) = create_test_services();
    let app = phonebook::http::build_router(services.clone());
    (app, services, temp_dir)
}

/// Search index that can be switched into a failing state
#[allow(dead_code)]
pub struct FailingIndex {
    inner: TantivySearchIndex,
    failing: AtomicBool,
}

#[allow(dead_code)]
impl FailingIndex {
    pub fn new() -> Self {
        Self {
            inner: TantivySearchIndex::in_memory().expect("in-memory index"),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PhonebookError::IndexError("index unavailable".to_string()));
        }
        Ok(())
    }
}

impl SearchIndex for FailingIndex {
    fn upsert(&self, doc: &SearchDocument) -> Result<()> {
        self.check()?;
        self.inner.upsert(doc)
    }

    fn delete_by_id(&self, id: &str) -> Result<()> {
        self.check()?;
        self.inner.delete_by_id(id)
    }

    fn query_prefix(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<(Vec<SearchDocument>, usize)> {
        self.inner.query_prefix(keyword, page)
    }

    fn clear(&self) -> Result<()> {
        self.check()?;
        self.inner.clear()
    }
}

/// In-memory services whose index can be made to fail
#[allow(dead_code)]
pub fn create_failing_services() -> (Arc<Services>, Arc<FailingIndex>) {
    let store = Arc::new(SqliteEntryStore::open_in_memory().expect("in-memory store"));
    let index = Arc::new(FailingIndex::new());
    let entries = EntryService::new(store, index.clone());
    (
        Arc::new(Services::from_parts(entries, Config::default())),
        index,
    )
}

/// Collect a response body as a string
#[allow(dead_code)]
pub async fn read_body(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body as JSON
#[allow(dead_code)]
pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
