//! Phonebook - contact management service
//!
//! Stores phonebook entries (name, phone number) in SQLite, mirrors them
//! into a Tantivy index for prefix search on name or phone, and exposes
//! them through a JSON API, a server-rendered web UI and a CLI.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg
//!   - sanitize (input validation)
//!   - storage (SQLite store, Tantivy mirror)
//!   - entries (dual-write orchestration)
//!   - services (unified service container)
//!
//! - **http**: REST API and web UI adapter (depends on core)
//!   - handlers, web, middleware, router
//!
//! - **cli**: Command-line adapter (depends on core and http)
//!
//! # Consistency model
//!
//! The SQLite store is the system of record. Index writes follow store
//! writes without a shared transaction; a failed index write is reported
//! as [`SyncOutcome::Diverged`] and can be repaired with a reindex.

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP adapter (JSON API + web UI)
pub mod http;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{PhonebookError, Result, ValidationError};
pub use core::services::Services;
pub use core::types::*;
