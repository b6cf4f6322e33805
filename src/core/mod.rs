//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of transport (HTTP API, web UI, CLI).
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **sanitize**: Input validation and normalization
//! - **xdg**: XDG directory handling
//! - **storage**: SQLite entry store and Tantivy search mirror
//! - **entries**: Entry service keeping store and index in sync
//! - **services**: Unified service container

pub mod config;
pub mod entries;
pub mod error;
pub mod sanitize;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use entries::EntryService;
pub use error::{PhonebookError, Result, ValidationError};
pub use services::Services;
