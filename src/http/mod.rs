//! HTTP adapter
//!
//! Depends only on core/. Serves the JSON API under `/api/phonebook` and
//! the server-rendered web UI under `/phonebook` via the Axum web
//! framework.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod web;

pub use router::{build_router, serve};
