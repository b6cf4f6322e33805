//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod completions;
pub mod config;
pub mod entry;
pub mod list;
pub mod reindex;
pub mod search;
pub mod serve;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use list::ListArgs;
pub use reindex::ReindexArgs;
pub use search::SearchArgs;
pub use serve::ServeArgs;
