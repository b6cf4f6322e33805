//! Error types and error handling for the phonebook service.
//!
//! This module defines the error types used throughout the
//! application. Protocol-specific status mapping (HTTP codes, CLI exit
//! messages) is handled in the respective adapter modules.

use thiserror::Error;

/// Result type alias for phonebook operations
pub type Result<T> = std::result::Result<T, PhonebookError>;

/// Input rejected by the sanitizer.
///
/// Every variant carries a message naming the violated rule so callers can
/// show it to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Phone number must be exactly 8 digits")]
    InvalidPhone,

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name contains invalid characters")]
    InvalidName,

    #[error("Search keyword contains potentially dangerous content")]
    DangerousContent,

    #[error(
        "Search keyword contains invalid character: '{0}'. \
         Only letters, numbers, spaces, hyphens, and apostrophes are allowed."
    )]
    InvalidKeywordChar(char),

    #[error("Invalid numeric input: {0}")]
    NotNumeric(String),

    #[error("Search keyword cannot be empty")]
    MissingKeyword,

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}

impl ValidationError {
    /// Short stable code, used by the web UI to carry errors across redirects
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidPhone => "invalid_phone",
            ValidationError::EmptyName => "empty_name",
            ValidationError::InvalidName => "invalid_name",
            ValidationError::DangerousContent => "dangerous_keyword",
            ValidationError::InvalidKeywordChar(_) => "invalid_keyword",
            ValidationError::NotNumeric(_) => "not_numeric",
            ValidationError::MissingKeyword => "missing_keyword",
            ValidationError::InvalidPagination(_) => "invalid_page",
        }
    }
}

/// Main error type for the phonebook service
#[derive(Error, Debug)]
pub enum PhonebookError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Entry not found: {0}")]
    EntryNotFound(i64),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Search index error: {0}")]
    IndexError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    SqliteError(rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl From<rusqlite::Error> for PhonebookError {
    fn from(err: rusqlite::Error) -> Self {
        // UNIQUE(phone) violations are the only constraint a sanitized entry can hit
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
            if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                return PhonebookError::Conflict(
                    message
                        .clone()
                        .unwrap_or_else(|| "constraint violation".to_string()),
                );
            }
        }
        PhonebookError::SqliteError(err)
    }
}

impl From<tantivy::TantivyError> for PhonebookError {
    fn from(err: tantivy::TantivyError) -> Self {
        PhonebookError::IndexError(err.to_string())
    }
}

impl PhonebookError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, PhonebookError::EntryNotFound(_))
    }

    /// Check if this is a conflict error (duplicate phone)
    pub fn is_conflict(&self) -> bool {
        matches!(self, PhonebookError::Conflict(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(self, PhonebookError::Validation(_))
    }

    /// The validation failure behind this error, if any
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            PhonebookError::Validation(v) => Some(v),
            _ => None,
        }
    }
}
