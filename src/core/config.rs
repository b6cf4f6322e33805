//! Configuration management for the phonebook service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{PhonebookError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Directory holding the search index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,
}

/// Pagination defaults for the JSON API and the web UI
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    /// Page size for API requests that omit `size`
    #[serde(default = "default_api_page_size")]
    pub api_page_size: usize,

    /// Page size for web pages that omit `size`
    #[serde(default = "default_web_page_size")]
    pub web_page_size: usize,

    /// Upper bound applied to any requested page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

/// Presentation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Title shown on every web page
    #[serde(default = "default_title")]
    pub title: String,
}

/// Limits configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data/phonebook.db")
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./data/index")
}

fn default_api_page_size() -> usize {
    10
}

fn default_web_page_size() -> usize {
    5
}

fn default_max_page_size() -> usize {
    100
}

fn default_title() -> String {
    "Phonebook".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            index_dir: default_index_dir(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            api_page_size: default_api_page_size(),
            web_page_size: default_web_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_sec: default_request_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| PhonebookError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// File lookup order:
    /// 1. PHONEBOOK_CONFIG env var
    /// 2. XDG config file (~/.config/phonebook/config.toml)
    /// 3. ./phonebook.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("PHONEBOOK_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("phonebook.toml").exists() {
                Self::from_file("phonebook.toml")?
            } else {
                Self::default()
            }
        };

        // Untouched storage paths move to the XDG data directory
        if config.storage.database_path == default_database_path() {
            config.storage.database_path = xdg.database_path();
        }
        if config.storage.index_dir == default_index_dir() {
            config.storage.index_dir = xdg.index_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(host) = env::var("PHONEBOOK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_env("PHONEBOOK_PORT") {
            self.server.port = port;
        }

        if let Ok(path) = env::var("PHONEBOOK_DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("PHONEBOOK_INDEX_DIR") {
            self.storage.index_dir = PathBuf::from(dir);
        }

        if let Some(size) = parse_env("PHONEBOOK_API_PAGE_SIZE") {
            self.pagination.api_page_size = size;
        }
        if let Some(size) = parse_env("PHONEBOOK_WEB_PAGE_SIZE") {
            self.pagination.web_page_size = size;
        }
        if let Some(size) = parse_env("PHONEBOOK_MAX_PAGE_SIZE") {
            self.pagination.max_page_size = size;
        }

        if let Ok(title) = env::var("PHONEBOOK_APP_TITLE") {
            self.app.title = title;
        }

        if let Some(timeout) = parse_env("PHONEBOOK_REQUEST_TIMEOUT_SEC") {
            self.limits.request_timeout_sec = timeout;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(PhonebookError::ConfigError(
                "Server port must be non-zero".to_string(),
            ));
        }

        if self.pagination.api_page_size == 0 || self.pagination.web_page_size == 0 {
            return Err(PhonebookError::ConfigError(
                "Default page sizes must be non-zero".to_string(),
            ));
        }

        if self.pagination.api_page_size > self.pagination.max_page_size
            || self.pagination.web_page_size > self.pagination.max_page_size
        {
            return Err(PhonebookError::ConfigError(
                "Default page sizes cannot exceed max page size".to_string(),
            ));
        }

        if self.app.title.trim().is_empty() {
            return Err(PhonebookError::ConfigError(
                "App title must not be empty".to_string(),
            ));
        }

        if self.limits.request_timeout_sec == 0 {
            return Err(PhonebookError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen: {}:{}", self.server.host, self.server.port);
        tracing::info!("  Database: {:?}", self.storage.database_path);
        tracing::info!("  Index dir: {:?}", self.storage.index_dir);
        tracing::info!(
            "  Page sizes: api={} web={} max={}",
            self.pagination.api_page_size,
            self.pagination.web_page_size,
            self.pagination.max_page_size
        );
        tracing::info!("  Title: {}", self.app.title);
        tracing::info!("  Request timeout: {}s", self.limits.request_timeout_sec);
    }
}

/// Parse an env var, ignoring unset or malformed values
fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
