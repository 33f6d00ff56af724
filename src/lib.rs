//! Serp-Rake: a throttled search-engine result page scraper
//!
//! This crate scrapes result pages for a set of tracked keywords across a
//! fixed set of search engines, while keeping outbound HTTP traffic inside a
//! shared request budget. Pages move through a three-stage pipeline:
//! scrape (fetch + collect), serialize (JSON/XML/YAML) and save (one file per
//! page in the output directory). Admission against the global and
//! per-keyword quotas happens before any network activity.

pub mod config;
pub mod engine;
pub mod fetcher;
pub mod keywords;
pub mod output;
pub mod page;
pub mod scraper;
pub mod serializer;
pub mod throttle;
pub mod url;

use thiserror::Error;

/// Main error type for Serp-Rake operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Keyword error: {0}")]
    Keyword(#[from] KeywordError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error raised when naming a search engine outside the supported set
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown or unsupported search engine: {0}")]
    Unsupported(String),
}

/// Error raised by keyword validation
#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("Invalid keyword: {0}")]
    Invalid(String),
}

/// Errors raised by the SERP fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client construction failed: {0}")]
    Client(reqwest::Error),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Cache IO error: {0}")]
    Cache(#[from] std::io::Error),
}

/// Errors raised while encoding a fetched page
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML encoding failed: {0}")]
    Xml(#[from] quick_xml::SeError),

    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serializer cache IO error: {0}")]
    Cache(#[from] std::io::Error),
}

/// Result type alias for Serp-Rake operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use engine::Engine;
pub use page::{Format, SerializedPage, SerpEntry, SerpPage};
pub use scraper::{ScrapeOptions, SerpScraper};
pub use url::make_url;
