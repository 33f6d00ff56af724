use serde::Deserialize;

/// Main configuration structure for Serp-Rake
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Search engine to scrape (google, bing, yahoo or ask)
    pub engine: String,

    /// Keywords to track, in scrape order
    pub keywords: Vec<String>,

    /// Result pages to fetch per keyword
    #[serde(rename = "pages-to-scrape", default = "default_pages_to_scrape")]
    pub pages_to_scrape: u32,

    /// Directory receiving the serialized page files
    #[serde(rename = "out-dir", default = "default_out_dir")]
    pub out_dir: String,

    /// Directory holding the fetcher's page cache
    #[serde(rename = "fetcher-cache-dir", default = "default_fetcher_cache_dir")]
    pub fetcher_cache_dir: String,

    /// Directory holding the serializer's payload cache
    #[serde(
        rename = "serializer-cache-dir",
        default = "default_serializer_cache_dir"
    )]
    pub serializer_cache_dir: String,

    /// Fetcher cache expiration, in hours
    #[serde(rename = "cache-ttl-hours", default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u32,

    /// Pause between page fetches, in milliseconds
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// IANA timezone identifier used for capture timestamps
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Request budget configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    /// Requests allowed per window across all keywords
    #[serde(rename = "global-threshold", default = "default_global_threshold")]
    pub global_threshold: u32,

    /// Requests allowed per window for a single keyword; absent = unchecked
    #[serde(rename = "component-threshold", default)]
    pub component_threshold: Option<u32>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Serialization format (json, xml or yml)
    #[serde(default = "default_format")]
    pub format: String,

    /// Drain the fetched/serialized queues as the pipeline advances
    #[serde(rename = "remove-on-complete", default)]
    pub remove_on_complete: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            global_threshold: default_global_threshold(),
            component_threshold: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            remove_on_complete: false,
        }
    }
}

fn default_pages_to_scrape() -> u32 {
    1
}

fn default_out_dir() -> String {
    "out".to_string()
}

fn default_fetcher_cache_dir() -> String {
    "fetcher_cache".to_string()
}

fn default_serializer_cache_dir() -> String {
    "serializer_cache".to_string()
}

fn default_cache_ttl_hours() -> u32 {
    24
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_global_threshold() -> u32 {
    crate::throttle::DEFAULT_GLOBAL_THRESHOLD
}

fn default_format() -> String {
    "json".to_string()
}
