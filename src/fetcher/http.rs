//! HTTP fetcher with a file-based page cache
//!
//! Every fetched page lands in the cache directory under the SHA-256 of its
//! URL; a cache entry is a hit until it is older than the configured TTL.
//! Cache hits never touch the network, which is what makes them free from
//! the throttler's point of view.

use crate::engine::Engine;
use crate::fetcher::parser::parse_serp;
use crate::fetcher::{SerpFetcher, SerpResults};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// User agent presented to the search engines
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Builds the fetcher for a given engine
///
/// The closed [`Engine`] set maps directly to a fetcher constructor; the
/// engine tag carried by the fetcher selects the extraction rules applied to
/// fetched pages.
pub fn build_fetcher(
    engine: Engine,
    cache_dir: &Path,
    cache_ttl_hours: u32,
) -> Result<Box<dyn SerpFetcher>, FetchError> {
    let fetcher = HttpSerpFetcher::new(engine, cache_dir, cache_ttl_hours)?;
    Ok(Box::new(fetcher))
}

/// Reqwest-backed SERP fetcher with TTL-expiring file cache
pub struct HttpSerpFetcher {
    client: Client,
    engine: Engine,
    cache_dir: PathBuf,
    cache_ttl_hours: u32,
}

impl HttpSerpFetcher {
    /// Creates a fetcher, setting up its cache directory
    pub fn new(engine: Engine, cache_dir: &Path, cache_ttl_hours: u32) -> Result<Self, FetchError> {
        std::fs::create_dir_all(cache_dir)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            engine,
            cache_dir: cache_dir.to_path_buf(),
            cache_ttl_hours,
        })
    }

    /// Returns the cache file path for a URL
    fn cache_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hex::encode(hasher.finalize());
        self.cache_dir.join(format!("{digest}.html"))
    }

    /// Returns true if the cache file exists and is younger than the TTL
    fn cache_fresh(&self, path: &Path) -> bool {
        let Ok(metadata) = std::fs::metadata(path) else {
            return false;
        };
        let Ok(modified) = metadata.modified() else {
            return false;
        };
        let ttl = Duration::from_secs(u64::from(self.cache_ttl_hours) * 3600);
        match SystemTime::now().duration_since(modified) {
            Ok(age) => age <= ttl,
            // Clock skew: an mtime in the future counts as fresh
            Err(_) => true,
        }
    }

    async fn fetch_raw(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl SerpFetcher for HttpSerpFetcher {
    fn cache_hit(&self, url: &str) -> bool {
        self.cache_fresh(&self.cache_path(url))
    }

    async fn fetch(&mut self, url: &str) -> Result<SerpResults, FetchError> {
        let path = self.cache_path(url);
        let html = if self.cache_fresh(&path) {
            tracing::debug!("Cache hit for {}", url);
            std::fs::read_to_string(&path)?
        } else {
            tracing::debug!("Fetching {}", url);
            let body = self.fetch_raw(url).await?;
            std::fs::write(&path, &body)?;
            body
        };
        Ok(parse_serp(&html, self.engine))
    }

    fn set_cache_ttl(&mut self, hours: u32) {
        self.cache_ttl_hours = hours;
    }

    fn flush_cache(&mut self) -> Result<(), FetchError> {
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}
