//! SERP fetching and caching
//!
//! This module owns all network access for the scraper:
//! - the [`SerpFetcher`] trait, the narrow contract the orchestrator and the
//!   admission check consume (cache-hit probe, fetch, TTL control, flush)
//! - [`HttpSerpFetcher`], the reqwest-backed implementation with a file-based
//!   page cache
//! - per-engine result extraction from raw HTML
//!
//! Fetch results are fixed-length parallel arrays, padded with a sentinel
//! entry when an engine returns fewer results than a full page. Consumers
//! drop the padded rows.

mod http;
mod parser;

use crate::FetchError;
use async_trait::async_trait;

pub use http::{build_fetcher, HttpSerpFetcher};
pub use parser::parse_serp;

/// Number of result slots per fetched page
pub const RESULTS_PER_PAGE: usize = 10;

/// Sentinel value filling result slots past the end of a short result set
pub const PAD_ENTRY: &str = "";

/// One page of raw SERP results as parallel arrays
///
/// All three vectors have exactly [`RESULTS_PER_PAGE`] elements; missing
/// results are padded with [`PAD_ENTRY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerpResults {
    pub urls: Vec<String>,
    pub titles: Vec<String>,
    pub snippets: Vec<String>,
}

impl SerpResults {
    /// Creates a fully padded (empty) result page
    pub fn padded() -> Self {
        Self {
            urls: vec![PAD_ENTRY.to_string(); RESULTS_PER_PAGE],
            titles: vec![PAD_ENTRY.to_string(); RESULTS_PER_PAGE],
            snippets: vec![PAD_ENTRY.to_string(); RESULTS_PER_PAGE],
        }
    }
}

/// Contract between the scraper core and the fetch-and-cache engine
#[async_trait]
pub trait SerpFetcher: Send {
    /// Returns true if unexpired content for the URL is already cached,
    /// meaning a fetch would need no new HTTP request
    fn cache_hit(&self, url: &str) -> bool;

    /// Retrieves the result page for a URL, from cache or network
    async fn fetch(&mut self, url: &str) -> Result<SerpResults, FetchError>;

    /// Sets the cache expiration time, in hours
    fn set_cache_ttl(&mut self, hours: u32);

    /// Drops all cached pages
    fn flush_cache(&mut self) -> Result<(), FetchError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory fetcher stub shared by the unit tests

    use super::{SerpFetcher, SerpResults, RESULTS_PER_PAGE};
    use crate::FetchError;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// Fetcher with a configurable cached-URL set and canned results
    pub(crate) struct StubFetcher {
        cached: HashSet<String>,
        results: SerpResults,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl StubFetcher {
        pub(crate) fn empty() -> Self {
            Self {
                cached: HashSet::new(),
                results: SerpResults::padded(),
                log: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn with_cached(urls: &[String]) -> Self {
            let mut stub = Self::empty();
            stub.cached = urls.iter().cloned().collect();
            stub
        }

        /// Canned results: `count` real entries, the rest padding
        pub(crate) fn with_result_count(count: usize) -> Self {
            let mut results = SerpResults::padded();
            for i in 0..count.min(RESULTS_PER_PAGE) {
                results.urls[i] = format!("https://example.com/{i}");
                results.titles[i] = format!("Result {i}");
                results.snippets[i] = format!("Snippet {i}");
            }
            let mut stub = Self::empty();
            stub.results = results;
            stub
        }

        /// Handle onto the log of URLs passed to `fetch`
        pub(crate) fn fetch_log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.log)
        }
    }

    #[async_trait]
    impl SerpFetcher for StubFetcher {
        fn cache_hit(&self, url: &str) -> bool {
            self.cached.contains(url)
        }

        async fn fetch(&mut self, url: &str) -> Result<SerpResults, FetchError> {
            self.log.lock().unwrap().push(url.to_string());
            Ok(self.results.clone())
        }

        fn set_cache_ttl(&mut self, _hours: u32) {}

        fn flush_cache(&mut self) -> Result<(), FetchError> {
            self.cached.clear();
            Ok(())
        }
    }
}
