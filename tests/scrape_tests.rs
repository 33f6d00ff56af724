//! Integration tests for the scrape → serialize → save pipeline
//!
//! The pipeline tests drive a `SerpScraper` end-to-end through the public
//! fetcher seam; the HTTP fetcher tests use wiremock to stand in for a
//! search engine.

use async_trait::async_trait;
use serp_rake::config::{Config, OutputConfig, ScraperConfig, ThrottleConfig};
use serp_rake::fetcher::{HttpSerpFetcher, SerpFetcher, SerpResults, RESULTS_PER_PAGE};
use serp_rake::{Engine, FetchError, ScrapeOptions, SerpScraper};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted in a temp directory
fn create_test_config(base: &TempDir, keywords: &[&str], pages: u32) -> Config {
    Config {
        scraper: ScraperConfig {
            engine: "google".to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            pages_to_scrape: pages,
            out_dir: base.path().join("out").to_string_lossy().into_owned(),
            fetcher_cache_dir: base
                .path()
                .join("fetcher_cache")
                .to_string_lossy()
                .into_owned(),
            serializer_cache_dir: base
                .path()
                .join("serializer_cache")
                .to_string_lossy()
                .into_owned(),
            cache_ttl_hours: 24,
            request_delay_ms: 1, // Very short for testing
            timezone: "UTC".to_string(),
        },
        throttle: ThrottleConfig::default(),
        output: OutputConfig::default(),
    }
}

/// Fetcher that answers every URL with a fixed three-entry result page
struct CannedFetcher {
    fetched: Arc<Mutex<Vec<String>>>,
}

impl CannedFetcher {
    fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let fetched = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                fetched: Arc::clone(&fetched),
            },
            fetched,
        )
    }
}

#[async_trait]
impl SerpFetcher for CannedFetcher {
    fn cache_hit(&self, _url: &str) -> bool {
        false
    }

    async fn fetch(&mut self, url: &str) -> Result<SerpResults, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());
        let mut results = SerpResults::padded();
        for i in 0..3 {
            results.urls[i] = format!("https://example.com/{i}");
            results.titles[i] = format!("Result {i}");
            results.snippets[i] = format!("Snippet {i}");
        }
        Ok(results)
    }

    fn set_cache_ttl(&mut self, _hours: u32) {}

    fn flush_cache(&mut self) -> Result<(), FetchError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_full_pipeline_produces_files() {
    let base = TempDir::new().unwrap();
    let config = create_test_config(&base, &["foo", "baz"], 2);
    let (fetcher, fetched) = CannedFetcher::new();

    let mut scraper = SerpScraper::with_fetcher(&config, Box::new(fetcher)).unwrap();

    let options = ScrapeOptions {
        pages: 2,
        ..ScrapeOptions::default()
    };
    assert!(scraper.scrape_all(&options).await.unwrap());

    // 2 keywords x 2 pages
    assert_eq!(scraper.fetched_pages().len(), 4);
    assert_eq!(fetched.lock().unwrap().len(), 4);
    assert_eq!(scraper.throttler().counter(), 4);

    assert!(scraper.serialize("json", true).unwrap());
    assert!(scraper.fetched_pages().is_empty());
    assert_eq!(scraper.serialized_pages().len(), 4);

    // Key shape: <engine>_<keyword>_<page>_<date>_<format>
    let keys: Vec<String> = scraper.serialized_pages().keys().cloned().collect();
    assert!(keys.iter().any(|k| k.starts_with("google_foo_1_")));
    assert!(keys.iter().any(|k| k.starts_with("google_foo_2_")));
    assert!(keys.iter().any(|k| k.starts_with("google_baz_1_")));
    assert!(keys.iter().any(|k| k.starts_with("google_baz_2_")));

    assert!(scraper.save(true).unwrap());
    assert!(scraper.serialized_pages().is_empty());

    for key in keys {
        let file_name = format!("{}.json", key.trim_end_matches("_json"));
        let path = scraper.out_dir().join(&file_name);
        assert!(path.is_file(), "missing output file {}", file_name);

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["engine"], "google");
        assert_eq!(value["entries"].as_array().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn test_exhausted_budget_fetches_nothing() {
    let base = TempDir::new().unwrap();
    let mut config = create_test_config(&base, &["foo", "baz"], 2);
    // 2 keywords x 2 pages = 4 proposed requests against a budget of 4:
    // the strict global check refuses the batch
    config.throttle.global_threshold = 4;
    let (fetcher, fetched) = CannedFetcher::new();

    let mut scraper = SerpScraper::with_fetcher(&config, Box::new(fetcher)).unwrap();

    let options = ScrapeOptions {
        pages: 2,
        ..ScrapeOptions::default()
    };
    assert!(!scraper.scrape_all(&options).await.unwrap());
    assert!(fetched.lock().unwrap().is_empty());
    assert!(scraper.fetched_pages().is_empty());

    // One page under the budget goes through
    let options = ScrapeOptions {
        pages: 1,
        ..ScrapeOptions::default()
    };
    assert!(scraper.scrape_all(&options).await.unwrap());
    assert_eq!(fetched.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_build_rejects_colliding_directories() {
    let base = TempDir::new().unwrap();
    let mut config = create_test_config(&base, &["foo"], 1);
    config.scraper.fetcher_cache_dir = config.scraper.out_dir.clone();

    assert!(SerpScraper::build(&config).is_err());
}

fn bing_serp_body(results: usize) -> String {
    let mut body = String::from("<html><body><ol id=\"b_results\">");
    for i in 0..results {
        body.push_str(&format!(
            r#"<li class="b_algo">
                <h2><a href="https://example.com/{i}">Result {i}</a></h2>
                <p>Snippet {i}</p>
            </li>"#
        ));
    }
    body.push_str("</ol></body></html>");
    body
}

#[tokio::test]
async fn test_http_fetcher_fetches_and_caches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(bing_serp_body(3)))
        .expect(1) // The second fetch must come from the cache
        .mount(&mock_server)
        .await;

    let cache = TempDir::new().unwrap();
    let mut fetcher = HttpSerpFetcher::new(Engine::Bing, cache.path(), 24).unwrap();
    let url = format!("{}/search?q=foo&first=1", mock_server.uri());

    assert!(!fetcher.cache_hit(&url));

    let results = fetcher.fetch(&url).await.unwrap();
    assert_eq!(results.urls.len(), RESULTS_PER_PAGE);
    assert_eq!(results.urls[0], "https://example.com/0");
    assert_eq!(results.titles[2], "Result 2");
    assert_eq!(results.snippets[0], "Snippet 0");

    // Cached now: fetching again must not hit the server
    assert!(fetcher.cache_hit(&url));
    let cached_results = fetcher.fetch(&url).await.unwrap();
    assert_eq!(cached_results, results);

    fetcher.flush_cache().unwrap();
    assert!(!fetcher.cache_hit(&url));
}

#[tokio::test]
async fn test_http_fetcher_propagates_http_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let cache = TempDir::new().unwrap();
    let mut fetcher = HttpSerpFetcher::new(Engine::Bing, cache.path(), 24).unwrap();
    let url = format!("{}/search?q=foo&first=1", mock_server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 429, .. }));
    // A failed fetch leaves no cache entry behind
    assert!(!fetcher.cache_hit(&url));
}
