//! Scrape orchestration
//!
//! [`SerpScraper`] drives the whole pipeline for one engine: it owns the
//! keyword registry, the throttler, the fetcher and the serializer, plus the
//! two in-process queues (fetched pages, serialized payloads). A scrape
//! request moves through validate → admission → fetch; the collected pages
//! can then be serialized and saved, optionally draining the queues as they
//! go.
//!
//! Operations follow the soft-failure contract: invalid input and not-ready
//! preconditions yield `Ok(false)`, while fetcher and filesystem failures
//! inside an admitted batch propagate as errors. Construction, by contrast,
//! hard-fails on any configuration problem.

use crate::config::Config;
use crate::engine::Engine;
use crate::fetcher::{build_fetcher, SerpFetcher, SerpResults, PAD_ENTRY, RESULTS_PER_PAGE};
use crate::keywords::{self, Registry};
use crate::output::{composite_key, file_name_for_key, set_up_dir};
use crate::page::{Format, SerializedPage, SerpEntry, SerpPage};
use crate::serializer::PageSerializer;
use crate::throttle::admission::{allowed_scrape_operation, UrlBatch};
use crate::throttle::Throttler;
use crate::url::make_url;
use crate::Result;
use chrono::Utc;
use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Per-call scrape parameters
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Result pages to fetch per keyword (1-based count)
    pub pages: u32,

    /// Remove each keyword from the registry once its pages are fetched
    pub remove_on_complete: bool,

    /// IANA timezone identifier used to stamp captured pages
    pub timezone: String,

    /// Run the admission check before fetching
    pub throttling: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            pages: 1,
            remove_on_complete: false,
            timezone: "UTC".to_string(),
            throttling: true,
        }
    }
}

/// Orchestrates scrape, serialize and save for one search engine
pub struct SerpScraper {
    engine: Engine,
    out_dir: PathBuf,
    fetcher_cache_dir: PathBuf,
    serializer_cache_dir: PathBuf,
    cache_ttl_hours: u32,
    request_delay_ms: u64,
    registry: Registry,
    throttler: Throttler,
    fetcher: Box<dyn SerpFetcher>,
    serializer: PageSerializer,
    fetched: Vec<SerpPage>,
    serialized: BTreeMap<String, SerializedPage>,
}

impl SerpScraper {
    /// Builds a scraper from a validated configuration
    ///
    /// Hard-fails on an invalid keyword list, colliding directories,
    /// non-positive TTL/delay or an unknown engine. Seed keywords are
    /// normalized and registered with the throttler before the window opens.
    pub fn build(config: &Config) -> Result<Self> {
        crate::config::validate(config)?;
        let engine: Engine = config.scraper.engine.parse()?;
        let fetcher = build_fetcher(
            engine,
            Path::new(&config.scraper.fetcher_cache_dir),
            config.scraper.cache_ttl_hours,
        )?;
        Self::with_fetcher(config, fetcher)
    }

    /// Builds a scraper around a caller-supplied fetcher
    ///
    /// Same validation as [`build`](Self::build); the fetcher seam is the
    /// injection point for tests and for callers bringing their own
    /// fetch-and-cache engine.
    pub fn with_fetcher(config: &Config, fetcher: Box<dyn SerpFetcher>) -> Result<Self> {
        crate::config::validate(config)?;
        let engine: Engine = config.scraper.engine.parse()?;

        let out_dir = PathBuf::from(&config.scraper.out_dir);
        let fetcher_cache_dir = PathBuf::from(&config.scraper.fetcher_cache_dir);
        let serializer_cache_dir = PathBuf::from(&config.scraper.serializer_cache_dir);
        set_up_dir(&out_dir)?;

        let mut throttler = Throttler::new(
            config.throttle.global_threshold,
            config.throttle.component_threshold,
        );
        let mut registry = Registry::new();
        for keyword in &config.scraper.keywords {
            registry.add(keyword, &mut throttler);
        }
        throttler.start();

        let serializer = PageSerializer::new(&serializer_cache_dir)?;

        tracing::info!(
            "Scraper ready: engine={}, keywords={}, global threshold={}",
            engine,
            registry.len(),
            config.throttle.global_threshold
        );

        Ok(Self {
            engine,
            out_dir,
            fetcher_cache_dir,
            serializer_cache_dir,
            cache_ttl_hours: config.scraper.cache_ttl_hours,
            request_delay_ms: config.scraper.request_delay_ms,
            registry,
            throttler,
            fetcher,
            serializer,
            fetched: Vec::new(),
            serialized: BTreeMap::new(),
        })
    }

    /// Scrapes a single keyword
    ///
    /// Wraps the keyword into a one-element batch; see
    /// [`scrape_batch`](Self::scrape_batch).
    pub async fn scrape(&mut self, keyword: &str, opts: &ScrapeOptions) -> Result<bool> {
        self.scrape_batch(&[keyword.to_string()], opts).await
    }

    /// Scrapes every tracked keyword
    ///
    /// Returns `Ok(false)` when the registry is empty.
    pub async fn scrape_all(&mut self, opts: &ScrapeOptions) -> Result<bool> {
        let keywords = self.registry.keywords().to_vec();
        self.scrape_batch(&keywords, opts).await
    }

    /// Scrapes a batch of keywords, page by page
    ///
    /// Validation failures and a refused admission return `Ok(false)` with no
    /// side effects. Once admitted, the batch runs every (keyword, page) pair
    /// to completion: pages land in the fetched queue, quota is consumed per
    /// cache miss before each fetch, and a fixed delay paces the loop whether
    /// or not the page came from cache.
    pub async fn scrape_batch(&mut self, keywords: &[String], opts: &ScrapeOptions) -> Result<bool> {
        let Some(timezone) = self.valid_scrape_args(keywords, opts) else {
            tracing::debug!("Rejecting scrape request: invalid arguments");
            return Ok(false);
        };

        let batch: UrlBatch = keywords
            .iter()
            .map(|keyword| {
                let urls = (0..opts.pages)
                    .map(|page| make_url(self.engine, keyword, page))
                    .collect();
                (keyword.clone(), urls)
            })
            .collect();

        if opts.throttling
            && !allowed_scrape_operation(
                &mut self.throttler,
                self.fetcher.as_ref(),
                self.registry.keywords(),
                &batch,
            )
        {
            tracing::info!(
                "Scrape batch refused: {} keywords x {} pages would exceed the request budget",
                keywords.len(),
                opts.pages
            );
            return Ok(false);
        }

        for (keyword, urls) in &batch {
            for (page_index, page_url) in urls.iter().enumerate() {
                let results = self.fetch_page(keyword, page_url).await?;
                let entries = make_entries(&results);
                tracing::debug!(
                    "Captured page {} for '{}' ({} entries)",
                    page_index + 1,
                    keyword,
                    entries.len()
                );

                self.fetched.push(SerpPage {
                    engine: self.engine,
                    keyword: keyword.clone(),
                    url: page_url.clone(),
                    page_number: page_index as u32 + 1,
                    captured_at: Utc::now().with_timezone(&timezone).fixed_offset(),
                    entries,
                });

                // Uniform pacing, cache hit or not
                tokio::time::sleep(Duration::from_millis(self.request_delay_ms)).await;
            }

            if opts.remove_on_complete {
                self.registry.remove(keyword);
            }
        }

        Ok(true)
    }

    /// Serializes every queued fetched page into the given format
    ///
    /// Returns `Ok(false)` when the fetched queue is empty or the format is
    /// not one of json/xml/yml (case-insensitive). Payloads are stored under
    /// their composite keys; the fetched queue is drained when the flag is
    /// set.
    pub fn serialize(&mut self, format: &str, remove_fetched: bool) -> Result<bool> {
        let Ok(format) = format.parse::<Format>() else {
            return Ok(false);
        };
        if self.fetched.is_empty() {
            return Ok(false);
        }

        for page in &self.fetched {
            let key = composite_key(
                page.engine,
                &page.keyword,
                page.page_number,
                &page.capture_date(),
                format,
            );
            let payload = self.serializer.serialize(page, format)?;
            self.serialized.insert(key, payload);
        }
        tracing::info!(
            "Serialized {} pages to {}",
            self.fetched.len(),
            format
        );

        if remove_fetched {
            self.fetched.clear();
        }
        Ok(true)
    }

    /// Writes every serialized payload into the output directory
    ///
    /// Returns `Ok(false)` when the serialized map is empty. Filenames are
    /// the composite keys with the trailing format segment rewritten into an
    /// extension. The serialized map is drained when the flag is set.
    pub fn save(&mut self, remove_serialized: bool) -> Result<bool> {
        if self.serialized.is_empty() {
            return Ok(false);
        }
        set_up_dir(&self.out_dir)?;

        for (key, page) in &self.serialized {
            let path = self.out_dir.join(file_name_for_key(key));
            std::fs::write(&path, &page.content)?;
        }
        tracing::info!(
            "Saved {} pages to {}",
            self.serialized.len(),
            self.out_dir.display()
        );

        if remove_serialized {
            self.serialized.clear();
        }
        Ok(true)
    }

    /// Flushes the fetcher cache and empties both queues
    pub fn flush_cache(&mut self) -> Result<()> {
        self.fetcher.flush_cache()?;
        self.fetched.clear();
        self.serialized.clear();
        Ok(())
    }

    /// Adds a keyword to track; false on invalid input or duplicate
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        self.registry.add(keyword, &mut self.throttler)
    }

    /// Adds multiple keywords; false if the list as a whole is invalid
    pub fn add_keywords(&mut self, keywords: &[String]) -> bool {
        self.registry.add_all(keywords, &mut self.throttler)
    }

    /// Stops tracking a keyword; its quota counter entry is retained
    pub fn remove_keyword(&mut self, keyword: &str) -> bool {
        self.registry.remove(keyword)
    }

    /// Returns the tracked keywords in scrape order
    pub fn keywords(&self) -> &[String] {
        self.registry.keywords()
    }

    /// Returns the engine this scraper targets
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Returns the queued fetched pages
    pub fn fetched_pages(&self) -> &[SerpPage] {
        &self.fetched
    }

    /// Returns the serialized payloads keyed by composite key
    pub fn serialized_pages(&self) -> &BTreeMap<String, SerializedPage> {
        &self.serialized
    }

    /// Removes and returns all queued fetched pages
    pub fn drain_fetched(&mut self) -> Vec<SerpPage> {
        std::mem::take(&mut self.fetched)
    }

    /// Removes and returns all serialized payloads
    pub fn drain_serialized(&mut self) -> BTreeMap<String, SerializedPage> {
        std::mem::take(&mut self.serialized)
    }

    /// Returns the throttler owning the quota counters
    pub fn throttler(&self) -> &Throttler {
        &self.throttler
    }

    /// Returns the output directory
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Points the scraper at a new output directory
    ///
    /// False when the name is empty, collides with a cache directory, or the
    /// directory cannot be created.
    pub fn set_out_dir(&mut self, dir: &str) -> bool {
        if dir.is_empty()
            || !crate::output::prevent_cache_collision(
                dir,
                &self.fetcher_cache_dir.to_string_lossy(),
                &self.serializer_cache_dir.to_string_lossy(),
            )
        {
            return false;
        }
        let path = PathBuf::from(dir);
        if set_up_dir(&path).is_err() {
            return false;
        }
        self.out_dir = path;
        true
    }

    /// Returns the fetcher cache directory
    pub fn fetcher_cache_dir(&self) -> &Path {
        &self.fetcher_cache_dir
    }

    /// Points the scraper at a new fetcher cache directory
    ///
    /// Rebuilds the fetcher against the new location; false when the name is
    /// empty, collides with another directory, or the fetcher cannot be
    /// rebuilt.
    pub fn set_fetcher_cache_dir(&mut self, dir: &str) -> bool {
        if dir.is_empty()
            || !crate::output::prevent_cache_collision(
                &self.out_dir.to_string_lossy(),
                dir,
                &self.serializer_cache_dir.to_string_lossy(),
            )
        {
            return false;
        }
        let path = PathBuf::from(dir);
        match build_fetcher(self.engine, &path, self.cache_ttl_hours) {
            Ok(fetcher) => {
                self.fetcher = fetcher;
                self.fetcher_cache_dir = path;
                true
            }
            Err(_) => false,
        }
    }

    /// Returns the serializer cache directory
    pub fn serializer_cache_dir(&self) -> &Path {
        &self.serializer_cache_dir
    }

    /// Returns the fetcher cache TTL, in hours
    pub fn cache_ttl(&self) -> u32 {
        self.cache_ttl_hours
    }

    /// Sets the fetcher cache TTL; false on zero
    pub fn set_cache_ttl(&mut self, hours: u32) -> bool {
        if hours == 0 {
            return false;
        }
        self.cache_ttl_hours = hours;
        self.fetcher.set_cache_ttl(hours);
        true
    }

    /// Returns the inter-request delay, in milliseconds
    pub fn request_delay(&self) -> u64 {
        self.request_delay_ms
    }

    /// Sets the inter-request delay; false on zero
    pub fn set_request_delay(&mut self, milliseconds: u64) -> bool {
        if milliseconds == 0 {
            return false;
        }
        self.request_delay_ms = milliseconds;
        true
    }

    /// Sets the global request threshold; false on zero
    pub fn set_global_threshold(&mut self, threshold: u32) -> bool {
        self.throttler.set_global_threshold(threshold)
    }

    /// Sets the per-keyword request threshold; false on zero
    pub fn set_component_threshold(&mut self, threshold: u32) -> bool {
        self.throttler.set_component_threshold(threshold)
    }

    /// Validates scrape arguments, returning the parsed timezone on success
    ///
    /// Soft contract: every violation means "reject the request", never an
    /// error. Keywords must be valid and currently tracked, the page count
    /// positive, the timezone a recognized identifier.
    fn valid_scrape_args(&self, keywords: &[String], opts: &ScrapeOptions) -> Option<Tz> {
        if !keywords::valid_keywords(keywords) {
            return None;
        }
        if !keywords.iter().all(|k| self.registry.contains(k)) {
            return None;
        }
        if opts.pages == 0 {
            return None;
        }
        opts.timezone.parse::<Tz>().ok()
    }

    /// Fetches one page, consuming quota on a cache miss
    ///
    /// The component counter moves before the fetch call: quota reflects the
    /// intent to hit the network, so a failed fetch still counts.
    async fn fetch_page(&mut self, keyword: &str, url: &str) -> Result<SerpResults> {
        if !self.fetcher.cache_hit(url) {
            self.throttler.update_component(keyword);
        }
        Ok(self.fetcher.fetch(url).await?)
    }
}

/// Maps raw fetch results into page entries, dropping pad sentinels
fn make_entries(results: &SerpResults) -> Vec<SerpEntry> {
    let mut entries = Vec::new();
    for i in 0..RESULTS_PER_PAGE {
        let entry = SerpEntry {
            url: results.urls[i].clone(),
            title: results.titles[i].clone(),
            snippet: results.snippets[i].clone(),
        };
        if !padded_entry(&entry) {
            entries.push(entry);
        }
    }
    entries
}

/// True for the all-sentinel rows the fetcher uses to pad short result sets
fn padded_entry(entry: &SerpEntry) -> bool {
    entry.url == PAD_ENTRY && entry.title == PAD_ENTRY && entry.snippet == PAD_ENTRY
}
