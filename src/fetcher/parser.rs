//! Result extraction from raw SERP HTML
//!
//! Each engine lays out its result page differently; the selector table below
//! is the single place that knows about those layouts. Extraction always
//! yields exactly [`RESULTS_PER_PAGE`](crate::fetcher::RESULTS_PER_PAGE)
//! slots, padded with the sentinel entry when the page holds fewer results.

use crate::engine::Engine;
use crate::fetcher::{SerpResults, PAD_ENTRY, RESULTS_PER_PAGE};
use scraper::{ElementRef, Html, Selector};

/// CSS selectors locating result entries for one engine
struct SelectorSet {
    /// One match per organic result block
    result: &'static str,
    /// Title element, relative to a result block
    title: &'static str,
    /// Anchor carrying the result URL, relative to a result block
    link: &'static str,
    /// Snippet element, relative to a result block
    snippet: &'static str,
}

/// Per-engine extraction rules
fn selector_set(engine: Engine) -> SelectorSet {
    match engine {
        Engine::Google => SelectorSet {
            result: "div.g",
            title: "h3",
            link: "a[href]",
            snippet: "div[data-sncf], span.st",
        },
        Engine::Bing => SelectorSet {
            result: "li.b_algo",
            title: "h2",
            link: "h2 a[href]",
            snippet: "p",
        },
        Engine::Yahoo => SelectorSet {
            result: "div.algo",
            title: "h3",
            link: "h3 a[href]",
            snippet: "div.compText p",
        },
        Engine::Ask => SelectorSet {
            result: "div.PartialSearchResults-item",
            title: "a.PartialSearchResults-item-title-link",
            link: "a.PartialSearchResults-item-title-link",
            snippet: "p.PartialSearchResults-item-abstract",
        },
    }
}

/// Extracts result entries from a fetched page
///
/// Returns parallel url/title/snippet arrays of fixed length, padded with the
/// sentinel entry past the end of the organic results.
pub fn parse_serp(html: &str, engine: Engine) -> SerpResults {
    let document = Html::parse_document(html);
    let selectors = selector_set(engine);
    let mut results = SerpResults::padded();

    let Ok(result_selector) = Selector::parse(selectors.result) else {
        return results;
    };

    for (i, block) in document
        .select(&result_selector)
        .take(RESULTS_PER_PAGE)
        .enumerate()
    {
        results.urls[i] = select_attr(&block, selectors.link, "href");
        results.titles[i] = select_text(&block, selectors.title);
        results.snippets[i] = select_text(&block, selectors.snippet);
    }

    results
}

/// Returns the trimmed text of the first match, or the pad sentinel
fn select_text(block: &ElementRef, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return PAD_ENTRY.to_string();
    };
    block
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| PAD_ENTRY.to_string())
}

/// Returns an attribute of the first match, or the pad sentinel
fn select_attr(block: &ElementRef, selector: &str, attr: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return PAD_ENTRY.to_string();
    };
    block
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.to_string())
        .unwrap_or_else(|| PAD_ENTRY.to_string())
}
