//! Request URL generation
//!
//! Builds the absolute URL for one result page of one keyword on one engine.
//! Pure string assembly: no side effects, no network access. The zero-based
//! page offset supplied by the caller is converted into each engine's native
//! offset unit by [`Engine::normalize_offset`].

use crate::engine::Engine;

const QUERY_SEPARATOR: char = '&';

/// Builds the request URL for a keyword and zero-based page offset
///
/// The keyword is percent-encoded as a query value. The result has the shape
/// `<base><search-param>=<encoded keyword>&<offset-param>=<offset>`, e.g.
/// `http://www.google.com/search?q=foo&start=10`.
pub fn make_url(engine: Engine, keyword: &str, page_offset: u32) -> String {
    let encoded = urlencoding::encode(keyword);
    format!(
        "{}{}={}{}{}={}",
        engine.base_url(),
        engine.search_param(),
        encoded,
        QUERY_SEPARATOR,
        engine.offset_param(),
        engine.normalize_offset(page_offset)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_google_url_layout() {
        assert_eq!(
            make_url(Engine::Google, "foo", 0),
            "http://www.google.com/search?q=foo&start=0"
        );
        assert_eq!(
            make_url(Engine::Google, "foo", 3),
            "http://www.google.com/search?q=foo&start=30"
        );
    }

    #[test]
    fn test_bing_url_layout() {
        assert_eq!(
            make_url(Engine::Bing, "foo", 0),
            "http://www.bing.com/search?q=foo&first=1"
        );
        assert_eq!(
            make_url(Engine::Bing, "foo", 2),
            "http://www.bing.com/search?q=foo&first=21"
        );
    }

    #[test]
    fn test_yahoo_url_layout() {
        assert_eq!(
            make_url(Engine::Yahoo, "foo", 1),
            "https://search.yahoo.com/search?p=foo&b=11"
        );
    }

    #[test]
    fn test_ask_url_layout() {
        assert_eq!(
            make_url(Engine::Ask, "foo", 0),
            "http://us.ask.com/web?q=foo&page=1"
        );
        assert_eq!(
            make_url(Engine::Ask, "foo", 4),
            "http://us.ask.com/web?q=foo&page=5"
        );
    }

    #[test]
    fn test_keyword_is_percent_encoded() {
        let url = make_url(Engine::Google, "rust web scraping", 0);
        assert_eq!(
            url,
            "http://www.google.com/search?q=rust%20web%20scraping&start=0"
        );
    }

    #[test]
    fn test_generated_urls_parse() {
        for engine in crate::engine::ALL_ENGINES {
            let url = make_url(engine, "foo & bar", 2);
            let parsed = Url::parse(&url).unwrap();
            let query: Vec<(String, String)> = parsed
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            assert_eq!(query.len(), 2);
            assert_eq!(query[0].0, engine.search_param());
            assert_eq!(query[0].1, "foo & bar");
            assert_eq!(query[1].0, engine.offset_param());
        }
    }
}
