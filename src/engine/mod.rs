//! The closed set of supported search engines
//!
//! Every engine-specific detail lives behind the [`Engine`] enum: URL layout,
//! pagination offset rules, and (in the fetcher module) the CSS selectors
//! used to pull result entries out of a page. Engine names parse
//! case-insensitively; anything outside the set is a hard error, never a
//! default.

use crate::EngineError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A supported search engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Google,
    Bing,
    Yahoo,
    Ask,
}

/// All supported engines, in a fixed order
pub const ALL_ENGINES: [Engine; 4] = [Engine::Google, Engine::Bing, Engine::Yahoo, Engine::Ask];

impl Engine {
    /// Returns the lowercase engine name used in composite keys and filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Google => "google",
            Engine::Bing => "bing",
            Engine::Yahoo => "yahoo",
            Engine::Ask => "ask",
        }
    }

    /// Returns the base search URL, ending at the query string
    pub fn base_url(&self) -> &'static str {
        match self {
            Engine::Google => "http://www.google.com/search?",
            Engine::Bing => "http://www.bing.com/search?",
            Engine::Yahoo => "https://search.yahoo.com/search?",
            Engine::Ask => "http://us.ask.com/web?",
        }
    }

    /// Returns the query parameter carrying the search terms
    pub fn search_param(&self) -> &'static str {
        match self {
            Engine::Yahoo => "p",
            _ => "q",
        }
    }

    /// Returns the query parameter carrying the pagination offset
    pub fn offset_param(&self) -> &'static str {
        match self {
            Engine::Google => "start",
            Engine::Bing => "first",
            Engine::Yahoo => "b",
            Engine::Ask => "page",
        }
    }

    /// Converts a zero-based page offset into the engine's native offset unit
    ///
    /// Google counts results (10 per page, zero-based), Bing and Yahoo count
    /// results one-based, Ask counts pages one-based.
    pub fn normalize_offset(&self, page_offset: u32) -> u32 {
        match self {
            Engine::Google => page_offset * 10,
            Engine::Bing | Engine::Yahoo => page_offset * 10 + 1,
            Engine::Ask => page_offset + 1,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Engine::Google),
            "bing" => Ok(Engine::Bing),
            "yahoo" => Ok(Engine::Yahoo),
            "ask" => Ok(Engine::Ask),
            other => Err(EngineError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_engines() {
        assert_eq!("google".parse::<Engine>().unwrap(), Engine::Google);
        assert_eq!("Bing".parse::<Engine>().unwrap(), Engine::Bing);
        assert_eq!("YAHOO".parse::<Engine>().unwrap(), Engine::Yahoo);
        assert_eq!("ask".parse::<Engine>().unwrap(), Engine::Ask);
    }

    #[test]
    fn test_parse_unknown_engine_is_an_error() {
        let err = "duckduckgo".parse::<Engine>().unwrap_err();
        assert!(matches!(err, EngineError::Unsupported(_)));
    }

    #[test]
    fn test_offset_normalization() {
        for n in 0..5 {
            assert_eq!(Engine::Google.normalize_offset(n), n * 10);
            assert_eq!(Engine::Bing.normalize_offset(n), n * 10 + 1);
            assert_eq!(Engine::Yahoo.normalize_offset(n), n * 10 + 1);
            assert_eq!(Engine::Ask.normalize_offset(n), n + 1);
        }
    }

    #[test]
    fn test_display_is_lowercase() {
        for engine in ALL_ENGINES {
            let name = engine.to_string();
            assert_eq!(name, name.to_lowercase());
        }
    }
}
