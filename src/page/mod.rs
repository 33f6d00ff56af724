//! Fetched and serialized page data
//!
//! A [`SerpPage`] is one result page captured for one keyword: where it came
//! from, when, and the result entries that survived pad filtering. Pages sit
//! in the scraper's fetched queue until they are serialized into
//! [`SerializedPage`] payloads and written out.

use crate::engine::Engine;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A single organic result entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerpEntry {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// One captured search-engine result page
#[derive(Debug, Clone, Serialize)]
pub struct SerpPage {
    /// Engine the page was scraped from
    pub engine: Engine,

    /// Tracked keyword the page belongs to
    pub keyword: String,

    /// Request URL the page was fetched from
    pub url: String,

    /// 1-based page number
    pub page_number: u32,

    /// Capture timestamp, in the timezone requested by the caller
    pub captured_at: DateTime<FixedOffset>,

    /// Result entries, pad sentinels already dropped
    pub entries: Vec<SerpEntry>,
}

impl SerpPage {
    /// Returns the capture date as `YYYY-MM-DD`, as used in composite keys
    pub fn capture_date(&self) -> String {
        self.captured_at.format("%Y-%m-%d").to_string()
    }
}

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
    Yml,
}

impl Format {
    /// Returns the lowercase format name, which doubles as file extension
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Yml => "yml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ();

    /// Case-insensitive; anything outside {json, xml, yml} is rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "yml" => Ok(Format::Yml),
            _ => Err(()),
        }
    }
}

/// An encoded page payload, ready to be written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedPage {
    /// Encoded bytes, exactly as the serializer produced them
    pub content: Vec<u8>,

    /// Format the payload was encoded in
    pub format: Format,
}
