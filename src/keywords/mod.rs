//! Keyword validation, cleaning and the tracked-keyword registry
//!
//! Keywords are user input: they get trimmed, internal whitespace runs get
//! collapsed, and the result is lowercased. The length ceiling sits under the
//! usual 414 request-line limits and keeps generated filenames under 255
//! characters.
//!
//! The registry owns the ordered list of tracked keywords. It has set
//! semantics (no duplicates) but preserves insertion order for deterministic
//! iteration. Every mutation that grows the list is mirrored into the
//! throttler's per-keyword counters; removals are not, so a re-added keyword
//! keeps its consumed quota.

use crate::throttle::Throttler;
use crate::KeywordError;

/// Maximum keyword length in bytes, exclusive
pub const KEYWORD_MAX_LEN: usize = 180;

/// Checks whether a raw keyword is acceptable
///
/// A keyword must be non-empty, not all-whitespace, single-line and shorter
/// than [`KEYWORD_MAX_LEN`] bytes.
pub fn is_valid(keyword: &str) -> bool {
    !keyword.is_empty()
        && !keyword.chars().all(char::is_whitespace)
        && !keyword.contains('\n')
        && keyword.len() < KEYWORD_MAX_LEN
}

/// Checks a whole keyword list: non-empty, every member valid
pub fn valid_keywords(keywords: &[String]) -> bool {
    !keywords.is_empty() && keywords.iter().all(|k| is_valid(k))
}

/// Cleans a raw keyword into its canonical form
///
/// Trims outer whitespace, collapses internal runs of whitespace and tabs to
/// a single space, and lowercases. Fails with [`KeywordError::Invalid`] when
/// the raw input does not pass [`is_valid`]. Idempotent: processing an
/// already-clean keyword returns it unchanged.
pub fn process_keyword(keyword: &str) -> Result<String, KeywordError> {
    if !is_valid(keyword) {
        return Err(KeywordError::Invalid(format!(
            "expected a non-empty single-line string under {} characters, got {:?}",
            KEYWORD_MAX_LEN, keyword
        )));
    }
    let collapsed = keyword.split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(collapsed.to_lowercase())
}

/// The ordered, de-duplicated list of tracked keywords
#[derive(Debug, Default)]
pub struct Registry {
    keywords: Vec<String>,
}

impl Registry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tracked keywords in insertion order
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns true if the keyword is currently tracked
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Returns the number of tracked keywords
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns true if no keywords are tracked
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Adds a keyword and registers it with the throttler
    ///
    /// Returns false on an invalid keyword or when the cleaned form is
    /// already tracked. On success the keyword is appended and registered as
    /// a throttler component in one stop/add/resume sequence, so the list and
    /// the counters never diverge.
    pub fn add(&mut self, keyword: &str, throttler: &mut Throttler) -> bool {
        let clean = match process_keyword(keyword) {
            Ok(clean) => clean,
            Err(_) => return false,
        };
        if self.contains(&clean) {
            return false;
        }
        self.keywords.push(clean.clone());
        throttler.stop();
        throttler.add_component(&clean);
        throttler.resume();
        true
    }

    /// Adds multiple keywords
    ///
    /// Returns false without touching the registry when the slice is empty or
    /// any member fails the single-keyword validator. Otherwise each add is
    /// applied independently: a duplicate in the middle does not roll back
    /// the ones already added.
    pub fn add_all(&mut self, keywords: &[String], throttler: &mut Throttler) -> bool {
        if !valid_keywords(keywords) {
            return false;
        }
        for keyword in keywords {
            self.add(keyword, throttler);
        }
        true
    }

    /// Removes a keyword from the tracked list
    ///
    /// Returns false if absent. The throttler component entry is kept: if the
    /// keyword comes back inside the same window, its earlier requests still
    /// count against the per-keyword budget.
    pub fn remove(&mut self, keyword: &str) -> bool {
        match self.keywords.iter().position(|k| k == keyword) {
            Some(index) => {
                self.keywords.remove(index);
                true
            }
            None => false,
        }
    }
}
