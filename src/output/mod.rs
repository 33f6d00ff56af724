//! Composite keys, output filenames and directory handling
//!
//! A serialized page is identified by a composite key built from everything
//! that makes it unique: engine, keyword, page number, capture date and
//! format. The key doubles as the output filename once the trailing format
//! segment is rewritten into a file extension.

use crate::engine::Engine;
use crate::page::Format;
use std::path::Path;

/// Separator between composite key segments
const KEY_SEPARATOR: char = '_';

/// Builds the composite key for one serialized page
///
/// Shape: `<engine>_<keyword>_<page>_<YYYY-MM-DD>_<format>`, lowercased.
/// Deterministic: the same page serialized in the same format on the same
/// day always maps to the same key.
pub fn composite_key(
    engine: Engine,
    keyword: &str,
    page_number: u32,
    capture_date: &str,
    format: Format,
) -> String {
    format!(
        "{engine}{KEY_SEPARATOR}{keyword}{KEY_SEPARATOR}{page_number}{KEY_SEPARATOR}{capture_date}{KEY_SEPARATOR}{format}"
    )
    .to_lowercase()
}

/// Rewrites a composite key into its output filename
///
/// The trailing `_<format>` segment becomes `.<format>`:
/// `google_foo_1_2024-01-01_json` → `google_foo_1_2024-01-01.json`.
pub fn file_name_for_key(key: &str) -> String {
    match key.rfind(KEY_SEPARATOR) {
        Some(index) => format!("{}.{}", &key[..index], &key[index + 1..]),
        None => key.to_string(),
    }
}

/// Checks that the output and cache directories are pairwise distinct
///
/// Two scraper components sharing a directory would overwrite each other's
/// files, so construction treats any collision as a hard error.
pub fn prevent_cache_collision(
    out_dir: &str,
    fetcher_cache_dir: &str,
    serializer_cache_dir: &str,
) -> bool {
    serializer_cache_dir != fetcher_cache_dir
        && fetcher_cache_dir != out_dir
        && out_dir != serializer_cache_dir
}

/// Returns true if the path exists and is a directory
pub fn dir_exists(dir: &Path) -> bool {
    dir.is_dir()
}

/// Creates a directory (and parents) if it is not there yet
pub fn set_up_dir(dir: &Path) -> std::io::Result<()> {
    if !dir_exists(dir) {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
