//! Page encoding into JSON, XML and YAML
//!
//! The serializer turns a fetched page into bytes in one of the supported
//! formats. Payloads are cached on disk under the serializer cache directory,
//! keyed by composite key: a page identity that was already encoded once is
//! served from the cache instead of being re-encoded.

use crate::output::composite_key;
use crate::page::{Format, SerializedPage, SerpPage};
use crate::SerializeError;
use std::path::{Path, PathBuf};

/// Encodes fetched pages and caches the resulting payloads
pub struct PageSerializer {
    cache_dir: PathBuf,
}

impl PageSerializer {
    /// Creates a serializer, setting up its cache directory
    pub fn new(cache_dir: &Path) -> Result<Self, SerializeError> {
        std::fs::create_dir_all(cache_dir)?;
        Ok(Self {
            cache_dir: cache_dir.to_path_buf(),
        })
    }

    /// Serializes a page into the given format
    ///
    /// The payload is looked up in the cache first; on a miss it is encoded
    /// and written through.
    pub fn serialize(
        &self,
        page: &SerpPage,
        format: Format,
    ) -> Result<SerializedPage, SerializeError> {
        let key = composite_key(
            page.engine,
            &page.keyword,
            page.page_number,
            &page.capture_date(),
            format,
        );
        let cache_path = self.cache_dir.join(&key);

        if cache_path.is_file() {
            let content = std::fs::read(&cache_path)?;
            return Ok(SerializedPage { content, format });
        }

        let content = encode(page, format)?;
        std::fs::write(&cache_path, &content)?;
        Ok(SerializedPage { content, format })
    }
}

/// Encodes a page into raw bytes in the given format
fn encode(page: &SerpPage, format: Format) -> Result<Vec<u8>, SerializeError> {
    let content = match format {
        Format::Json => serde_json::to_vec_pretty(page)?,
        Format::Xml => quick_xml::se::to_string(page)?.into_bytes(),
        Format::Yml => serde_yaml::to_string(page)?.into_bytes(),
    };
    Ok(content)
}
