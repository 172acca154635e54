//! File-backed map cache keyed by content ID.
//!
//! One JSON file per entry, wrapped in an envelope carrying the cache
//! format version and the entry's content ID. Loading validates the
//! envelope shape, the format version, the key match, and the map's own
//! structural invariants before the entry is trusted; any failure is
//! reported as an error the boundary downgrades to a regeneration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::validate_map;
use crate::boundary::{CacheError, MapCache};
use crate::mapgen::model::Map;

pub const CACHE_FORMAT_VERSION: u16 = 1;

#[derive(Serialize, Deserialize)]
struct CacheEnvelope {
    format_version: u16,
    content_id: String,
    map: Map,
}

/// Cache directory with one `<content_id>.json` file per entry.
pub struct FileMapCache {
    root: PathBuf,
}

impl FileMapCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_path(&self, content_id: &str) -> PathBuf {
        self.root.join(format!("{content_id}.json"))
    }
}

impl MapCache for FileMapCache {
    fn fetch(&self, content_id: &str) -> Result<Option<Map>, CacheError> {
        let path = self.entry_path(content_id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).map_err(CacheError::Io)?;
        let envelope: CacheEnvelope = serde_json::from_str(&raw)
            .map_err(|e| CacheError::Corrupt { message: e.to_string() })?;

        if envelope.format_version != CACHE_FORMAT_VERSION {
            return Err(CacheError::FormatMismatch {
                found: envelope.format_version,
                expected: CACHE_FORMAT_VERSION,
            });
        }
        if envelope.content_id != content_id {
            return Err(CacheError::Corrupt {
                message: format!(
                    "entry at {} carries content id {}",
                    path.display(),
                    envelope.content_id
                ),
            });
        }
        if let Err(violation) = validate_map(&envelope.map) {
            return Err(CacheError::Corrupt { message: violation.to_string() });
        }
        Ok(Some(envelope.map))
    }

    fn store(&self, map: &Map) -> Result<(), CacheError> {
        ensure_dir(&self.root)?;
        let envelope = CacheEnvelope {
            format_version: CACHE_FORMAT_VERSION,
            content_id: map.content_id.clone(),
            map: map.clone(),
        };
        let raw = serde_json::to_string(&envelope)
            .map_err(|e| CacheError::Corrupt { message: e.to_string() })?;
        fs::write(self.entry_path(&map.content_id), raw).map_err(CacheError::Io)
    }
}

fn ensure_dir(root: &Path) -> Result<(), CacheError> {
    fs::create_dir_all(root).map_err(CacheError::Io)
}
