//! Collaborator traits and the cache-check → generate → persist boundary.
//!
//! The core never assumes a collaborator is present or correct: cache hits
//! are structurally validated before being trusted, cache failures fall
//! back to regeneration, and store failures are reported alongside the
//! already-computed map instead of invalidating it.

use std::fmt;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::artifact::{compute_content_id, validate_map};
use crate::mapgen::generate;
use crate::mapgen::model::Map;
use crate::params::Parameters;
use crate::types::GenerateError;

#[derive(Debug)]
pub enum CacheError {
    Io(io::Error),
    /// The entry could not be parsed or failed structural validation.
    Corrupt { message: String },
    /// The entry was written under a different cache format version.
    FormatMismatch { found: u16, expected: u16 },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cache I/O error: {e}"),
            Self::Corrupt { message } => write!(f, "corrupt cache entry: {message}"),
            Self::FormatMismatch { found, expected } => {
                write!(f, "cache format version {found} does not match {expected}")
            }
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Unavailable { message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "store I/O error: {e}"),
            Self::Unavailable { message } => write!(f, "store unavailable: {message}"),
        }
    }
}

/// Read-through cache collaborator keyed by content ID.
pub trait MapCache {
    fn fetch(&self, content_id: &str) -> Result<Option<Map>, CacheError>;
    fn store(&self, map: &Map) -> Result<(), CacheError>;
}

/// Long-term persistence collaborator. Never read at generation time.
pub trait MapStore {
    fn persist(&self, map: &Map, metadata: &StoreMetadata) -> Result<(), StoreError>;
}

/// Metadata persisted alongside a map: creation timestamp, view count, and
/// an optional user rating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMetadata {
    pub created_at_epoch_secs: u64,
    pub view_count: u64,
    pub rating: Option<u8>,
}

impl StoreMetadata {
    pub fn at_creation() -> Self {
        let created_at_epoch_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_secs());
        Self { created_at_epoch_secs, view_count: 0, rating: None }
    }
}

pub struct GenerationOutcome {
    pub map: Map,
    /// True when the map came from a validated cache hit.
    pub cache_hit: bool,
    /// Persistence failure, if any. The map itself is still valid.
    pub store_error: Option<StoreError>,
}

/// Full boundary flow: validate parameters, consult the cache, generate on
/// miss, hand the result to the cache and the store.
pub fn generate_with_collaborators(
    seed: u64,
    params: &Parameters,
    cache: Option<&dyn MapCache>,
    store: Option<&dyn MapStore>,
) -> Result<GenerationOutcome, GenerateError> {
    params.validate().map_err(GenerateError::InvalidParameters)?;

    let content_id = compute_content_id(seed, params);
    if let Some(cache) = cache {
        match cache.fetch(&content_id) {
            Ok(Some(map)) => {
                let trusted =
                    map.seed == seed && map.params == *params && validate_map(&map).is_ok();
                if trusted {
                    return Ok(GenerationOutcome { map, cache_hit: true, store_error: None });
                }
                log::warn!("cache entry {content_id} failed validation; regenerating");
            }
            Ok(None) => {}
            Err(e) => log::warn!("cache fetch for {content_id} failed ({e}); regenerating"),
        }
    }

    let map = generate(seed, params)?;

    if let Some(cache) = cache {
        if let Err(e) = cache.store(&map) {
            log::warn!("cache store for {content_id} failed: {e}");
        }
    }

    let mut store_error = None;
    if let Some(store) = store {
        if let Err(e) = store.persist(&map, &StoreMetadata::at_creation()) {
            log::warn!("persisting {content_id} failed: {e}");
            store_error = Some(e);
        }
    }

    Ok(GenerationOutcome { map, cache_hit: false, store_error })
}
