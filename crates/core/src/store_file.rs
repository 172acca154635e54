//! File-backed persistent store: the map plus its viewing metadata, keyed
//! by content ID. The generation core only ever writes here; reads serve
//! external tooling.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::boundary::{MapStore, StoreError, StoreMetadata};
use crate::mapgen::model::Map;

#[derive(Serialize, Deserialize)]
struct StoreRecord {
    metadata: StoreMetadata,
    map: Map,
}

pub struct FileMapStore {
    root: PathBuf,
}

impl FileMapStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, content_id: &str) -> PathBuf {
        self.root.join(format!("{content_id}.json"))
    }

    /// Read a stored record back; used by tooling, never by generation.
    pub fn load(&self, content_id: &str) -> Result<Option<(StoreMetadata, Map)>, StoreError> {
        let path = self.record_path(content_id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).map_err(StoreError::Io)?;
        let record: StoreRecord = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Unavailable { message: e.to_string() })?;
        Ok(Some((record.metadata, record.map)))
    }
}

impl MapStore for FileMapStore {
    fn persist(&self, map: &Map, metadata: &StoreMetadata) -> Result<(), StoreError> {
        ensure_dir(&self.root)?;
        let record = StoreRecord { metadata: *metadata, map: map.clone() };
        let raw = serde_json::to_string(&record)
            .map_err(|e| StoreError::Unavailable { message: e.to_string() })?;
        fs::write(self.record_path(&map.content_id), raw).map_err(StoreError::Io)
    }
}

fn ensure_dir(root: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(StoreError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::generate;
    use crate::params::Parameters;
    use crate::types::DifficultyTier;

    #[test]
    fn persisted_records_load_back_with_their_metadata() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileMapStore::new(dir.path());

        let params = Parameters::new(3, 9, DifficultyTier::Veteran);
        let map = generate(7, &params).expect("generation succeeds");
        let metadata =
            StoreMetadata { created_at_epoch_secs: 1_700_000_000, view_count: 3, rating: Some(4) };

        store.persist(&map, &metadata).expect("persist succeeds");
        let (loaded_metadata, loaded_map) = store
            .load(&map.content_id)
            .expect("load succeeds")
            .expect("record present");

        assert_eq!(loaded_metadata, metadata);
        assert_eq!(
            map.canonical_json().expect("serializable"),
            loaded_map.canonical_json().expect("serializable")
        );
    }

    #[test]
    fn loading_an_unknown_content_id_yields_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileMapStore::new(dir.path());
        let found = store.load(&"a".repeat(64)).expect("load succeeds");
        assert!(found.is_none());
    }
}
