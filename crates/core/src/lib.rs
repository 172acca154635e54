pub mod artifact;
pub mod batch;
pub mod boundary;
pub mod cache_file;
pub mod content;
pub mod mapgen;
pub mod params;
pub mod rng;
pub mod store_file;
pub mod types;

pub use artifact::{SCHEMA_VERSION, compute_content_id, validate_map};
pub use batch::{BatchOutcome, GenerationRequest, generate_batch};
pub use boundary::{
    CacheError, GenerationOutcome, MapCache, MapStore, StoreError, StoreMetadata,
    generate_with_collaborators,
};
pub use cache_file::FileMapCache;
pub use mapgen::model::{Boss, Event, EventKind, EventSlot, Goal, Interior, Map, Overworld};
pub use mapgen::{MapGenerator, generate};
pub use params::Parameters;
pub use rng::{RngContext, SubStream};
pub use store_file::FileMapStore;
pub use types::*;
