use std::fs;

use map_core::mapgen::tuning;
use map_core::{
    DifficultyTier, FileMapCache, Parameters, generate, generate_with_collaborators,
};

#[test]
fn minimal_party_at_the_lowest_tier_gets_the_smallest_map() {
    let params = Parameters::new(1, 1, DifficultyTier::lowest());
    let map = generate(42, &params).expect("generation succeeds");

    assert_eq!(map.overworld.regions.len(), tuning::min_region_count());

    let dungeon_features = map
        .overworld
        .regions
        .values()
        .flat_map(|region| &region.features)
        .filter(|feature| feature.kind.is_dungeon())
        .count();
    assert_eq!(dungeon_features, 0, "lowest tier places no dungeon features");
    assert!(map.interiors.is_empty());

    assert_eq!(
        map.boss.fragment_regions.len(),
        tuning::boss_fragment_count(DifficultyTier::lowest()),
        "boss carries the minimum fragment count"
    );
}

#[test]
fn full_party_at_the_highest_tier_gets_the_largest_map() {
    let params = Parameters::new(4, 20, DifficultyTier::highest());
    let map = generate(42, &params).expect("generation succeeds");

    assert_eq!(map.overworld.regions.len(), tuning::max_region_count());

    // At least one dungeon-type feature with a populated interior.
    assert!(!map.interiors.is_empty());
    let populated = map.interiors.values().any(|interior| {
        interior
            .rooms
            .iter()
            .flat_map(|room| &room.slots)
            .any(|slot| slot.event.is_some())
    });
    assert!(populated, "expected a populated interior");

    // The goal payoff lies in the farthest lock group from start.
    let primary = map.goal.bindings.first().expect("goal has bindings");
    let group = map
        .overworld
        .lock_group_of(primary.region)
        .expect("bound region belongs to a lock group");
    assert_eq!(
        group,
        map.overworld.lock_groups.len() - 1,
        "goal must bind into the final lock group"
    );
}

#[test]
fn warm_cache_hit_skips_generation_and_returns_the_stored_artifact() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = FileMapCache::new(dir.path());
    let params = Parameters::new(2, 5, DifficultyTier::Seasoned);

    let cold = generate_with_collaborators(42, &params, Some(&cache), None)
        .expect("cold run succeeds");
    assert!(!cold.cache_hit);

    let warm = generate_with_collaborators(42, &params, Some(&cache), None)
        .expect("warm run succeeds");
    assert!(warm.cache_hit, "second run must be served from the cache");
    assert_eq!(
        cold.map.canonical_json().expect("serializable"),
        warm.map.canonical_json().expect("serializable")
    );
}

#[test]
fn corrupted_cache_entry_regenerates_a_map_identical_to_a_cold_run() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = FileMapCache::new(dir.path());
    let params = Parameters::new(2, 5, DifficultyTier::Seasoned);

    let cold = generate_with_collaborators(42, &params, Some(&cache), None)
        .expect("cold run succeeds");

    // Corrupt the entry's format version on disk.
    let entry_path = dir.path().join(format!("{}.json", cold.map.content_id));
    let raw = fs::read_to_string(&entry_path).expect("entry readable");
    fs::write(&entry_path, raw.replacen("\"format_version\":1", "\"format_version\":7", 1))
        .expect("rewrite succeeds");

    let recovered = generate_with_collaborators(42, &params, Some(&cache), None)
        .expect("regeneration succeeds");
    assert!(!recovered.cache_hit, "mismatched entry must not be trusted");
    assert_eq!(
        cold.map.canonical_json().expect("serializable"),
        recovered.map.canonical_json().expect("serializable"),
        "regeneration must match the cold-cache run exactly"
    );
}
