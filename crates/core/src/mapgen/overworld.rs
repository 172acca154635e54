//! Overworld growth: hex flood-fill, biome assignment, landscape features,
//! and the locality-lock partition.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use slotmap::{SecondaryMap, SlotMap};

use crate::params::Parameters;
use crate::rng::{RngContext, SubStream};
use crate::types::{Biome, FeatureKind, HexCoord, RegionId};

use super::hexgrid;
use super::model::{Climate, EventSlot, LandscapeFeature, LockGroup, Overworld, Region};
use super::tuning;

const ORIGIN: HexCoord = HexCoord { q: 0, r: 0 };

const ALL_BIOMES: [Biome; 8] = [
    Biome::Grassland,
    Biome::Forest,
    Biome::Taiga,
    Biome::Desert,
    Biome::Tundra,
    Biome::Snow,
    Biome::Volcanic,
    Biome::Swamp,
];

pub(super) fn sample_climate(stream: &mut SubStream) -> Climate {
    use crate::types::{Humidity, Temperature};

    const TEMPERATURES: [Temperature; 5] = [
        Temperature::Freezing,
        Temperature::Cold,
        Temperature::Temperate,
        Temperature::Warm,
        Temperature::Hot,
    ];
    const HUMIDITIES: [Humidity; 5] = [
        Humidity::Barren,
        Humidity::Dry,
        Humidity::Average,
        Humidity::Wet,
        Humidity::Drenched,
    ];
    // Center-weighted: extreme climates are rarer.
    const CLIMATE_WEIGHTS: [u32; 5] = [10, 20, 40, 20, 10];

    let temperature_index = stream
        .weighted_index(&CLIMATE_WEIGHTS)
        .expect("climate weights are non-zero");
    let humidity_index = stream
        .weighted_index(&CLIMATE_WEIGHTS)
        .expect("climate weights are non-zero");
    Climate {
        temperature: TEMPERATURES[temperature_index],
        humidity: HUMIDITIES[humidity_index],
    }
}

pub(super) fn build_overworld(
    context: &RngContext,
    params: &Parameters,
    climate: Climate,
) -> Overworld {
    let target_region_count = tuning::region_count_target(params.tier);
    let mut grow_stream = context.derive("overworld");

    let mut regions: SlotMap<RegionId, Region> = SlotMap::with_key();
    let mut biome_by_coord: BTreeMap<HexCoord, Biome> = BTreeMap::new();
    let mut frontier: BTreeSet<HexCoord> = BTreeSet::new();
    let mut relaxed_compatibility = false;

    let mut start = None;
    while biome_by_coord.len() < target_region_count {
        let coord = if biome_by_coord.is_empty() {
            ORIGIN
        } else {
            let frontier_index = grow_stream.range_usize(0, frontier.len() - 1);
            let chosen = *frontier
                .iter()
                .nth(frontier_index)
                .expect("frontier is non-empty while below the target count");
            frontier.remove(&chosen);
            chosen
        };
        if biome_by_coord.contains_key(&coord) {
            continue;
        }

        let biome = choose_biome(
            &mut grow_stream,
            climate,
            coord,
            &biome_by_coord,
            &mut relaxed_compatibility,
        );
        biome_by_coord.insert(coord, biome);

        let id = regions.insert(Region {
            coord,
            biome,
            difficulty_weight: 0,
            features: Vec::new(),
            slots: Vec::new(),
            name: String::new(),
        });
        if coord == ORIGIN {
            start = Some(id);
        }

        for neighbor in hexgrid::neighbors(coord) {
            if !biome_by_coord.contains_key(&neighbor) {
                frontier.insert(neighbor);
            }
        }
    }

    if relaxed_compatibility {
        log::debug!(
            "biome compatibility relaxed during overworld growth (seed {})",
            context.seed()
        );
    }

    let start = start.expect("origin region is placed first");
    let mut overworld = Overworld { regions, start, lock_groups: Vec::new() };

    assign_difficulty_weights(&mut overworld, params);
    place_features_and_slots(context, params, &mut overworld);
    let depths = bfs_depths(&overworld);
    overworld.lock_groups = partition_lock_groups(&overworld, &depths);
    overworld
}

/// Graph (BFS) depth of every region from the start region. Used for
/// difficulty weighting, goal distance sampling, and lock-group ordering.
pub(crate) fn bfs_depths(overworld: &Overworld) -> SecondaryMap<RegionId, u32> {
    let mut depths: SecondaryMap<RegionId, u32> = SecondaryMap::new();
    let mut queue = VecDeque::from([overworld.start]);
    depths.insert(overworld.start, 0);
    while let Some(id) = queue.pop_front() {
        let depth = depths[id];
        for neighbor in overworld.neighbor_ids(id) {
            if !depths.contains_key(neighbor) {
                depths.insert(neighbor, depth + 1);
                queue.push_back(neighbor);
            }
        }
    }
    depths
}

/// Difficulty rises in rings outward from the start hex.
fn assign_difficulty_weights(overworld: &mut Overworld, params: &Parameters) {
    let tier_base = 2 + params.tier.index() as u32;
    for id in overworld.region_ids_by_coord() {
        let ring = hexgrid::distance(ORIGIN, overworld.regions[id].coord);
        overworld.regions[id].difficulty_weight = tier_base + ring;
    }
}

fn choose_biome(
    stream: &mut SubStream,
    climate: Climate,
    coord: HexCoord,
    biome_by_coord: &BTreeMap<HexCoord, Biome>,
    relaxed_compatibility: &mut bool,
) -> Biome {
    let placed_neighbors: Vec<Biome> = hexgrid::neighbors(coord)
        .into_iter()
        .filter_map(|neighbor| biome_by_coord.get(&neighbor).copied())
        .collect();

    let constrained: Vec<u32> = ALL_BIOMES
        .iter()
        .map(|&biome| {
            if placed_neighbors.iter().all(|&neighbor| biomes_compatible(biome, neighbor)) {
                biome_base_weight(biome, climate)
            } else {
                0
            }
        })
        .collect();

    if let Some(index) = stream.weighted_index(&constrained) {
        return ALL_BIOMES[index];
    }

    // Every compatible biome has zero weight under this climate: relax the
    // adjacency constraint for this draw instead of failing the run.
    *relaxed_compatibility = true;
    let unconstrained: Vec<u32> =
        ALL_BIOMES.iter().map(|&biome| biome_base_weight(biome, climate)).collect();
    let index = stream
        .weighted_index(&unconstrained)
        .expect("every climate admits at least one biome");
    ALL_BIOMES[index]
}

/// Adjacency pairs considered too jarring without a transitional biome.
fn biomes_compatible(a: Biome, b: Biome) -> bool {
    let forbidden = |x: Biome, y: Biome| {
        matches!(
            (x, y),
            (Biome::Desert, Biome::Snow)
                | (Biome::Desert, Biome::Tundra)
                | (Biome::Desert, Biome::Swamp)
                | (Biome::Volcanic, Biome::Swamp)
                | (Biome::Volcanic, Biome::Snow)
        )
    };
    !forbidden(a, b) && !forbidden(b, a)
}

fn biome_base_weight(biome: Biome, climate: Climate) -> u32 {
    use crate::types::{Humidity, Temperature};

    let base: u32 = match biome {
        Biome::Grassland => 6,
        Biome::Forest => 5,
        Biome::Taiga => 4,
        Biome::Desert => 4,
        Biome::Tundra => 3,
        Biome::Snow => 3,
        Biome::Volcanic => 2,
        Biome::Swamp => 3,
    };

    let temperature_factor: u32 = match biome {
        Biome::Snow | Biome::Tundra => match climate.temperature {
            Temperature::Freezing => 4,
            Temperature::Cold => 3,
            Temperature::Temperate => 1,
            Temperature::Warm | Temperature::Hot => 0,
        },
        Biome::Taiga => match climate.temperature {
            Temperature::Freezing => 3,
            Temperature::Cold => 4,
            Temperature::Temperate => 2,
            Temperature::Warm => 1,
            Temperature::Hot => 0,
        },
        Biome::Desert | Biome::Volcanic => match climate.temperature {
            Temperature::Freezing => 0,
            Temperature::Cold => 1,
            Temperature::Temperate => 1,
            Temperature::Warm => 3,
            Temperature::Hot => 4,
        },
        Biome::Grassland | Biome::Forest | Biome::Swamp => match climate.temperature {
            Temperature::Freezing => 1,
            Temperature::Cold => 2,
            Temperature::Temperate => 3,
            Temperature::Warm => 3,
            Temperature::Hot => 2,
        },
    };

    let humidity_factor: u32 = match biome {
        Biome::Swamp | Biome::Forest => match climate.humidity {
            Humidity::Barren => 1,
            Humidity::Dry => 1,
            Humidity::Average => 2,
            Humidity::Wet => 3,
            Humidity::Drenched => 4,
        },
        Biome::Desert | Biome::Volcanic => match climate.humidity {
            Humidity::Barren => 4,
            Humidity::Dry => 3,
            Humidity::Average => 2,
            Humidity::Wet => 1,
            Humidity::Drenched => 1,
        },
        _ => 2,
    };

    base * temperature_factor * humidity_factor
}

fn place_features_and_slots(context: &RngContext, params: &Parameters, overworld: &mut Overworld) {
    let region_count = overworld.regions.len();
    let dungeon_cap = tuning::dungeon_feature_cap(params.tier, region_count);
    let mut dungeon_count = 0usize;

    for id in overworld.region_ids_by_coord() {
        let coord = overworld.regions[id].coord;
        let mut stream = context.derive(&format!("region:{},{}", coord.q, coord.r));

        let biome = overworld.regions[id].biome;
        let (min_slots, max_slots) = tuning::region_slot_range(biome);
        let slot_count = stream.range_usize(min_slots, max_slots);
        overworld.regions[id].slots = vec![EventSlot::default(); slot_count];

        // Primary feature roll, then a rarer secondary one.
        for feature_chance in [55_u32, 20] {
            if !stream.chance_percent(feature_chance) {
                continue;
            }
            let allow_dungeon = dungeon_count < dungeon_cap;
            let Some(kind) = sample_feature_kind(&mut stream, biome, allow_dungeon) else {
                continue;
            };
            let region = &mut overworld.regions[id];
            if region.features.iter().any(|feature| feature.kind == kind) {
                continue;
            }
            if kind.is_dungeon() {
                dungeon_count += 1;
            }
            region.features.push(LandscapeFeature { kind, interior: None });
        }
    }

    // Tiers with a nonzero cap guarantee at least one dungeon to enter.
    if dungeon_cap > 0 && dungeon_count == 0 {
        let hardest = overworld
            .region_ids_by_coord()
            .into_iter()
            .max_by_key(|&id| {
                let region = &overworld.regions[id];
                (region.difficulty_weight, region.coord)
            })
            .expect("overworld has at least one region");
        overworld.regions[hardest]
            .features
            .push(LandscapeFeature { kind: FeatureKind::Cave, interior: None });
    }
}

fn sample_feature_kind(
    stream: &mut SubStream,
    biome: Biome,
    allow_dungeon: bool,
) -> Option<FeatureKind> {
    let table = feature_table(biome);
    let weights: Vec<u32> = table
        .iter()
        .map(|&(kind, weight)| {
            if kind.is_dungeon() && !allow_dungeon { 0 } else { weight }
        })
        .collect();
    stream.weighted_index(&weights).map(|index| table[index].0)
}

fn feature_table(biome: Biome) -> &'static [(FeatureKind, u32)] {
    match biome {
        Biome::Grassland => &[
            (FeatureKind::Village, 30),
            (FeatureKind::Watchtower, 20),
            (FeatureKind::Ruins, 15),
            (FeatureKind::Grove, 15),
            (FeatureKind::Fortress, 10),
            (FeatureKind::Spring, 10),
        ],
        Biome::Forest => &[
            (FeatureKind::Grove, 30),
            (FeatureKind::Ruins, 20),
            (FeatureKind::Cave, 15),
            (FeatureKind::Temple, 15),
            (FeatureKind::Village, 10),
            (FeatureKind::MonsterDen, 10),
        ],
        Biome::Taiga => &[
            (FeatureKind::Grove, 25),
            (FeatureKind::Cave, 20),
            (FeatureKind::MonsterDen, 20),
            (FeatureKind::Watchtower, 20),
            (FeatureKind::Ruins, 15),
        ],
        Biome::Desert => &[
            (FeatureKind::Ruins, 30),
            (FeatureKind::Temple, 20),
            (FeatureKind::Spring, 20),
            (FeatureKind::Cave, 15),
            (FeatureKind::MonsterDen, 15),
        ],
        Biome::Tundra => &[
            (FeatureKind::Cave, 25),
            (FeatureKind::Ruins, 25),
            (FeatureKind::MonsterDen, 20),
            (FeatureKind::Watchtower, 15),
            (FeatureKind::Spring, 15),
        ],
        Biome::Snow => &[
            (FeatureKind::Cave, 30),
            (FeatureKind::MonsterDen, 25),
            (FeatureKind::Ruins, 25),
            (FeatureKind::Fortress, 20),
        ],
        Biome::Volcanic => &[
            (FeatureKind::Cave, 30),
            (FeatureKind::Fortress, 25),
            (FeatureKind::MonsterDen, 25),
            (FeatureKind::Ruins, 20),
        ],
        Biome::Swamp => &[
            (FeatureKind::MonsterDen, 30),
            (FeatureKind::Ruins, 25),
            (FeatureKind::Temple, 20),
            (FeatureKind::Grove, 15),
            (FeatureKind::Spring, 10),
        ],
    }
}

/// Partition the BFS spanning tree into connected groups of bounded size.
/// Groups are ordered shallow-to-deep; the last group contains the deepest
/// region and later receives the boss fragments.
fn partition_lock_groups(
    overworld: &Overworld,
    depths: &SecondaryMap<RegionId, u32>,
) -> Vec<LockGroup> {
    // Rebuild the BFS tree in deterministic order.
    let mut parent: SecondaryMap<RegionId, RegionId> = SecondaryMap::new();
    let mut children: SecondaryMap<RegionId, Vec<RegionId>> = SecondaryMap::new();
    let mut bfs_order = Vec::new();
    let mut queue = VecDeque::from([overworld.start]);
    let mut seen: BTreeSet<RegionId> = BTreeSet::from([overworld.start]);
    while let Some(id) = queue.pop_front() {
        bfs_order.push(id);
        children.insert(id, Vec::new());
        for neighbor in overworld.neighbor_ids(id) {
            if seen.insert(neighbor) {
                parent.insert(neighbor, id);
                queue.push_back(neighbor);
            }
        }
    }
    for &id in &bfs_order {
        if let Some(&p) = parent.get(id) {
            children[p].push(id);
        }
    }

    // Bottom-up accumulation: each node merges child subtrees while the
    // bound allows, splitting full subtrees off as finished groups.
    let mut pending: SecondaryMap<RegionId, Vec<RegionId>> = SecondaryMap::new();
    let mut groups: Vec<Vec<RegionId>> = Vec::new();
    for &id in bfs_order.iter().rev() {
        let mut accumulated = vec![id];
        let child_ids = children.get(id).cloned().unwrap_or_default();
        for child in child_ids {
            let child_pending = pending.remove(child).unwrap_or_default();
            if accumulated.len() + child_pending.len() <= tuning::LOCK_GROUP_MAX_SIZE {
                accumulated.extend(child_pending);
            } else {
                groups.push(child_pending);
            }
        }
        if accumulated.len() >= tuning::LOCK_GROUP_MAX_SIZE {
            groups.push(accumulated);
        } else {
            pending.insert(id, accumulated);
        }
    }
    if let Some(root_pending) = pending.remove(overworld.start) {
        if !root_pending.is_empty() {
            groups.push(root_pending);
        }
    }

    // Deep groups last: order by the maximum (depth, coord) of the members,
    // so the group holding the single deepest region is final.
    let group_key = |members: &Vec<RegionId>| {
        members
            .iter()
            .map(|&id| (depths.get(id).copied().unwrap_or(0), overworld.regions[id].coord))
            .max()
            .expect("lock groups are non-empty")
    };
    groups.sort_by_key(group_key);

    groups
        .into_iter()
        .map(|mut members| {
            members.sort_by_key(|&id| overworld.regions[id].coord);
            LockGroup { regions: members }
        })
        .collect()
}
