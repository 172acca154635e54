//! Per-tier tuning tables shared by the generation stages.

use crate::params::Parameters;
use crate::types::{Biome, DifficultyTier, TIER_COUNT};

/// Overworld region counts per tier. Monotonic: harder maps are larger.
const REGION_COUNT_BY_TIER: [usize; TIER_COUNT] = [9, 14, 19, 24];

/// Percentage of regions allowed to carry a dungeon-type feature.
/// The lowest tier gets none; any nonzero cap guarantees at least one.
const DUNGEON_CAP_PERCENT_BY_TIER: [usize; TIER_COUNT] = [0, 18, 24, 30];

const BOSS_FRAGMENT_COUNT_BY_TIER: [usize; TIER_COUNT] = [2, 3, 4, 5];

const INTERIOR_ROOM_RANGE_BY_TIER: [(usize, usize); TIER_COUNT] =
    [(4, 6), (5, 8), (6, 10), (8, 12)];

const BUDGET_BASE_BY_TIER: [u32; TIER_COUNT] = [30, 55, 80, 110];

/// Regions per locality-lock group. Groups are connected sub-graphs; the
/// final group holds the boss fragments.
pub const LOCK_GROUP_MAX_SIZE: usize = 5;

/// Worst-case difficulty rating of any single event. The realized budget
/// total may exceed the configured budget by at most this much.
pub const MAX_EVENT_COST: u32 = 8;

pub const BOSS_FRAGMENT_COST: u32 = 5;
pub const DUNGEON_ENTRY_COST: u32 = 1;
pub const INTERIOR_ANCHOR_COST: u32 = 2;
pub const GOAL_LINK_COST: u32 = 3;

/// Remaining-budget threshold below which only low-cost events are admitted.
pub const HIGH_COST_GATE: u32 = 8;
pub const LOW_COST_CEILING: u32 = 2;

/// Maximum traversal edges per interior room. Keeps interiors dungeon-sparse.
pub const ROOM_DEGREE_CAP: usize = 3;

pub fn region_count_target(tier: DifficultyTier) -> usize {
    REGION_COUNT_BY_TIER[tier.index()]
}

pub fn min_region_count() -> usize {
    REGION_COUNT_BY_TIER[0]
}

pub fn max_region_count() -> usize {
    REGION_COUNT_BY_TIER[TIER_COUNT - 1]
}

pub fn dungeon_feature_cap(tier: DifficultyTier, region_count: usize) -> usize {
    let percent = DUNGEON_CAP_PERCENT_BY_TIER[tier.index()];
    if percent == 0 {
        return 0;
    }
    (region_count * percent / 100).max(1)
}

pub fn boss_fragment_count(tier: DifficultyTier) -> usize {
    BOSS_FRAGMENT_COUNT_BY_TIER[tier.index()]
}

pub fn interior_room_range(tier: DifficultyTier) -> (usize, usize) {
    INTERIOR_ROOM_RANGE_BY_TIER[tier.index()]
}

/// Total difficulty budget for event placement. Scales with every knob the
/// player controls so bigger, higher-level parties see denser maps.
pub fn difficulty_budget(params: &Parameters) -> u32 {
    BUDGET_BASE_BY_TIER[params.tier.index()] * u32::from(params.party_size)
        + 2 * u32::from(params.average_level)
}

/// Extra goal bindings beyond the primary target region.
pub fn extra_goal_binding_count(tier: DifficultyTier) -> usize {
    [0, 1, 1, 2][tier.index()]
}

/// Event slots carried by an overworld region, by biome. Sparse biomes hold
/// fewer slots.
pub fn region_slot_range(biome: Biome) -> (usize, usize) {
    match biome {
        Biome::Grassland | Biome::Forest => (2, 3),
        Biome::Taiga | Biome::Swamp => (1, 3),
        Biome::Desert | Biome::Tundra => (1, 2),
        Biome::Snow | Biome::Volcanic => (1, 2),
    }
}
