//! Content identity and structural validation for assembled maps.
//!
//! The content ID hashes only the inputs (schema version, seed, parameters):
//! stage outputs are fully determined by those, so the ID is reproducible
//! without running generation. Validation re-checks every structural
//! invariant; a failure here means an upstream stage has a defect and is
//! treated as fatal, never patched over.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use sha2::{Digest, Sha256};
use slotmap::SlotMap;

use crate::mapgen::bfs_depths;
use crate::mapgen::model::{Boss, Climate, EventKind, Goal, Interior, Map, Overworld};
use crate::mapgen::tuning;
use crate::params::Parameters;
use crate::types::{GenerateError, InteriorId};

pub const SCHEMA_VERSION: u16 = 1;

/// Stable identifier for a (seed, parameters) pair under the current schema.
/// Usable as a cache/store key before generation has run.
pub fn compute_content_id(seed: u64, params: &Parameters) -> String {
    let mut hasher = Sha256::new();
    hasher.update(SCHEMA_VERSION.to_le_bytes());
    hasher.update(seed.to_le_bytes());
    hasher.update(&params.canonical_bytes());
    let digest = hasher.finalize();
    format!("{digest:064x}")
}

/// Frozen outputs of every generation stage, handed to the assembler.
pub(crate) struct StageOutputs {
    pub(crate) seed: u64,
    pub(crate) params: Parameters,
    pub(crate) name: String,
    pub(crate) climate: Climate,
    pub(crate) overworld: Overworld,
    pub(crate) interiors: SlotMap<InteriorId, Interior>,
    pub(crate) goal: Goal,
    pub(crate) boss: Boss,
}

/// Merge stage outputs into the immutable artifact and run the final
/// consistency pass.
pub(crate) fn assemble(stages: StageOutputs) -> Result<Map, GenerateError> {
    let map = Map {
        schema_version: SCHEMA_VERSION,
        content_id: compute_content_id(stages.seed, &stages.params),
        seed: stages.seed,
        params: stages.params,
        name: stages.name,
        climate: stages.climate,
        overworld: stages.overworld,
        interiors: stages.interiors,
        goal: stages.goal,
        boss: stages.boss,
    };

    if let Err(violation) = validate_map(&map) {
        log::error!(
            "assembled map violates invariants (seed {}, params {:?}): {violation}",
            map.seed,
            map.params
        );
        return Err(GenerateError::InternalConsistency { detail: violation.to_string() });
    }
    Ok(map)
}

/// A structural invariant violated by a map artifact.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsistencyError {
    SchemaVersionMismatch { found: u16 },
    ContentIdMismatch,
    InvalidParameters,
    DuplicateHexCoordinate,
    RegionUnreachable,
    LockGroupsNotAPartition,
    LockGroupIsolated { group: usize },
    BossFragmentsOutsideFinalGroup,
    BossFragmentCountMismatch { found: usize, expected: usize },
    InteriorDisconnected,
    InteriorOwnershipBroken,
    MissingGoalLink,
    GoalBindingDangles,
    BudgetExceeded { realized: u32, allowed: u32 },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaVersionMismatch { found } => {
                write!(f, "schema version {found} does not match {SCHEMA_VERSION}")
            }
            Self::ContentIdMismatch => write!(f, "stored content id does not match its inputs"),
            Self::InvalidParameters => write!(f, "parameters are out of bounds"),
            Self::DuplicateHexCoordinate => write!(f, "two regions share a hex coordinate"),
            Self::RegionUnreachable => write!(f, "a region is unreachable from the start"),
            Self::LockGroupsNotAPartition => {
                write!(f, "lock groups do not partition the region set")
            }
            Self::LockGroupIsolated { group } => {
                write!(f, "lock group {group} has no edge to another group")
            }
            Self::BossFragmentsOutsideFinalGroup => {
                write!(f, "a boss fragment lies outside the final lock group")
            }
            Self::BossFragmentCountMismatch { found, expected } => {
                write!(f, "boss fragment count {found} does not match tier count {expected}")
            }
            Self::InteriorDisconnected => {
                write!(f, "an interior room is unreachable from its entrance")
            }
            Self::InteriorOwnershipBroken => {
                write!(f, "an interior and its owning feature disagree")
            }
            Self::MissingGoalLink => {
                write!(f, "a goal-bound location has no goal-linked event")
            }
            Self::GoalBindingDangles => write!(f, "a goal binding references a missing entity"),
            Self::BudgetExceeded { realized, allowed } => {
                write!(f, "realized event cost {realized} exceeds allowed {allowed}")
            }
        }
    }
}

/// Check every §3/§4 invariant of an artifact. Also applied to cache hits
/// before they are trusted.
pub fn validate_map(map: &Map) -> Result<(), ConsistencyError> {
    if map.schema_version != SCHEMA_VERSION {
        return Err(ConsistencyError::SchemaVersionMismatch { found: map.schema_version });
    }
    if map.params.validate().is_err() {
        return Err(ConsistencyError::InvalidParameters);
    }
    if map.content_id != compute_content_id(map.seed, &map.params) {
        return Err(ConsistencyError::ContentIdMismatch);
    }

    validate_overworld(&map.overworld)?;
    validate_lock_groups(&map.overworld)?;
    validate_boss(map)?;
    validate_interiors(map)?;
    validate_goal(map)?;
    validate_budget(map)?;
    Ok(())
}

fn validate_overworld(overworld: &Overworld) -> Result<(), ConsistencyError> {
    let coords: BTreeSet<_> = overworld.regions.values().map(|region| region.coord).collect();
    if coords.len() != overworld.regions.len() {
        return Err(ConsistencyError::DuplicateHexCoordinate);
    }
    if bfs_depths(overworld).len() != overworld.regions.len() {
        return Err(ConsistencyError::RegionUnreachable);
    }
    Ok(())
}

fn validate_lock_groups(overworld: &Overworld) -> Result<(), ConsistencyError> {
    let mut grouped = BTreeSet::new();
    for group in &overworld.lock_groups {
        for &id in &group.regions {
            if !overworld.regions.contains_key(id) || !grouped.insert(id) {
                return Err(ConsistencyError::LockGroupsNotAPartition);
            }
        }
    }
    if grouped.len() != overworld.regions.len() {
        return Err(ConsistencyError::LockGroupsNotAPartition);
    }

    if overworld.lock_groups.len() < 2 {
        return Ok(());
    }
    for (index, group) in overworld.lock_groups.iter().enumerate() {
        let members: BTreeSet<_> = group.regions.iter().copied().collect();
        let has_external_edge = group.regions.iter().any(|&id| {
            overworld
                .neighbor_ids(id)
                .into_iter()
                .any(|neighbor| !members.contains(&neighbor))
        });
        if !has_external_edge {
            return Err(ConsistencyError::LockGroupIsolated { group: index });
        }
    }
    Ok(())
}

fn validate_boss(map: &Map) -> Result<(), ConsistencyError> {
    let expected = tuning::boss_fragment_count(map.params.tier);
    if map.boss.fragment_regions.len() != expected {
        return Err(ConsistencyError::BossFragmentCountMismatch {
            found: map.boss.fragment_regions.len(),
            expected,
        });
    }

    let final_group: BTreeSet<_> = map
        .overworld
        .lock_groups
        .last()
        .map(|group| group.regions.iter().copied().collect())
        .unwrap_or_default();
    if map.boss.fragment_regions.iter().any(|region| !final_group.contains(region)) {
        return Err(ConsistencyError::BossFragmentsOutsideFinalGroup);
    }

    // Each fragment index must exist as a placed event in the final group.
    let mut placed_indices = BTreeSet::new();
    for &region_id in &final_group {
        for slot in &map.overworld.regions[region_id].slots {
            if let Some(event) = &slot.event {
                if let EventKind::BossFragment { fragment_index } = event.kind {
                    placed_indices.insert(fragment_index);
                }
            }
        }
    }
    if placed_indices.len() != expected {
        return Err(ConsistencyError::BossFragmentCountMismatch {
            found: placed_indices.len(),
            expected,
        });
    }
    Ok(())
}

fn validate_interiors(map: &Map) -> Result<(), ConsistencyError> {
    for (interior_id, interior) in &map.interiors {
        let Some(region) = map.overworld.regions.get(interior.region) else {
            return Err(ConsistencyError::InteriorOwnershipBroken);
        };
        let owner = region.features.get(interior.feature_index);
        let owned = owner.is_some_and(|feature| {
            feature.kind.is_dungeon() && feature.interior == Some(interior_id)
        });
        if !owned {
            return Err(ConsistencyError::InteriorOwnershipBroken);
        }

        let room_count = interior.rooms.len();
        let mut seen = vec![false; room_count];
        let mut queue = VecDeque::from([interior.entrance]);
        seen[interior.entrance as usize] = true;
        let mut reached = 1_usize;
        while let Some(room) = queue.pop_front() {
            for neighbor in interior.room_neighbors(room) {
                if !seen[neighbor as usize] {
                    seen[neighbor as usize] = true;
                    reached += 1;
                    queue.push_back(neighbor);
                }
            }
        }
        if reached != room_count {
            return Err(ConsistencyError::InteriorDisconnected);
        }
    }
    Ok(())
}

fn validate_goal(map: &Map) -> Result<(), ConsistencyError> {
    for binding in &map.goal.bindings {
        if !map.overworld.regions.contains_key(binding.region) {
            return Err(ConsistencyError::GoalBindingDangles);
        }
        let linked = match binding.interior {
            Some(interior_id) => {
                let Some(interior) = map.interiors.get(interior_id) else {
                    return Err(ConsistencyError::GoalBindingDangles);
                };
                interior
                    .rooms
                    .iter()
                    .flat_map(|room| &room.slots)
                    .filter_map(|slot| slot.event.as_ref())
                    .any(|event| event.goal_linked)
            }
            None => map.overworld.regions[binding.region]
                .slots
                .iter()
                .filter_map(|slot| slot.event.as_ref())
                .any(|event| event.goal_linked),
        };
        if !linked {
            return Err(ConsistencyError::MissingGoalLink);
        }
    }
    Ok(())
}

fn validate_budget(map: &Map) -> Result<(), ConsistencyError> {
    let realized = map.total_event_cost();
    let allowed = tuning::difficulty_budget(&map.params) + tuning::MAX_EVENT_COST;
    if realized > allowed {
        return Err(ConsistencyError::BudgetExceeded { realized, allowed });
    }
    Ok(())
}
