//! Event distribution across overworld regions and interior rooms.
//!
//! Placement happens in a fixed order so budget consumption is reproducible:
//! mandatory placements first (boss fragments, dungeon entries, interior
//! anchors), then budget-gated optional fill over regions by coordinate and
//! interiors in creation order, then the goal-linkage post-pass.

use slotmap::SlotMap;

use crate::content::keys;
use crate::params::Parameters;
use crate::rng::SubStream;
use crate::types::{Biome, GoalArchetype, InteriorId};

use super::model::{Boss, Event, EventKind, EventSlot, Goal, Interior, Overworld};
use super::tuning;

/// Tracks budget consumption. A slice of the total is reserved up front for
/// the goal-linkage post-pass so forced placements never break the
/// one-event overshoot bound.
struct Budget {
    total: u32,
    reserved: u32,
    spent: u32,
}

impl Budget {
    fn admits_optional(&self) -> bool {
        self.spent + self.reserved < self.total
    }

    fn remaining_optional(&self) -> u32 {
        self.total.saturating_sub(self.reserved).saturating_sub(self.spent)
    }

    fn charge(&mut self, cost: u32) {
        self.spent += cost;
    }
}

pub(super) fn distribute_events(
    stream: &mut SubStream,
    params: &Parameters,
    overworld: &mut Overworld,
    interiors: &mut SlotMap<InteriorId, Interior>,
    goal: &Goal,
) -> Boss {
    let mut budget = Budget {
        total: tuning::difficulty_budget(params),
        reserved: goal.bindings.len() as u32 * tuning::GOAL_LINK_COST,
        spent: 0,
    };

    let boss = place_boss_fragments(params, overworld, &mut budget);
    place_dungeon_entries(overworld, &mut budget);
    place_interior_anchors(interiors, &mut budget);
    fill_region_slots(stream, overworld, goal, &mut budget);
    fill_interior_slots(stream, overworld, interiors, goal, &mut budget);
    enforce_goal_linkage(overworld, interiors, goal, &mut budget);

    boss
}

/// A fixed fragment count spread round-robin over the final lock group.
fn place_boss_fragments(
    params: &Parameters,
    overworld: &mut Overworld,
    budget: &mut Budget,
) -> Boss {
    let fragment_count = tuning::boss_fragment_count(params.tier);
    let final_group = overworld
        .lock_groups
        .last()
        .expect("overworld always has at least one lock group")
        .regions
        .clone();

    let mut fragment_regions = Vec::with_capacity(fragment_count);
    for fragment_index in 0..fragment_count {
        let region_id = final_group[fragment_index % final_group.len()];
        let event = Event {
            kind: EventKind::BossFragment { fragment_index: fragment_index as u8 },
            difficulty: tuning::BOSS_FRAGMENT_COST,
            reward: keys::REWARD_RELIC.to_string(),
            goal_linked: false,
        };
        place_in_slots(&mut overworld.regions[region_id].slots, event);
        budget.charge(tuning::BOSS_FRAGMENT_COST);
        fragment_regions.push(region_id);
    }
    Boss { fragment_regions }
}

/// Every dungeon feature gets an entry event in its owning region, linking
/// the overworld layer to the interior layer.
fn place_dungeon_entries(overworld: &mut Overworld, budget: &mut Budget) {
    for region_id in overworld.region_ids_by_coord() {
        let interiors_here: Vec<InteriorId> = overworld.regions[region_id]
            .features
            .iter()
            .filter_map(|feature| feature.interior)
            .collect();
        for interior in interiors_here {
            let event = Event {
                kind: EventKind::DungeonEntry { interior },
                difficulty: tuning::DUNGEON_ENTRY_COST,
                reward: keys::REWARD_NONE.to_string(),
                goal_linked: false,
            };
            place_in_slots(&mut overworld.regions[region_id].slots, event);
            budget.charge(tuning::DUNGEON_ENTRY_COST);
        }
    }
}

/// The deepest room of every interior is anchored with a treasure so no
/// dungeon is ever empty.
fn place_interior_anchors(interiors: &mut SlotMap<InteriorId, Interior>, budget: &mut Budget) {
    for (_, interior) in interiors.iter_mut() {
        let anchor = interior.anchor as usize;
        let slots = &mut interior.rooms[anchor].slots;
        let event = Event {
            kind: EventKind::Treasure,
            difficulty: tuning::INTERIOR_ANCHOR_COST,
            reward: keys::REWARD_RICH_CACHE.to_string(),
            goal_linked: false,
        };
        place_in_slots(slots, event);
        budget.charge(tuning::INTERIOR_ANCHOR_COST);
    }
}

fn fill_region_slots(
    stream: &mut SubStream,
    overworld: &mut Overworld,
    goal: &Goal,
    budget: &mut Budget,
) {
    for region_id in overworld.region_ids_by_coord() {
        let bound = goal
            .bindings
            .iter()
            .any(|binding| binding.region == region_id && binding.interior.is_none());
        let biome = overworld.regions[region_id].biome;
        let difficulty_weight = overworld.regions[region_id].difficulty_weight;

        for slot_index in 0..overworld.regions[region_id].slots.len() {
            if overworld.regions[region_id].slots[slot_index].event.is_some() {
                continue;
            }
            if !budget.admits_optional() {
                return;
            }
            // Some slots deliberately stay empty.
            if stream.chance_percent(35) {
                continue;
            }
            let event =
                sample_region_event(stream, biome, difficulty_weight, bound, budget);
            budget.charge(event.difficulty);
            overworld.regions[region_id].slots[slot_index].event = Some(event);
        }
    }
}

fn fill_interior_slots(
    stream: &mut SubStream,
    overworld: &Overworld,
    interiors: &mut SlotMap<InteriorId, Interior>,
    goal: &Goal,
    budget: &mut Budget,
) {
    for (interior_id, interior) in interiors.iter_mut() {
        let bound = goal
            .bindings
            .iter()
            .any(|binding| binding.interior == Some(interior_id));
        let difficulty_weight = overworld.regions[interior.region].difficulty_weight;

        for room in &mut interior.rooms {
            for slot in &mut room.slots {
                if slot.event.is_some() {
                    continue;
                }
                if !budget.admits_optional() {
                    return;
                }
                if stream.chance_percent(25) {
                    continue;
                }
                let event = sample_interior_event(stream, difficulty_weight, bound, budget);
                budget.charge(event.difficulty);
                slot.event = Some(event);
            }
        }
    }
}

fn sample_region_event(
    stream: &mut SubStream,
    biome: Biome,
    difficulty_weight: u32,
    bound: bool,
    budget: &Budget,
) -> Event {
    const VARIANTS: [EventKind; 4] = [
        EventKind::Encounter,
        EventKind::Interaction,
        EventKind::Trap,
        EventKind::Treasure,
    ];
    let weights: [u32; 4] = match biome {
        Biome::Grassland | Biome::Forest => [35, 30, 10, 25],
        Biome::Taiga | Biome::Tundra => [40, 20, 20, 20],
        Biome::Desert | Biome::Snow => [40, 15, 25, 20],
        Biome::Volcanic => [45, 5, 35, 15],
        Biome::Swamp => [40, 10, 35, 15],
    };
    finish_event(stream, &VARIANTS, &weights, difficulty_weight, bound, budget)
}

fn sample_interior_event(
    stream: &mut SubStream,
    difficulty_weight: u32,
    bound: bool,
    budget: &Budget,
) -> Event {
    const VARIANTS: [EventKind; 4] = [
        EventKind::Encounter,
        EventKind::Interaction,
        EventKind::Trap,
        EventKind::Treasure,
    ];
    const WEIGHTS: [u32; 4] = [45, 10, 30, 15];
    finish_event(stream, &VARIANTS, &WEIGHTS, difficulty_weight, bound, budget)
}

fn finish_event(
    stream: &mut SubStream,
    variants: &[EventKind],
    weights: &[u32],
    difficulty_weight: u32,
    bound: bool,
    budget: &Budget,
) -> Event {
    let index = stream
        .weighted_index(weights)
        .expect("event variant tables are non-zero");
    let kind = variants[index].clone();

    let mut difficulty =
        (difficulty_weight + stream.range_u32(0, 2)).clamp(1, tuning::MAX_EVENT_COST);
    // Near exhaustion only cheap events are admitted, so the realized total
    // lands close to the configured budget.
    if budget.remaining_optional() < tuning::HIGH_COST_GATE {
        difficulty = difficulty.min(tuning::LOW_COST_CEILING);
    }

    let reward = match kind {
        EventKind::Encounter => keys::REWARD_STANDARD_CACHE,
        EventKind::Interaction => keys::REWARD_SMALL_CACHE,
        EventKind::Trap => keys::REWARD_NONE,
        EventKind::Treasure => keys::REWARD_RICH_CACHE,
        EventKind::BossFragment { .. } | EventKind::DungeonEntry { .. } => keys::REWARD_NONE,
    };

    let goal_linked = bound && stream.chance_percent(35);
    Event { kind, difficulty, reward: reward.to_string(), goal_linked }
}

/// Hard invariant: every goal-bound location holds at least one goal-linked
/// event. Missing ones are force-placed from the reserved budget,
/// synthesizing a slot when the location has none free.
fn enforce_goal_linkage(
    overworld: &mut Overworld,
    interiors: &mut SlotMap<InteriorId, Interior>,
    goal: &Goal,
    budget: &mut Budget,
) {
    for binding in &goal.bindings {
        let event = Event {
            kind: forced_event_kind(goal.archetype),
            difficulty: tuning::GOAL_LINK_COST,
            reward: forced_event_reward(goal.archetype).to_string(),
            goal_linked: true,
        };

        match binding.interior {
            Some(interior_id) => {
                let interior = &mut interiors[interior_id];
                let already_linked = interior
                    .rooms
                    .iter()
                    .flat_map(|room| &room.slots)
                    .any(|slot| slot.event.as_ref().is_some_and(|e| e.goal_linked));
                if already_linked {
                    continue;
                }
                let free = interior.rooms.iter().enumerate().find_map(|(room_index, room)| {
                    room.slots
                        .iter()
                        .position(|slot| slot.event.is_none())
                        .map(|slot_index| (room_index, slot_index))
                });
                match free {
                    Some((room_index, slot_index)) => {
                        interior.rooms[room_index].slots[slot_index].event = Some(event);
                    }
                    None => {
                        let anchor = interior.anchor as usize;
                        interior.rooms[anchor].slots.push(EventSlot { event: Some(event) });
                    }
                }
                budget.charge(tuning::GOAL_LINK_COST);
            }
            None => {
                let region = &mut overworld.regions[binding.region];
                let already_linked = region
                    .slots
                    .iter()
                    .any(|slot| slot.event.as_ref().is_some_and(|e| e.goal_linked));
                if already_linked {
                    continue;
                }
                place_in_slots(&mut region.slots, event);
                budget.charge(tuning::GOAL_LINK_COST);
            }
        }
    }
}

fn forced_event_kind(archetype: GoalArchetype) -> EventKind {
    match archetype {
        GoalArchetype::Rescue => EventKind::Interaction,
        GoalArchetype::ArtifactRetrieval => EventKind::Treasure,
        GoalArchetype::PurgeCurse | GoalArchetype::SlayWarlord => EventKind::Encounter,
    }
}

fn forced_event_reward(archetype: GoalArchetype) -> &'static str {
    match archetype {
        GoalArchetype::ArtifactRetrieval => keys::REWARD_RELIC,
        _ => keys::REWARD_STANDARD_CACHE,
    }
}

/// Place into the first free slot, synthesizing one when the location is
/// full (or pathologically slotless).
fn place_in_slots(slots: &mut Vec<EventSlot>, event: Event) {
    match slots.iter().position(|slot| slot.event.is_none()) {
        Some(index) => slots[index].event = Some(event),
        None => slots.push(EventSlot { event: Some(event) }),
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SecondaryMap;

    use super::*;
    use crate::mapgen::goal::plan_goal;
    use crate::mapgen::interior::build_interior;
    use crate::mapgen::overworld::{bfs_depths, build_overworld, sample_climate};
    use crate::rng::RngContext;
    use crate::types::{DifficultyTier, RegionId};

    struct Fixture {
        overworld: Overworld,
        interiors: SlotMap<InteriorId, Interior>,
        goal: Goal,
        boss: Boss,
        params: Parameters,
    }

    fn distributed(seed: u64, tier: DifficultyTier) -> Fixture {
        let context = RngContext::new(seed);
        let params = Parameters::new(3, 6, tier);
        let climate = sample_climate(&mut context.derive("climate"));
        let mut overworld = build_overworld(&context, &params, climate);
        let depths: SecondaryMap<RegionId, u32> = bfs_depths(&overworld);

        let mut interiors: SlotMap<InteriorId, Interior> = SlotMap::with_key();
        for region_id in overworld.region_ids_by_coord() {
            let coord = overworld.regions[region_id].coord;
            for feature_index in 0..overworld.regions[region_id].features.len() {
                if overworld.regions[region_id].features[feature_index].kind.is_dungeon() {
                    let mut stream = context
                        .derive(&format!("interior:{},{}:{feature_index}", coord.q, coord.r));
                    let interior_id = interiors.insert(build_interior(
                        &mut stream,
                        tier,
                        region_id,
                        feature_index,
                    ));
                    overworld.regions[region_id].features[feature_index].interior =
                        Some(interior_id);
                }
            }
        }

        let goal = plan_goal(
            &mut context.derive("goal"),
            &params,
            &overworld,
            &interiors,
            &depths,
        );
        let boss = distribute_events(
            &mut context.derive("events"),
            &params,
            &mut overworld,
            &mut interiors,
            &goal,
        );
        Fixture { overworld, interiors, goal, boss, params }
    }

    fn total_cost(fixture: &Fixture) -> u32 {
        let region_cost: u32 = fixture
            .overworld
            .regions
            .values()
            .flat_map(|region| &region.slots)
            .filter_map(|slot| slot.event.as_ref())
            .map(|event| event.difficulty)
            .sum();
        let interior_cost: u32 = fixture
            .interiors
            .values()
            .flat_map(|interior| &interior.rooms)
            .flat_map(|room| &room.slots)
            .filter_map(|slot| slot.event.as_ref())
            .map(|event| event.difficulty)
            .sum();
        region_cost + interior_cost
    }

    #[test]
    fn realized_cost_never_exceeds_budget_by_more_than_one_event() {
        for seed in [1_u64, 42, 99, 777, 31_337] {
            for tier in [DifficultyTier::Novice, DifficultyTier::Legendary] {
                let fixture = distributed(seed, tier);
                let budget = tuning::difficulty_budget(&fixture.params);
                assert!(
                    total_cost(&fixture) <= budget + tuning::MAX_EVENT_COST,
                    "seed {seed} tier {tier:?} overshot"
                );
            }
        }
    }

    #[test]
    fn boss_fragments_land_in_the_final_lock_group_with_the_tier_count() {
        for seed in [1_u64, 42, 4_242] {
            let fixture = distributed(seed, DifficultyTier::Veteran);
            let final_group = &fixture.overworld.lock_groups.last().expect("groups").regions;
            assert_eq!(
                fixture.boss.fragment_regions.len(),
                tuning::boss_fragment_count(DifficultyTier::Veteran)
            );
            for region in &fixture.boss.fragment_regions {
                assert!(final_group.contains(region));
            }
        }
    }

    #[test]
    fn fragment_events_exist_for_every_fragment_index() {
        let fixture = distributed(7, DifficultyTier::Legendary);
        let mut indices: Vec<u8> = fixture
            .overworld
            .regions
            .values()
            .flat_map(|region| &region.slots)
            .filter_map(|slot| slot.event.as_ref())
            .filter_map(|event| match event.kind {
                EventKind::BossFragment { fragment_index } => Some(fragment_index),
                _ => None,
            })
            .collect();
        indices.sort_unstable();
        let expected: Vec<u8> =
            (0..tuning::boss_fragment_count(DifficultyTier::Legendary) as u8).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn every_dungeon_feature_has_an_entry_event_in_its_region() {
        let fixture = distributed(21, DifficultyTier::Legendary);
        for (interior_id, interior) in &fixture.interiors {
            let region = &fixture.overworld.regions[interior.region];
            let has_entry = region.slots.iter().filter_map(|slot| slot.event.as_ref()).any(
                |event| matches!(event.kind, EventKind::DungeonEntry { interior } if interior == interior_id),
            );
            assert!(has_entry, "dungeon {interior_id:?} has no entry event");
        }
    }

    #[test]
    fn every_goal_binding_holds_a_goal_linked_event() {
        for seed in 0..24_u64 {
            for tier in [DifficultyTier::Novice, DifficultyTier::Veteran] {
                let fixture = distributed(seed, tier);
                for binding in &fixture.goal.bindings {
                    let linked = match binding.interior {
                        Some(interior_id) => fixture.interiors[interior_id]
                            .rooms
                            .iter()
                            .flat_map(|room| &room.slots)
                            .filter_map(|slot| slot.event.as_ref())
                            .any(|event| event.goal_linked),
                        None => fixture.overworld.regions[binding.region]
                            .slots
                            .iter()
                            .filter_map(|slot| slot.event.as_ref())
                            .any(|event| event.goal_linked),
                    };
                    assert!(linked, "seed {seed} tier {tier:?}: unlinked binding");
                }
            }
        }
    }

    #[test]
    fn every_interior_anchor_room_is_populated() {
        let fixture = distributed(11, DifficultyTier::Legendary);
        for interior in fixture.interiors.values() {
            let anchor = &interior.rooms[interior.anchor as usize];
            assert!(anchor.slots.iter().any(|slot| slot.event.is_some()));
        }
    }

    #[test]
    fn distribution_is_deterministic() {
        let left = distributed(555, DifficultyTier::Veteran);
        let right = distributed(555, DifficultyTier::Veteran);
        assert_eq!(total_cost(&left), total_cost(&right));
        assert_eq!(left.boss.fragment_regions.len(), right.boss.fragment_regions.len());
    }
}
