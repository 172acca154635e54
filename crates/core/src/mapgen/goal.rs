//! Goal and narrative planning over the frozen overworld.

use slotmap::{SecondaryMap, SlotMap};

use crate::content;
use crate::params::Parameters;
use crate::rng::SubStream;
use crate::types::{DifficultyTier, GoalArchetype, InteriorId, RegionId};

use super::model::{Goal, GoalBinding, Interior, Overworld};
use super::tuning;

/// Select an archetype and bind it to concrete regions/interiors. Reads the
/// overworld and interiors, never creates new ones.
pub(super) fn plan_goal(
    stream: &mut SubStream,
    params: &Parameters,
    overworld: &Overworld,
    interiors: &SlotMap<InteriorId, Interior>,
    depths: &SecondaryMap<RegionId, u32>,
) -> Goal {
    let archetype = choose_archetype(stream, !interiors.is_empty());

    let primary = choose_primary_region(stream, params, overworld, depths);
    let mut bindings = vec![GoalBinding { region: primary, interior: None }];

    let mut macguffin = None;
    if archetype == GoalArchetype::ArtifactRetrieval {
        // The artifact rests in the deepest dungeon on the map.
        let vault = interiors
            .iter()
            .max_by_key(|(_, interior)| {
                let depth = depths.get(interior.region).copied().unwrap_or(0);
                (depth, overworld.regions[interior.region].coord)
            })
            .map(|(id, interior)| (id, interior.region));
        if let Some((interior_id, region)) = vault {
            if !bindings.iter().any(|binding| binding.region == region) {
                bindings.push(GoalBinding { region, interior: Some(interior_id) });
            } else if let Some(binding) =
                bindings.iter_mut().find(|binding| binding.region == region)
            {
                binding.interior = Some(interior_id);
            }
            macguffin = Some(stream.pick(content::MACGUFFINS).to_string());
        }
    }

    // Supporting bindings spread the goal across the map on harder tiers.
    let extra_count = tuning::extra_goal_binding_count(params.tier);
    let mut candidates: Vec<RegionId> = overworld
        .region_ids_by_coord()
        .into_iter()
        .filter(|&id| id != overworld.start)
        .filter(|id| !bindings.iter().any(|binding| binding.region == *id))
        .collect();
    for _ in 0..extra_count {
        if candidates.is_empty() {
            break;
        }
        let weights: Vec<u32> = candidates
            .iter()
            .map(|&id| 1 + depths.get(id).copied().unwrap_or(0))
            .collect();
        let Some(index) = stream.weighted_index(&weights) else {
            break;
        };
        let chosen = candidates.remove(index);
        bindings.push(GoalBinding { region: chosen, interior: None });
    }

    let antagonist = stream.pick(content::ANTAGONISTS).to_string();
    Goal {
        archetype,
        template: template_for(archetype).to_string(),
        antagonist,
        macguffin,
        bindings,
        description: String::new(),
    }
}

fn choose_archetype(stream: &mut SubStream, has_dungeon: bool) -> GoalArchetype {
    const TABLE: [(GoalArchetype, u32); 4] = [
        (GoalArchetype::Rescue, 30),
        (GoalArchetype::ArtifactRetrieval, 35),
        (GoalArchetype::PurgeCurse, 20),
        (GoalArchetype::SlayWarlord, 15),
    ];
    let weights: Vec<u32> = TABLE
        .iter()
        .map(|&(archetype, weight)| {
            if archetype == GoalArchetype::ArtifactRetrieval && !has_dungeon {
                0
            } else {
                weight
            }
        })
        .collect();
    let index = stream
        .weighted_index(&weights)
        .expect("archetype table keeps non-dungeon goals available");
    TABLE[index].0
}

/// Weighted toward regions far from start; payoff depth scales with tier.
/// At the highest tier the farthest region is chosen outright.
fn choose_primary_region(
    stream: &mut SubStream,
    params: &Parameters,
    overworld: &Overworld,
    depths: &SecondaryMap<RegionId, u32>,
) -> RegionId {
    let candidates: Vec<RegionId> = overworld
        .region_ids_by_coord()
        .into_iter()
        .filter(|&id| id != overworld.start)
        .collect();

    if params.tier == DifficultyTier::highest() {
        return candidates
            .iter()
            .copied()
            .max_by_key(|&id| (depths.get(id).copied().unwrap_or(0), overworld.regions[id].coord))
            .expect("maps always have more than one region");
    }

    let exponent = 1 + params.tier.index() as u32;
    let weights: Vec<u32> = candidates
        .iter()
        .map(|&id| {
            let depth = 1 + depths.get(id).copied().unwrap_or(0);
            depth.saturating_pow(exponent)
        })
        .collect();
    let index = stream
        .weighted_index(&weights)
        .expect("non-start regions always exist");
    candidates[index]
}

fn template_for(archetype: GoalArchetype) -> &'static str {
    match archetype {
        GoalArchetype::Rescue => {
            "Rescue the captive taken by {antagonist}, last seen near {location}."
        }
        GoalArchetype::ArtifactRetrieval => {
            "Recover {macguffin} from {location} before {antagonist} claims it."
        }
        GoalArchetype::PurgeCurse => {
            "Trace the spreading curse to {location} and sever {antagonist}'s hold on it."
        }
        GoalArchetype::SlayWarlord => {
            "Hunt down {antagonist}, whose warband musters at {location}."
        }
    }
}
