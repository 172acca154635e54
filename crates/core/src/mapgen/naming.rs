//! Name generation from the constrained vocabulary, plus rendering of the
//! goal description against the generated names.

use slotmap::SlotMap;

use crate::content;
use crate::rng::SubStream;
use crate::types::InteriorId;

use super::model::{Goal, Interior, Overworld};

/// Name every region and interior and the map itself, then resolve the
/// goal's template placeholders. Returns the map name.
pub(super) fn assign_names(
    stream: &mut SubStream,
    overworld: &mut Overworld,
    interiors: &mut SlotMap<InteriorId, Interior>,
    goal: &mut Goal,
) -> String {
    name_regions(stream, overworld);

    for (_, interior) in interiors.iter_mut() {
        interior.name = compose(
            stream,
            content::CONSTRUCTED_ADJECTIVES,
            content::CONSTRUCTED_NOUNS,
        );
    }

    let map_name = format!(
        "The {}",
        compose(stream, content::ETHEREAL_ADJECTIVES, content::ETHEREAL_NOUNS)
    );

    goal.description = render_goal(goal, overworld, interiors);
    map_name
}

/// Regions draw from the natural pools. Light local constraint: re-roll a
/// bounded number of times to avoid duplicating an immediate neighbor's
/// name; no global uniqueness is attempted.
fn name_regions(stream: &mut SubStream, overworld: &mut Overworld) {
    const REROLL_LIMIT: usize = 8;

    for id in overworld.region_ids_by_coord() {
        let neighbor_names: Vec<String> = overworld
            .neighbor_ids(id)
            .into_iter()
            .map(|neighbor| overworld.regions[neighbor].name.clone())
            .filter(|name| !name.is_empty())
            .collect();

        let mut name = compose(stream, content::NATURAL_ADJECTIVES, content::NATURAL_NOUNS);
        for _ in 0..REROLL_LIMIT {
            if !neighbor_names.contains(&name) {
                break;
            }
            name = compose(stream, content::NATURAL_ADJECTIVES, content::NATURAL_NOUNS);
        }
        overworld.regions[id].name = name;
    }
}

fn compose(stream: &mut SubStream, adjectives: &[&str], nouns: &[&str]) -> String {
    format!("{} {}", stream.pick(adjectives), stream.pick(nouns))
}

fn render_goal(
    goal: &Goal,
    overworld: &Overworld,
    interiors: &SlotMap<InteriorId, Interior>,
) -> String {
    let location = goal
        .bindings
        .first()
        .map(|binding| match binding.interior {
            Some(interior_id) => interiors[interior_id].name.clone(),
            None => overworld.regions[binding.region].name.clone(),
        })
        .unwrap_or_default();

    let mut rendered = goal
        .template
        .replace("{antagonist}", &goal.antagonist)
        .replace("{location}", &location);
    if let Some(macguffin) = &goal.macguffin {
        rendered = rendered.replace("{macguffin}", macguffin);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use slotmap::SecondaryMap;

    use super::*;
    use crate::mapgen::goal::plan_goal;
    use crate::mapgen::overworld::{bfs_depths, build_overworld, sample_climate};
    use crate::params::Parameters;
    use crate::rng::RngContext;
    use crate::types::{DifficultyTier, RegionId};

    fn named(seed: u64) -> (Overworld, SlotMap<InteriorId, Interior>, Goal, String) {
        let context = RngContext::new(seed);
        let params = Parameters::new(2, 4, DifficultyTier::Seasoned);
        let climate = sample_climate(&mut context.derive("climate"));
        let mut overworld = build_overworld(&context, &params, climate);
        let depths: SecondaryMap<RegionId, u32> = bfs_depths(&overworld);
        let mut interiors: SlotMap<InteriorId, Interior> = SlotMap::with_key();
        let mut goal = plan_goal(
            &mut context.derive("goal"),
            &params,
            &overworld,
            &interiors,
            &depths,
        );
        let map_name = assign_names(
            &mut context.derive("naming"),
            &mut overworld,
            &mut interiors,
            &mut goal,
        );
        (overworld, interiors, goal, map_name)
    }

    #[test]
    fn every_region_and_the_map_receive_names() {
        let (overworld, _, _, map_name) = named(42);
        assert!(map_name.starts_with("The "));
        for region in overworld.regions.values() {
            assert!(!region.name.is_empty());
        }
    }

    #[test]
    fn goal_description_resolves_all_placeholders() {
        for seed in 0..16_u64 {
            let (_, _, goal, _) = named(seed);
            assert!(!goal.description.is_empty());
            assert!(!goal.description.contains("{antagonist}"));
            assert!(!goal.description.contains("{location}"));
            assert!(!goal.description.contains("{macguffin}"));
            assert!(goal.description.contains(&goal.antagonist));
        }
    }

    #[test]
    fn naming_is_deterministic_for_a_fixed_seed() {
        let (left_world, _, _, left_name) = named(1_234);
        let (right_world, _, _, right_name) = named(1_234);
        assert_eq!(left_name, right_name);
        let collect = |overworld: &Overworld| {
            overworld
                .region_ids_by_coord()
                .into_iter()
                .map(|id| overworld.regions[id].name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(collect(&left_world), collect(&right_world));
    }
}
