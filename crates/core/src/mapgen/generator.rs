//! High-level generation orchestration composing the stage modules.
//!
//! Stage order follows the data flow: climate and overworld first, then
//! interiors and the goal over the frozen overworld, then event
//! distribution, naming, and assembly. Every stage draws from its own
//! labeled sub-stream, so the order itself never influences output.

use slotmap::SlotMap;

use crate::artifact;
use crate::params::Parameters;
use crate::rng::RngContext;
use crate::types::{GenerateError, InteriorId};

use super::events::distribute_events;
use super::goal::plan_goal;
use super::interior::build_interior;
use super::model::{Interior, Map};
use super::naming::assign_names;
use super::overworld::{bfs_depths, build_overworld, sample_climate};

pub struct MapGenerator {
    seed: u64,
    params: Parameters,
}

impl MapGenerator {
    pub fn new(seed: u64, params: Parameters) -> Self {
        Self { seed, params }
    }

    pub fn generate(&self) -> Result<Map, GenerateError> {
        self.params.validate().map_err(GenerateError::InvalidParameters)?;

        let context = RngContext::new(self.seed);
        log::debug!("generating map (seed {}, params {:?})", self.seed, self.params);

        let climate = sample_climate(&mut context.derive("climate"));
        let mut overworld = build_overworld(&context, &self.params, climate);
        let depths = bfs_depths(&overworld);

        let mut interiors: SlotMap<InteriorId, Interior> = SlotMap::with_key();
        for region_id in overworld.region_ids_by_coord() {
            let coord = overworld.regions[region_id].coord;
            for feature_index in 0..overworld.regions[region_id].features.len() {
                if !overworld.regions[region_id].features[feature_index].kind.is_dungeon() {
                    continue;
                }
                let mut stream =
                    context.derive(&format!("interior:{},{}:{feature_index}", coord.q, coord.r));
                let interior_id = interiors.insert(build_interior(
                    &mut stream,
                    self.params.tier,
                    region_id,
                    feature_index,
                ));
                overworld.regions[region_id].features[feature_index].interior =
                    Some(interior_id);
            }
        }

        let mut goal = plan_goal(
            &mut context.derive("goal"),
            &self.params,
            &overworld,
            &interiors,
            &depths,
        );
        let boss = distribute_events(
            &mut context.derive("events"),
            &self.params,
            &mut overworld,
            &mut interiors,
            &goal,
        );
        let map_name = assign_names(
            &mut context.derive("naming"),
            &mut overworld,
            &mut interiors,
            &mut goal,
        );

        artifact::assemble(artifact::StageOutputs {
            seed: self.seed,
            params: self.params,
            name: map_name,
            climate,
            overworld,
            interiors,
            goal,
            boss,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::{DifficultyTier, ParameterError};

    #[test]
    fn out_of_range_parameters_are_rejected_before_generation() {
        let params = Parameters::new(9, 5, DifficultyTier::Novice);
        let error = MapGenerator::new(1, params).generate().expect_err("must reject");
        assert!(matches!(
            error,
            GenerateError::InvalidParameters(ParameterError::PartySizeOutOfRange { given: 9 })
        ));
    }

    #[test]
    fn same_inputs_produce_byte_identical_maps() {
        let params = Parameters::new(3, 7, DifficultyTier::Veteran);
        let left = MapGenerator::new(123_456, params).generate().expect("generation succeeds");
        let right = MapGenerator::new(123_456, params).generate().expect("generation succeeds");
        assert_eq!(
            left.canonical_json().expect("serializable"),
            right.canonical_json().expect("serializable")
        );
    }

    #[test]
    fn changing_the_seed_changes_the_map() {
        let params = Parameters::new(3, 7, DifficultyTier::Veteran);
        let left = MapGenerator::new(1, params).generate().expect("generation succeeds");
        let right = MapGenerator::new(2, params).generate().expect("generation succeeds");
        assert_ne!(
            left.canonical_json().expect("serializable"),
            right.canonical_json().expect("serializable")
        );
    }

    #[test]
    fn every_dungeon_feature_owns_exactly_one_interior() {
        let params = Parameters::new(4, 12, DifficultyTier::Legendary);
        let map = MapGenerator::new(42, params).generate().expect("generation succeeds");
        let mut owned = 0;
        for region in map.overworld.regions.values() {
            for feature in &region.features {
                if feature.kind.is_dungeon() {
                    let interior_id = feature.interior.expect("dungeon feature has an interior");
                    assert!(map.interiors.contains_key(interior_id));
                    owned += 1;
                } else {
                    assert!(feature.interior.is_none());
                }
            }
        }
        assert_eq!(owned, map.interiors.len());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(96))]
        #[test]
        fn generated_maps_always_validate(
            seed in any::<u64>(),
            party_size in 1_u8..=4,
            average_level in 1_u8..=20,
            tier_selector in 0_usize..=3
        ) {
            let tier = [
                DifficultyTier::Novice,
                DifficultyTier::Seasoned,
                DifficultyTier::Veteran,
                DifficultyTier::Legendary,
            ][tier_selector];
            let params = Parameters::new(party_size, average_level, tier);
            let map = MapGenerator::new(seed, params).generate();
            prop_assert!(map.is_ok(), "generation failed: {:?}", map.err());
        }
    }
}
