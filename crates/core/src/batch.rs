//! Embarrassingly parallel batch generation.
//!
//! Each request is an atomic unit of work with its own RNG context, so
//! requests run fully in parallel with no coordination. Cancellation is
//! honored between runs, never mid-run.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::mapgen::generate;
use crate::mapgen::model::Map;
use crate::params::Parameters;
use crate::types::GenerateError;

#[derive(Clone, Copy, Debug)]
pub struct GenerationRequest {
    pub seed: u64,
    pub params: Parameters,
}

#[derive(Debug)]
pub enum BatchOutcome {
    Generated(Box<Map>),
    /// The cancel flag was set before this run started.
    Cancelled,
    Failed(GenerateError),
}

pub fn generate_batch(
    requests: &[GenerationRequest],
    cancel: &AtomicBool,
) -> Vec<BatchOutcome> {
    requests
        .par_iter()
        .map(|request| {
            if cancel.load(Ordering::Relaxed) {
                return BatchOutcome::Cancelled;
            }
            match generate(request.seed, &request.params) {
                Ok(map) => BatchOutcome::Generated(Box::new(map)),
                Err(error) => BatchOutcome::Failed(error),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DifficultyTier;

    fn requests(count: u64) -> Vec<GenerationRequest> {
        (0..count)
            .map(|seed| GenerationRequest {
                seed,
                params: Parameters::new(2, 5, DifficultyTier::Seasoned),
            })
            .collect()
    }

    #[test]
    fn batch_results_match_sequential_generation() {
        let batch = generate_batch(&requests(6), &AtomicBool::new(false));
        assert_eq!(batch.len(), 6);
        for (seed, outcome) in (0_u64..).zip(&batch) {
            let BatchOutcome::Generated(parallel_map) = outcome else {
                panic!("request {seed} did not generate: {outcome:?}");
            };
            let sequential = generate(seed, &parallel_map.params).expect("generation succeeds");
            assert_eq!(
                sequential.canonical_json().expect("serializable"),
                parallel_map.canonical_json().expect("serializable")
            );
        }
    }

    #[test]
    fn a_preset_cancel_flag_skips_every_run() {
        let batch = generate_batch(&requests(4), &AtomicBool::new(true));
        assert!(batch.iter().all(|outcome| matches!(outcome, BatchOutcome::Cancelled)));
    }

    #[test]
    fn invalid_requests_fail_without_poisoning_the_batch() {
        let mut mixed = requests(2);
        mixed.push(GenerationRequest {
            seed: 9,
            params: Parameters::new(0, 5, DifficultyTier::Seasoned),
        });
        let batch = generate_batch(&mixed, &AtomicBool::new(false));
        assert!(matches!(batch[0], BatchOutcome::Generated(_)));
        assert!(matches!(batch[1], BatchOutcome::Generated(_)));
        assert!(matches!(
            batch[2],
            BatchOutcome::Failed(GenerateError::InvalidParameters(_))
        ));
    }
}
