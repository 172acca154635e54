//! Player-supplied generation parameters and the validation boundary.

use serde::{Deserialize, Serialize};

use crate::types::{DifficultyTier, ParameterError};

pub const PARTY_SIZE_MIN: u8 = 1;
pub const PARTY_SIZE_MAX: u8 = 4;
pub const AVERAGE_LEVEL_MIN: u8 = 1;
pub const AVERAGE_LEVEL_MAX: u8 = 20;

/// The sole non-seed inputs to generation. Validated before any stage runs;
/// a rejected value never produces a partial map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameters {
    pub party_size: u8,
    pub average_level: u8,
    pub tier: DifficultyTier,
}

impl Parameters {
    pub fn new(party_size: u8, average_level: u8, tier: DifficultyTier) -> Self {
        Self { party_size, average_level, tier }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(PARTY_SIZE_MIN..=PARTY_SIZE_MAX).contains(&self.party_size) {
            return Err(ParameterError::PartySizeOutOfRange { given: self.party_size });
        }
        if !(AVERAGE_LEVEL_MIN..=AVERAGE_LEVEL_MAX).contains(&self.average_level) {
            return Err(ParameterError::AverageLevelOutOfRange { given: self.average_level });
        }
        Ok(())
    }

    /// Stable byte rendering used for content-id hashing. Field order is part
    /// of the wire contract and must only change with a schema version bump.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(3);
        bytes.push(self.party_size);
        bytes.push(self.average_level);
        bytes.push(self.tier.index() as u8);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterError;

    #[test]
    fn accepts_every_in_range_combination() {
        for party_size in PARTY_SIZE_MIN..=PARTY_SIZE_MAX {
            for average_level in AVERAGE_LEVEL_MIN..=AVERAGE_LEVEL_MAX {
                let params =
                    Parameters::new(party_size, average_level, DifficultyTier::Seasoned);
                assert_eq!(params.validate(), Ok(()));
            }
        }
    }

    #[test]
    fn rejects_party_size_outside_bounds() {
        let too_small = Parameters::new(0, 5, DifficultyTier::Novice);
        assert_eq!(
            too_small.validate(),
            Err(ParameterError::PartySizeOutOfRange { given: 0 })
        );

        let too_large = Parameters::new(5, 5, DifficultyTier::Novice);
        assert_eq!(
            too_large.validate(),
            Err(ParameterError::PartySizeOutOfRange { given: 5 })
        );
    }

    #[test]
    fn rejects_average_level_outside_bounds() {
        let too_low = Parameters::new(2, 0, DifficultyTier::Veteran);
        assert_eq!(
            too_low.validate(),
            Err(ParameterError::AverageLevelOutOfRange { given: 0 })
        );

        let too_high = Parameters::new(2, 21, DifficultyTier::Veteran);
        assert_eq!(
            too_high.validate(),
            Err(ParameterError::AverageLevelOutOfRange { given: 21 })
        );
    }

    #[test]
    fn canonical_bytes_distinguish_every_field() {
        let baseline = Parameters::new(2, 5, DifficultyTier::Seasoned);
        assert_ne!(
            baseline.canonical_bytes(),
            Parameters::new(3, 5, DifficultyTier::Seasoned).canonical_bytes()
        );
        assert_ne!(
            baseline.canonical_bytes(),
            Parameters::new(2, 6, DifficultyTier::Seasoned).canonical_bytes()
        );
        assert_ne!(
            baseline.canonical_bytes(),
            Parameters::new(2, 5, DifficultyTier::Veteran).canonical_bytes()
        );
    }
}
