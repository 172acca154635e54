use std::fmt;

use slotmap::new_key_type;

use serde::{Deserialize, Serialize};

new_key_type! {
    pub struct RegionId;
    pub struct InteriorId;
}

/// Axial hex coordinate of one overworld cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Biome {
    Grassland,
    Forest,
    Taiga,
    Desert,
    Tundra,
    Snow,
    Volcanic,
    Swamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Temperature {
    Freezing,
    Cold,
    Temperate,
    Warm,
    Hot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Humidity {
    Barren,
    Dry,
    Average,
    Wet,
    Drenched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Cave,
    Temple,
    Fortress,
    MonsterDen,
    Ruins,
    Village,
    Grove,
    Spring,
    Watchtower,
}

impl FeatureKind {
    /// Dungeon-type features own exactly one interior map.
    pub fn is_dungeon(self) -> bool {
        matches!(self, Self::Cave | Self::Temple | Self::Fortress | Self::MonsterDen)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifficultyTier {
    Novice,
    Seasoned,
    Veteran,
    Legendary,
}

pub const TIER_COUNT: usize = 4;

impl DifficultyTier {
    pub fn index(self) -> usize {
        match self {
            Self::Novice => 0,
            Self::Seasoned => 1,
            Self::Veteran => 2,
            Self::Legendary => 3,
        }
    }

    pub fn lowest() -> Self {
        Self::Novice
    }

    pub fn highest() -> Self {
        Self::Legendary
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Novice => "novice",
            Self::Seasoned => "seasoned",
            Self::Veteran => "veteran",
            Self::Legendary => "legendary",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ParameterError> {
        match raw.to_ascii_lowercase().as_str() {
            "novice" => Ok(Self::Novice),
            "seasoned" => Ok(Self::Seasoned),
            "veteran" => Ok(Self::Veteran),
            "legendary" => Ok(Self::Legendary),
            _ => Err(ParameterError::UnknownTier { given: raw.to_string() }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GoalArchetype {
    Rescue,
    ArtifactRetrieval,
    PurgeCurse,
    SlayWarlord,
}

/// Rejection reasons produced by the parameter validation boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParameterError {
    PartySizeOutOfRange { given: u8 },
    AverageLevelOutOfRange { given: u8 },
    UnknownTier { given: String },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PartySizeOutOfRange { given } => {
                write!(f, "party size {given} is outside the allowed range 1..=4")
            }
            Self::AverageLevelOutOfRange { given } => {
                write!(f, "average party level {given} is outside the allowed range 1..=20")
            }
            Self::UnknownTier { given } => {
                write!(f, "unknown difficulty tier '{given}'")
            }
        }
    }
}

/// Failures surfaced by the generation entry point.
#[derive(Debug)]
pub enum GenerateError {
    /// User input out of bounds; no generation was attempted.
    InvalidParameters(ParameterError),
    /// A stage could not satisfy a hard invariant within bounded retries.
    /// Retrying with the same inputs will not help.
    BudgetExhausted { stage: &'static str, seed: u64 },
    /// An upstream invariant violation escaped its stage.
    InternalConsistency { detail: String },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameters(e) => write!(f, "invalid parameters: {e}"),
            Self::BudgetExhausted { stage, seed } => {
                write!(f, "generation budget exhausted in stage '{stage}' (seed {seed})")
            }
            Self::InternalConsistency { detail } => {
                write!(f, "internal consistency error: {detail}")
            }
        }
    }
}
