//! Procedural map generation domain split into coherent submodules.

pub mod model;
pub mod tuning;

mod events;
mod generator;
mod goal;
mod hexgrid;
mod interior;
mod naming;
mod overworld;

pub use generator::MapGenerator;

pub(crate) use overworld::bfs_depths;

use crate::params::Parameters;
use crate::types::GenerateError;
use model::Map;

/// The sole generation entry point: pure and total over valid inputs.
pub fn generate(seed: u64, params: &Parameters) -> Result<Map, GenerateError> {
    MapGenerator::new(seed, *params).generate()
}
