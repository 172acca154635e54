//! Public data model for the generated map artifact and its nested entities.
//!
//! Regions and interiors live in slotmap arenas so the goal, events, and
//! boss can hold stable handles into them without ownership cycles. The
//! artifact is immutable once assembled; its serialized JSON is the wire
//! contract with the cache, the store, and the rendering frontend.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::params::Parameters;
use crate::types::{
    Biome, FeatureKind, GoalArchetype, HexCoord, Humidity, InteriorId, RegionId, Temperature,
};

use super::hexgrid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Climate {
    pub temperature: Temperature,
    pub humidity: Humidity,
}

/// A landscape feature attached to a region. Dungeon-type features carry the
/// handle of the interior generated for them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LandscapeFeature {
    pub kind: FeatureKind,
    pub interior: Option<InteriorId>,
}

/// A placement point holding at most one event.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventSlot {
    pub event: Option<Event>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    /// Difficulty rating; also the budget cost charged at placement.
    pub difficulty: u32,
    /// Reward table key from `content::keys`.
    pub reward: String,
    /// Whether resolving this event advances the map goal.
    pub goal_linked: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EventKind {
    Encounter,
    Interaction,
    Trap,
    Treasure,
    BossFragment { fragment_index: u8 },
    DungeonEntry { interior: InteriorId },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region {
    pub coord: HexCoord,
    pub biome: Biome,
    /// Baseline event difficulty here; grows with distance from start.
    pub difficulty_weight: u32,
    pub features: Vec<LandscapeFeature>,
    pub slots: Vec<EventSlot>,
    pub name: String,
}

/// A connected partition of regions used for locality-lock gating. Groups
/// are ordered shallow-to-deep; the final group contains the boss fragments.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LockGroup {
    pub regions: Vec<RegionId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Overworld {
    pub regions: SlotMap<RegionId, Region>,
    pub start: RegionId,
    pub lock_groups: Vec<LockGroup>,
}

impl Overworld {
    /// Region ids sorted by hex coordinate: the canonical iteration order
    /// for anything that must be reproducible.
    pub fn region_ids_by_coord(&self) -> Vec<RegionId> {
        let mut ids: Vec<RegionId> = self.regions.keys().collect();
        ids.sort_by_key(|&id| self.regions[id].coord);
        ids
    }

    pub fn region_at(&self, coord: HexCoord) -> Option<RegionId> {
        self.regions.iter().find(|(_, region)| region.coord == coord).map(|(id, _)| id)
    }

    /// Adjacent region ids, sorted by coordinate.
    pub fn neighbor_ids(&self, id: RegionId) -> Vec<RegionId> {
        let coord = self.regions[id].coord;
        let mut found: Vec<RegionId> = hexgrid::neighbors(coord)
            .into_iter()
            .filter_map(|neighbor| self.region_at(neighbor))
            .collect();
        found.sort_by_key(|&neighbor| self.regions[neighbor].coord);
        found
    }

    pub fn lock_group_of(&self, id: RegionId) -> Option<usize> {
        self.lock_groups
            .iter()
            .position(|group| group.regions.contains(&id))
    }
}

/// One interior room graph, exclusively owned by a dungeon-type feature.
/// Rooms are indexed by position; edges are undirected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Interior {
    pub region: RegionId,
    /// Index of the owning feature within the region's feature list.
    pub feature_index: usize,
    pub rooms: Vec<Room>,
    pub edges: Vec<(u16, u16)>,
    pub entrance: u16,
    /// The deepest room from the entrance; reserved as the treasure or
    /// boss-fragment anchor.
    pub anchor: u16,
    pub name: String,
}

impl Interior {
    pub fn room_neighbors(&self, room: u16) -> Vec<u16> {
        let mut found = Vec::new();
        for &(a, b) in &self.edges {
            if a == room {
                found.push(b);
            } else if b == room {
                found.push(a);
            }
        }
        found.sort_unstable();
        found
    }

    pub fn room_degree(&self, room: u16) -> usize {
        self.edges.iter().filter(|&&(a, b)| a == room || b == room).count()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Room {
    pub slots: Vec<EventSlot>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalBinding {
    pub region: RegionId,
    /// Set when the binding points inside a dungeon rather than at the
    /// region itself.
    pub interior: Option<InteriorId>,
}

/// The high-level narrative objective. Holds handles into the arenas, never
/// owned copies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Goal {
    pub archetype: GoalArchetype,
    /// Human-readable template with `{antagonist}` / `{location}` /
    /// `{macguffin}` placeholders.
    pub template: String,
    pub antagonist: String,
    pub macguffin: Option<String>,
    pub bindings: Vec<GoalBinding>,
    /// Template rendered against generated names; filled by the naming
    /// stage.
    pub description: String,
}

/// The composite boss: one region handle per fragment, in fragment order.
/// All fragment regions belong to the final lock group.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Boss {
    pub fragment_regions: Vec<RegionId>,
}

/// The immutable generation artifact.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Map {
    pub schema_version: u16,
    pub content_id: String,
    pub seed: u64,
    pub params: Parameters,
    pub name: String,
    pub climate: Climate,
    pub overworld: Overworld,
    pub interiors: SlotMap<InteriorId, Interior>,
    pub goal: Goal,
    pub boss: Boss,
}

impl Map {
    /// Canonical serialized form: the wire contract and the determinism
    /// yardstick. Byte-identical for identical (seed, parameters).
    pub fn canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Every placed event with its location, regions first (by coordinate),
    /// then interiors in creation order.
    pub fn placed_events(&self) -> Vec<(EventLocation, &Event)> {
        let mut found = Vec::new();
        for region_id in self.overworld.region_ids_by_coord() {
            for slot in &self.overworld.regions[region_id].slots {
                if let Some(event) = &slot.event {
                    found.push((EventLocation::Region(region_id), event));
                }
            }
        }
        for (interior_id, interior) in &self.interiors {
            for (room_index, room) in interior.rooms.iter().enumerate() {
                for slot in &room.slots {
                    if let Some(event) = &slot.event {
                        found.push((
                            EventLocation::Room(interior_id, room_index as u16),
                            event,
                        ));
                    }
                }
            }
        }
        found
    }

    pub fn total_event_cost(&self) -> u32 {
        self.placed_events().iter().map(|(_, event)| event.difficulty).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventLocation {
    Region(RegionId),
    Room(InteriorId, u16),
}
