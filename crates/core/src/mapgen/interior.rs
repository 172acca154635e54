//! Interior room-graph generation for dungeon-type landscape features.

use std::collections::VecDeque;

use crate::rng::SubStream;
use crate::types::{DifficultyTier, RegionId};

use super::model::{EventSlot, Interior, Room};
use super::tuning;

/// Build one interior: a connected, deliberately sparse room graph with a
/// single entrance and one deepest anchor room.
pub(super) fn build_interior(
    stream: &mut SubStream,
    tier: DifficultyTier,
    region: RegionId,
    feature_index: usize,
) -> Interior {
    let (min_rooms, max_rooms) = tuning::interior_room_range(tier);
    let room_count = stream.range_usize(min_rooms, max_rooms);

    let mut edges: Vec<(u16, u16)> = Vec::with_capacity(room_count);
    let mut degrees = vec![0_usize; room_count];

    // Spanning tree: each new room attaches to an earlier room that still
    // has spare degree. At least one such room always exists because a tree
    // over k rooms uses 2(k-1) degree across k slots of capacity.
    for room in 1..room_count {
        let candidates: Vec<usize> = (0..room)
            .filter(|&earlier| degrees[earlier] < tuning::ROOM_DEGREE_CAP)
            .collect();
        let parent = *stream.pick(&candidates);
        edges.push((parent as u16, room as u16));
        degrees[parent] += 1;
        degrees[room] += 1;
    }

    // A few cross-links for loops, still bounded per room and never enough
    // to approach a fully connected graph.
    let extra_attempts = room_count / 3;
    for _ in 0..extra_attempts {
        let a = stream.range_usize(0, room_count - 1);
        let b = stream.range_usize(0, room_count - 1);
        if a == b
            || degrees[a] >= tuning::ROOM_DEGREE_CAP
            || degrees[b] >= tuning::ROOM_DEGREE_CAP
        {
            continue;
        }
        let edge = (a.min(b) as u16, a.max(b) as u16);
        if edges.contains(&edge) {
            continue;
        }
        edges.push(edge);
        degrees[a] += 1;
        degrees[b] += 1;
    }
    edges.sort_unstable();

    let rooms: Vec<Room> =
        (0..room_count).map(|_| Room { slots: vec![EventSlot::default()] }).collect();

    let mut interior = Interior {
        region,
        feature_index,
        rooms,
        edges,
        entrance: 0,
        anchor: 0,
        name: String::new(),
    };
    interior.anchor = deepest_room(&interior);
    interior
}

/// The unique deepest room from the entrance: maximum BFS depth, ties broken
/// toward the highest room index.
fn deepest_room(interior: &Interior) -> u16 {
    let room_count = interior.rooms.len();
    let mut depths = vec![u32::MAX; room_count];
    depths[interior.entrance as usize] = 0;
    let mut queue = VecDeque::from([interior.entrance]);
    while let Some(room) = queue.pop_front() {
        let depth = depths[room as usize];
        for neighbor in interior.room_neighbors(room) {
            if depths[neighbor as usize] == u32::MAX {
                depths[neighbor as usize] = depth + 1;
                queue.push_back(neighbor);
            }
        }
    }

    let mut anchor = interior.entrance;
    let mut best_depth = 0_u32;
    for (room, &depth) in depths.iter().enumerate() {
        if depth != u32::MAX && depth >= best_depth {
            best_depth = depth;
            anchor = room as u16;
        }
    }
    anchor
}
