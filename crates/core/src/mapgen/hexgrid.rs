//! Axial hex coordinate math used by overworld growth and validation.

use crate::types::HexCoord;

/// The six axial neighbor offsets, in a fixed clockwise order. Iteration
/// order matters for determinism and must not change.
pub(crate) const HEX_DIRECTIONS: [(i32, i32); 6] =
    [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

pub(crate) fn neighbors(coord: HexCoord) -> [HexCoord; 6] {
    HEX_DIRECTIONS.map(|(dq, dr)| HexCoord { q: coord.q + dq, r: coord.r + dr })
}

/// Hex (cube) distance between two axial coordinates.
pub(crate) fn distance(a: HexCoord, b: HexCoord) -> u32 {
    let dq = a.q - b.q;
    let dr = a.r - b.r;
    let ds = -(a.q + a.r) - -(b.q + b.r);
    (dq.unsigned_abs() + dr.unsigned_abs() + ds.unsigned_abs()) / 2
}
