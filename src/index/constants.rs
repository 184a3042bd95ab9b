/// Deepest supported subdivision level; a face has `2^27 x 2^27` cells.
///
/// Stepping across a face edge re-projects a cell centre in `f64`. Beyond
/// this level that loses enough precision that the neighbour relation stops
/// being symmetric at face edges.
pub const MAX_LEVEL: u8 = 27;

/// Mean Earth radius used by every distance computation, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Theoretical portal key range drawn next to the travel radius, in meters.
pub const KEY_RANGE_METERS: f64 = 1250.0;

/// Offsets of the four corners within a cell, in winding order.
///
/// Neighbouring cells share edges only when every cell uses this order.
pub(crate) const CORNER_OFFSETS: [(f64, f64); 4] = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];

/// Offset of the cell centre within a cell.
pub(crate) const CENTER_OFFSET: (f64, f64) = (0.5, 0.5);

/// Axis-aligned unit steps used for flood-fill adjacency.
pub const NEIGHBOR_DELTAS: [(i64, i64); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
