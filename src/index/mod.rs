mod cell_index;
pub mod constants;

pub use cell_index::CellIndex;
pub use constants::{EARTH_RADIUS_METERS, KEY_RANGE_METERS, MAX_LEVEL, NEIGHBOR_DELTAS};
