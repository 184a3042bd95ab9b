mod flood;
mod one_way;

pub use flood::{RangeResult, cell_in_range, point_in_range_set, range_query};
pub use one_way::{OneWayJump, OneWayPolicy, detect_one_way, one_way_candidates};
