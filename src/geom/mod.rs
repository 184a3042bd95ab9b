mod distance;
mod parse;
mod sampling;

pub use distance::{destination_point, distance_meters};
pub use parse::{geometry_to_points, parse_geojson, parse_geometry, parse_wkt};
pub use sampling::{boundary_samples, edge_midpoints, edge_quarterpoints};
