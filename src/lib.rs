//! # drone-range-rs
//!
//! Drone travel range over a cube-face spherical cell grid. A range is the
//! connected set of grid cells, flood-filled from the cell containing the
//! centre, whose boundary comes within the travel radius.
//!
//! There are currently three main entry points.
//!
//! ### 1. `CellIndex` - Single Cell Operations
//!
//! ```
//! use drone_range::{CellIndex, GeoPoint};
//!
//! # fn main() -> Result<(), drone_range::RangeError> {
//! let cell = CellIndex::from_geo_point(&GeoPoint::new(47.6205, -122.3493)?, 16)?;
//! println!("{}", cell);
//! let neighbors = cell.neighbors()?;
//! let polygon = cell.to_polygon();
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `range_query` / `RangePlanner` - Drone Ranges
//!
//! ```
//! use drone_range::{CalculationMethod, GeoPoint, RangePlanner, RangeSettings, range_query};
//!
//! # fn main() -> Result<(), drone_range::RangeError> {
//! let center = GeoPoint::new(47.6205, -122.3493)?;
//! let range = range_query(&center, 500.0, 16)?;
//! assert!(range.contains(&range.seed()));
//!
//! let planner = RangePlanner::new(
//!     RangeSettings::default().calculation_method(CalculationMethod::L17_570M),
//! );
//! let report = planner.plan(&center, &[GeoPoint::new(47.6215, -122.3480)?])?;
//! assert_eq!(report.highlighted, vec![0]);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `classify_csv` - CSV Marker Classification
//!
//! ```no_run
//! use drone_range::{CsvRangeConfig, GeoPoint, classify_csv};
//!
//! # fn main() -> Result<(), drone_range::RangeError> {
//! let center = GeoPoint::new(47.6205, -122.3493)?;
//! let config = CsvRangeConfig::new(center, "geometry");
//!
//! classify_csv("markers.csv", "classified.csv", &config)?;
//! # Ok(())
//! # }
//! ```
//!

pub mod config;
pub mod coord;
pub mod error;
pub mod geom;
pub mod index;
pub mod io;
pub mod planner;
pub mod range;

pub use config::{CalculationMethod, RangeSettings};
pub use coord::{Coordinate, Face, GeoPoint};
pub use error::RangeError;
pub use geom::{destination_point, distance_meters, parse_geometry};
pub use index::{CellIndex, EARTH_RADIUS_METERS, KEY_RANGE_METERS, MAX_LEVEL, constants};
pub use io::{CellsToGeoJson, CsvRangeConfig, MarkerSource, classify_csv};
pub use planner::{RangePlanner, RangeReport};
pub use range::{
    OneWayJump, OneWayPolicy, RangeResult, cell_in_range, detect_one_way, one_way_candidates,
    point_in_range_set, range_query,
};

pub use geo_types;

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::point;

    #[test]
    fn test_end_to_end_workflow() -> Result<(), RangeError> {
        let center = GeoPoint::new(47.6205, -122.3493)?;
        let range = range_query(&center, 500.0, 16)?;

        assert_eq!(range.len(), 55);
        assert_eq!(range.seed().to_string(), "F2ij[51443,59639]@16");

        let marker = GeoPoint::new(47.6215, -122.3480)?;
        assert!(point_in_range_set(&marker, 16, &range)?);

        let collection = range.to_geojson();
        assert_eq!(collection.features.len(), range.len());
        Ok(())
    }

    #[test]
    fn test_using_geo_types_points() -> Result<(), RangeError> {
        let pt = point! { x: -122.3493, y: 47.6205 };
        let center = GeoPoint::from_coordinate(&pt)?;
        assert_eq!(center.lat(), 47.6205);
        assert_eq!(center.lng(), -122.3493);

        let cell = CellIndex::from_geo_point(&center, 16)?;
        let parsed: CellIndex = cell.to_string().parse()?;
        assert_eq!(parsed, cell);
        Ok(())
    }

    #[test]
    fn test_cell_iteration() -> Result<(), RangeError> {
        let range = range_query(&GeoPoint::new(47.6205, -122.3493)?, 570.0, 17)?;

        let mut count = 0;
        for cell in range.iter() {
            assert_eq!(cell.level(), 17);
            count += 1;
        }

        assert_eq!(count, range.len());
        Ok(())
    }

    #[test]
    fn test_planner_with_loaded_settings() -> Result<(), RangeError> {
        let settings = RangeSettings::from_json_str(
            r#"{"calculation_method":"570/17","show_key_range":true,"one_way_policy":"outbound"}"#,
        )?;
        let planner = RangePlanner::new(settings);

        let center = GeoPoint::new(47.6205, -122.3493)?;
        let markers = [
            center,
            destination_point(&center, 90.0, 571.0)?,
            GeoPoint::new(47.481489, -122.196868)?,
        ];
        let report = planner.plan(&center, &markers)?;

        assert_eq!(report.range.level(), 17);
        assert!(report.highlighted.contains(&0));
        assert!(!report.highlighted.contains(&2));
        assert_eq!(report.key_range_meters, Some(KEY_RANGE_METERS));
        for (idx, jump) in &report.one_way {
            assert!(report.highlighted.contains(idx));
            assert!(jump.distance_meters > 570.0);
        }
        Ok(())
    }

    #[test]
    fn test_one_way_candidates_just_beyond_radius() -> Result<(), RangeError> {
        let center = GeoPoint::new(47.6205, -122.3493)?;
        let range = range_query(&center, 500.0, 16)?;

        let beyond: Vec<GeoPoint> = (0..360)
            .step_by(10)
            .map(|b| destination_point(&center, b as f64, 501.0))
            .collect::<Result<_, _>>()?;
        let in_cells: Vec<GeoPoint> = beyond
            .iter()
            .copied()
            .filter(|p| range.contains_point(p).unwrap_or(false))
            .collect();

        assert_eq!(one_way_candidates(&center, 500.0, 16, &beyond)?, in_cells);
        Ok(())
    }
}
