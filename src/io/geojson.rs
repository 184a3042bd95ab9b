use crate::index::CellIndex;
use crate::range::RangeResult;
use geo_types::{MultiPolygon, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};
use rayon::prelude::*;
use wkt::ToWkt;

/// Trait for exporting collections of [`CellIndex`] values as map geometry.
///
/// Implemented for `[CellIndex]` and [`RangeResult`]. Coordinates are written
/// with x = longitude, y = latitude.
pub trait CellsToGeoJson {
    /// One polygon feature per cell, carrying the canonical id as `cell`.
    fn to_geojson(&self) -> FeatureCollection;
    /// All cell boundaries as a single WKT `MULTIPOLYGON`.
    fn to_wkt(&self) -> String;
}

fn cell_feature(cell: &CellIndex, seed: Option<&CellIndex>) -> Feature {
    let polygon = cell.to_polygon();

    let mut properties = JsonObject::new();
    properties.insert("cell".to_string(), JsonValue::from(cell.to_string()));
    properties.insert("level".to_string(), JsonValue::from(cell.level()));
    if let Some(seed) = seed {
        properties.insert("seed".to_string(), JsonValue::from(cell == seed));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::from(&polygon)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn cells_to_wkt(cells: &[CellIndex]) -> String {
    let polygons: Vec<Polygon<f64>> = cells.par_iter().map(|c| c.to_polygon()).collect();
    MultiPolygon::new(polygons).wkt_string()
}

impl CellsToGeoJson for [CellIndex] {
    fn to_geojson(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.iter().map(|cell| cell_feature(cell, None)).collect(),
            foreign_members: None,
        }
    }

    fn to_wkt(&self) -> String {
        cells_to_wkt(self)
    }
}

impl CellsToGeoJson for RangeResult {
    fn to_geojson(&self) -> FeatureCollection {
        let seed = self.seed();
        let mut members = JsonObject::new();
        members.insert("radius_meters".to_string(), JsonValue::from(self.radius_meters()));
        members.insert("level".to_string(), JsonValue::from(self.level()));

        FeatureCollection {
            bbox: None,
            features: self
                .iter()
                .map(|cell| cell_feature(cell, Some(&seed)))
                .collect(),
            foreign_members: Some(members),
        }
    }

    fn to_wkt(&self) -> String {
        cells_to_wkt(self.cells())
    }
}
