use crate::coord::GeoPoint;
use crate::error::RangeError;
use geo::Centroid;
use geo_types::Geometry;
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, RangeError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a GeoJSON string into a `geo_types::Geometry`.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, RangeError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| RangeError::GeometryParseError(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => {
            Geometry::try_from(geom).map_err(|e| RangeError::GeometryParseError(e.to_string()))
        }
        GeoJson::Feature(feat) => feat
            .geometry
            .ok_or_else(|| RangeError::GeometryParseError("Feature has no geometry".to_string()))
            .and_then(|g| {
                Geometry::try_from(g).map_err(|e| RangeError::GeometryParseError(e.to_string()))
            }),
        GeoJson::FeatureCollection(_) => Err(RangeError::GeometryParseError(
            "FeatureCollection not supported, use individual geometries".to_string(),
        )),
    }
}

/// Parses a WKT string into a `geo_types::Geometry`.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, RangeError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| RangeError::GeometryParseError(e.to_string()))?;

    wkt.try_into().map_err(|_| {
        RangeError::GeometryParseError("Failed to convert WKT to geometry".to_string())
    })
}

/// Reduces a geometry to the marker positions it stands for.
///
/// Points map to themselves, multi-points to each member; lines and polygons
/// are represented by their centroid. Collections recurse. Coordinates are
/// read as x = longitude, y = latitude and validated. A line or polygon
/// without a centroid (an empty one) is a [`RangeError::GeometryParseError`].
pub fn geometry_to_points(geom: &Geometry<f64>) -> Result<Vec<GeoPoint>, RangeError> {
    match geom {
        Geometry::Point(pt) => Ok(vec![GeoPoint::from_coordinate(pt)?]),
        Geometry::MultiPoint(mp) => mp.0.iter().map(|pt| GeoPoint::from_coordinate(pt)).collect(),
        Geometry::GeometryCollection(gc) => {
            let mut points = Vec::new();
            for g in &gc.0 {
                points.extend(geometry_to_points(g)?);
            }
            Ok(points)
        }
        other => match other.centroid() {
            Some(c) => Ok(vec![GeoPoint::from_coordinate(&c)?]),
            None => Err(RangeError::GeometryParseError(
                "Geometry has no centroid".to_string(),
            )),
        },
    }
}
