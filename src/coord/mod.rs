pub mod projection;

pub use projection::{
    Face, face_uv_to_vector, st_to_uv, to_geo_point, to_unit_vector, uv_to_st, vector_to_face_uv,
};

use crate::error::RangeError;
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>` and [`GeoPoint`].
/// Axis order follows GeoJSON/WKT: x is longitude, y is latitude.
pub trait Coordinate {
    /// Returns the x-coordinate (longitude in degrees).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (latitude in degrees).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

/// A validated geographic position in degrees.
///
/// The only way to build one is through [`GeoPoint::new`] (or a conversion that
/// calls it), so every `GeoPoint` in circulation is finite and inside
/// `[-90, 90] x [-180, 180]`. Out-of-domain input is rejected, never clamped.
///
/// # Example
///
/// ```
/// use drone_range::GeoPoint;
///
/// # fn main() -> Result<(), drone_range::RangeError> {
/// let space_needle = GeoPoint::new(47.6205, -122.3493)?;
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = RangeError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, RangeError> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        if !valid {
            return Err(RangeError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Builds a point from any [`Coordinate`] (x = longitude, y = latitude).
    ///
    /// ```
    /// use drone_range::GeoPoint;
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), drone_range::RangeError> {
    /// let from_tuple = GeoPoint::from_coordinate(&(-122.3493, 47.6205))?;
    /// let from_point = GeoPoint::from_coordinate(&Point::new(-122.3493, 47.6205))?;
    /// assert_eq!(from_tuple, from_point);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_coordinate(coord: &impl Coordinate) -> Result<Self, RangeError> {
        Self::new(coord.y(), coord.x())
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        crate::geom::distance_meters(self, other)
    }
}

impl Coordinate for GeoPoint {
    fn x(&self) -> f64 {
        self.lng
    }
    fn y(&self) -> f64 {
        self.lat
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lng, p.lat)
    }
}

impl TryFrom<Point<f64>> for GeoPoint {
    type Error = RangeError;

    fn try_from(p: Point<f64>) -> Result<Self, Self::Error> {
        GeoPoint::from_coordinate(&p)
    }
}
