use crate::coord::GeoPoint;
use crate::error::RangeError;
use crate::index::EARTH_RADIUS_METERS;
use std::f64::consts::PI;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Great-circle distance in meters between two points (haversine formula on a
/// sphere of radius [`EARTH_RADIUS_METERS`]).
///
/// # Example
/// ```
/// use drone_range::{GeoPoint, distance_meters};
///
/// # fn main() -> Result<(), drone_range::RangeError> {
/// let a = GeoPoint::new(0.0, 0.0)?;
/// let b = GeoPoint::new(0.0, 1.0)?;
/// assert!((distance_meters(&a, &b) - 111_194.93).abs() < 0.01);
/// # Ok(())
/// # }
/// ```
pub fn distance_meters(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let phi1 = p1.lat() * DEG_TO_RAD;
    let phi2 = p2.lat() * DEG_TO_RAD;
    let d_phi = (p2.lat() - p1.lat()) * DEG_TO_RAD;
    let d_lambda = (p2.lng() - p1.lng()) * DEG_TO_RAD;

    let a = (d_phi / 2.0).sin() * (d_phi / 2.0).sin()
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin() * (d_lambda / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Point reached by travelling `distance` meters from `origin` along the
/// initial great-circle bearing `bearing_deg` (clockwise from north).
///
/// Longitude is normalised to `[-180, 180)`. Fails only for a non-finite
/// bearing or distance.
pub fn destination_point(
    origin: &GeoPoint,
    bearing_deg: f64,
    distance: f64,
) -> Result<GeoPoint, RangeError> {
    let delta = distance / EARTH_RADIUS_METERS;
    let bearing = bearing_deg * DEG_TO_RAD;
    let phi1 = origin.lat() * DEG_TO_RAD;
    let lambda1 = origin.lng() * DEG_TO_RAD;

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * bearing.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (bearing.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    let lat = phi2 * RAD_TO_DEG;
    let lng = (lambda2 * RAD_TO_DEG + 540.0).rem_euclid(360.0) - 180.0;

    GeoPoint::new(lat, lng)
}
