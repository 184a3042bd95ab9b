//! Sample points along a cell boundary.
//!
//! Intermediate points are linear interpolations of the corner latitude and
//! longitude, not great-circle interpolations. Edge `k` runs from corner `k` to
//! corner `(k + 1) % 4`.

use crate::coord::GeoPoint;
use crate::error::RangeError;

fn midpoint(a: &GeoPoint, b: &GeoPoint) -> Result<GeoPoint, RangeError> {
    GeoPoint::new((a.lat() + b.lat()) / 2.0, (a.lng() + b.lng()) / 2.0)
}

/// Midpoint of each of the four edges.
pub fn edge_midpoints(corners: &[GeoPoint; 4]) -> Result<[GeoPoint; 4], RangeError> {
    Ok([
        midpoint(&corners[0], &corners[1])?,
        midpoint(&corners[1], &corners[2])?,
        midpoint(&corners[2], &corners[3])?,
        midpoint(&corners[3], &corners[0])?,
    ])
}

/// The 1/4 and 3/4 points of each edge, two per edge in edge order.
pub fn edge_quarterpoints(corners: &[GeoPoint; 4]) -> Result<[GeoPoint; 8], RangeError> {
    let mut out = [corners[0]; 8];

    for k in 0..4 {
        let start = &corners[k];
        let end = &corners[(k + 1) % 4];
        let mid = midpoint(start, end)?;

        out[2 * k] = midpoint(start, &mid)?;
        out[2 * k + 1] = midpoint(&mid, end)?;
    }
    Ok(out)
}

/// All 16 boundary samples of a cell: corners, then edge midpoints, then
/// quarter points.
pub fn boundary_samples(corners: &[GeoPoint; 4]) -> Result<Vec<GeoPoint>, RangeError> {
    let mut samples = Vec::with_capacity(16);
    samples.extend_from_slice(corners);
    samples.extend_from_slice(&edge_midpoints(corners)?);
    samples.extend_from_slice(&edge_quarterpoints(corners)?);
    Ok(samples)
}
