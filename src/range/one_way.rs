use crate::coord::GeoPoint;
use crate::error::RangeError;
use crate::geom::distance_meters;
use crate::range::flood::{RangeResult, range_query};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A marker that the cell grid puts in range of the centre although it lies
/// further away than the travel radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneWayJump {
    pub point: GeoPoint,
    /// Direct great-circle distance from the centre.
    pub distance_meters: f64,
    /// Whether the centre's cell is part of the marker's own range, i.e.
    /// whether the jump can be made in the opposite direction too.
    pub return_in_range: bool,
}

/// Which one-way jumps a caller wants reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneWayPolicy {
    /// Every marker beyond the radius whose cell is still in range.
    Outbound,
    /// Only markers whose own range does not reach back to the centre's cell.
    #[default]
    NoReturn,
}

impl OneWayPolicy {
    pub fn admits(&self, jump: &OneWayJump) -> bool {
        match self {
            OneWayPolicy::Outbound => true,
            OneWayPolicy::NoReturn => !jump.return_in_range,
        }
    }
}

/// Finds the one-way jumps among `points` for an already computed range.
///
/// A point is a candidate when its cell is a member of `result` but its direct
/// distance to the centre exceeds the radius. For each candidate the reverse
/// query (from the candidate, same radius and level) is run to fill in
/// [`OneWayJump::return_in_range`].
pub fn detect_one_way(
    result: &RangeResult,
    points: &[GeoPoint],
) -> Result<Vec<OneWayJump>, RangeError> {
    let center = result.center();
    let radius = result.radius_meters();
    let mut jumps = Vec::new();

    for point in points {
        if !result.contains_point(point)? {
            continue;
        }
        let distance = distance_meters(point, &center);
        if distance <= radius {
            continue;
        }

        let reverse = range_query(point, radius, result.level())?;
        jumps.push(OneWayJump {
            point: *point,
            distance_meters: distance,
            return_in_range: reverse.contains(&result.seed()),
        });
    }

    debug!(
        candidates = points.len(),
        jumps = jumps.len(),
        no_return = jumps.iter().filter(|j| !j.return_in_range).count(),
        "one-way detection finished"
    );

    Ok(jumps)
}

/// Points that fail the direct distance test against `center` yet fall in a
/// cell of the flood-filled range.
///
/// These are the places where the grid coarsening makes the range
/// asymmetric; see [`detect_one_way`] for whether the way back also works.
///
/// # Example
/// ```
/// use drone_range::{GeoPoint, one_way_candidates};
///
/// # fn main() -> Result<(), drone_range::RangeError> {
/// let center = GeoPoint::new(47.6205, -122.3493)?;
/// let markers = [GeoPoint::new(47.6210, -122.3490)?];
///
/// // well within 500 m, so nothing one-way about it
/// assert!(one_way_candidates(&center, 500.0, 16, &markers)?.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn one_way_candidates(
    center: &GeoPoint,
    radius_meters: f64,
    level: u8,
    points: &[GeoPoint],
) -> Result<Vec<GeoPoint>, RangeError> {
    let result = range_query(center, radius_meters, level)?;
    let center = result.center();

    let mut candidates = Vec::new();
    for point in points {
        if result.contains_point(point)? && distance_meters(point, &center) > radius_meters {
            candidates.push(*point);
        }
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::destination_point;
    use crate::index::CellIndex;

    fn seattle() -> GeoPoint {
        GeoPoint::new(47.6205, -122.3493).unwrap()
    }

    /// Points exactly `radius + 1` m from the centre whose cell is in range.
    fn just_outside_in_range_cells(result: &RangeResult) -> Vec<GeoPoint> {
        (0..360)
            .step_by(5)
            .map(|b| {
                destination_point(&result.center(), b as f64, result.radius_meters() + 1.0)
                    .unwrap()
            })
            .filter(|p| result.contains_point(p).unwrap())
            .collect()
    }

    #[test]
    fn test_radius_plus_one_is_reported() -> Result<(), RangeError> {
        let center = seattle();
        let result = range_query(&center, 500.0, 16)?;
        let outside = just_outside_in_range_cells(&result);
        assert!(!outside.is_empty());

        let reported = one_way_candidates(&center, 500.0, 16, &outside)?;
        assert_eq!(reported, outside);

        for p in &reported {
            let d = distance_meters(p, &center);
            assert!((d - 501.0).abs() < 1e-6);
            let own_cell = CellIndex::from_geo_point(p, 16)?;
            assert!(result.contains(&own_cell));
        }
        Ok(())
    }

    #[test]
    fn test_points_inside_radius_are_not_one_way() -> Result<(), RangeError> {
        let center = seattle();
        let inside: Vec<_> = (0..360)
            .step_by(30)
            .map(|b| destination_point(&center, b as f64, 250.0))
            .collect::<Result<_, _>>()?;

        assert!(one_way_candidates(&center, 500.0, 16, &inside)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_far_points_are_not_one_way() -> Result<(), RangeError> {
        let center = seattle();
        let far = [
            destination_point(&center, 45.0, 5_000.0)?,
            GeoPoint::new(47.481489, -122.196868)?,
        ];

        assert!(one_way_candidates(&center, 500.0, 16, &far)?.is_empty());
        let result = range_query(&center, 500.0, 16)?;
        assert!(detect_one_way(&result, &far)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_detect_matches_reverse_query() -> Result<(), RangeError> {
        let result = range_query(&seattle(), 500.0, 16)?;
        let outside = just_outside_in_range_cells(&result);
        let jumps = detect_one_way(&result, &outside)?;

        assert_eq!(jumps.len(), outside.len());
        for jump in &jumps {
            assert!(jump.distance_meters > 500.0);
            let reverse = range_query(&jump.point, 500.0, 16)?;
            assert_eq!(jump.return_in_range, reverse.contains(&result.seed()));
        }
        Ok(())
    }

    #[test]
    fn test_policy_filters() -> Result<(), RangeError> {
        let point = seattle();
        let one_way = OneWayJump {
            point,
            distance_meters: 501.0,
            return_in_range: false,
        };
        let two_way = OneWayJump {
            return_in_range: true,
            ..one_way
        };

        assert!(OneWayPolicy::Outbound.admits(&one_way));
        assert!(OneWayPolicy::Outbound.admits(&two_way));
        assert!(OneWayPolicy::NoReturn.admits(&one_way));
        assert!(!OneWayPolicy::NoReturn.admits(&two_way));
        Ok(())
    }
}
