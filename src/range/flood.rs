use crate::coord::GeoPoint;
use crate::error::RangeError;
use crate::geom::{distance_meters, edge_midpoints, edge_quarterpoints};
use crate::index::CellIndex;
use geo_types::Polygon;
use std::collections::HashSet;
use tracing::debug;

/// The cells reached by one range query.
///
/// Cells are kept in the order the flood-fill finished them, starting with
/// the seed (the cell containing the centre). Membership tests go through a
/// hash set keyed on the cell value.
#[derive(Debug, Clone)]
pub struct RangeResult {
    center: GeoPoint,
    radius_meters: f64,
    level: u8,
    seed: CellIndex,
    cells: Vec<CellIndex>,
    members: HashSet<CellIndex>,
}

impl RangeResult {
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// The cell containing the query centre. Always a member.
    pub fn seed(&self) -> CellIndex {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellIndex> {
        self.cells.iter()
    }

    pub fn contains(&self, cell: &CellIndex) -> bool {
        self.members.contains(cell)
    }

    /// Whether the cell containing `point` (at this result's level) is a member.
    pub fn contains_point(&self, point: &GeoPoint) -> Result<bool, RangeError> {
        point_in_range_set(point, self.level, self)
    }

    /// Closed boundary polygon of every cell, in result order.
    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.cells.iter().map(|cell| cell.to_polygon()).collect()
    }
}

fn within(point: &GeoPoint, center: &GeoPoint, radius_meters: f64) -> bool {
    distance_meters(point, center) < radius_meters
}

/// Whether any of the 16 boundary samples of `cell` (4 corners, 4 edge
/// midpoints, 8 quarter points) lies strictly closer than `radius_meters` to
/// `center`.
///
/// This is a sampling approximation, not an exact circle/cell intersection: a
/// circle that crosses an edge between two samples without reaching either is
/// missed. Which cells are drawn depends on this exact sampling, so it must
/// not be swapped for a precise test.
pub fn cell_in_range(
    cell: &CellIndex,
    center: &GeoPoint,
    radius_meters: f64,
) -> Result<bool, RangeError> {
    let corners = cell.corners();
    if corners.iter().any(|p| within(p, center, radius_meters)) {
        return Ok(true);
    }

    let midpoints = edge_midpoints(&corners)?;
    if midpoints.iter().any(|p| within(p, center, radius_meters)) {
        return Ok(true);
    }

    let quarterpoints = edge_quarterpoints(&corners)?;
    Ok(quarterpoints.iter().any(|p| within(p, center, radius_meters)))
}

/// Flood-fills the connected set of cells at `level` whose boundary samples
/// come within `radius_meters` of `center`.
///
/// The seed cell (containing `center`) is always part of the result, even for
/// a zero radius.
///
/// # Example
/// ```
/// use drone_range::{GeoPoint, range_query};
///
/// # fn main() -> Result<(), drone_range::RangeError> {
/// let center = GeoPoint::new(47.6205, -122.3493)?;
/// let result = range_query(&center, 500.0, 16)?;
///
/// assert!(result.contains(&result.seed()));
/// assert!(result.len() > 1);
/// # Ok(())
/// # }
/// ```
pub fn range_query(
    center: &GeoPoint,
    radius_meters: f64,
    level: u8,
) -> Result<RangeResult, RangeError> {
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return Err(RangeError::InvalidRadius(radius_meters));
    }

    let seed = CellIndex::from_geo_point(center, level)?;

    let mut visited: HashSet<CellIndex> = HashSet::from([seed]);
    let mut frontier: Vec<CellIndex> = vec![seed];
    let mut cells: Vec<CellIndex> = Vec::new();
    let mut predicate_calls = 0usize;

    while let Some(cell) = frontier.pop() {
        for neighbor in cell.neighbors()? {
            if visited.contains(&neighbor) {
                continue;
            }
            predicate_calls += 1;
            if cell_in_range(&neighbor, center, radius_meters)? {
                visited.insert(neighbor);
                frontier.push(neighbor);
            }
        }
        cells.push(cell);
    }

    debug!(
        %seed,
        radius_meters,
        level,
        cells = cells.len(),
        predicate_calls,
        "range flood-fill finished"
    );

    Ok(RangeResult {
        center: *center,
        radius_meters,
        level,
        seed,
        cells,
        members: visited,
    })
}

/// Classifies `point` by computing its cell at `level` and checking whether
/// that cell belongs to `result`.
pub fn point_in_range_set(
    point: &GeoPoint,
    level: u8,
    result: &RangeResult,
) -> Result<bool, RangeError> {
    let cell = CellIndex::from_geo_point(point, level)?;
    Ok(result.contains(&cell))
}
