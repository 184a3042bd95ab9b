use crate::coord::{
    Face, GeoPoint, face_uv_to_vector, st_to_uv, to_geo_point, to_unit_vector, uv_to_st,
    vector_to_face_uv,
};
use crate::error::RangeError;
use crate::index::constants::{CENTER_OFFSET, CORNER_OFFSETS, MAX_LEVEL, NEIGHBOR_DELTAS};
use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Address of one cell of the cube-face grid.
///
/// At level `L` each face is split into `2^L x 2^L` cells, addressed by
/// `(i, j)` along the face's s and t axes. The value is immutable and hashes
/// on `(face, i, j, level)`, so it can key sets and maps directly.
///
/// Its canonical text form is `F{face}ij[{i},{j}]@{level}`:
///
/// ```
/// use drone_range::{CellIndex, GeoPoint};
///
/// # fn main() -> Result<(), drone_range::RangeError> {
/// let center = GeoPoint::new(47.6205, -122.3493)?;
/// let cell = CellIndex::from_geo_point(&center, 16)?;
/// assert_eq!(cell.to_string(), "F2ij[51443,59639]@16");
///
/// let parsed: CellIndex = "F2ij[51443,59639]@16".parse()?;
/// assert_eq!(parsed, cell);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CellIndex {
    face: Face,
    i: u32,
    j: u32,
    level: u8,
}

fn check_level(level: u8) -> Result<(), RangeError> {
    if level > MAX_LEVEL {
        return Err(RangeError::InvalidLevel(level));
    }
    Ok(())
}

fn st_to_ij(st: f64, level: u8) -> u32 {
    let max_size = 1u64 << level;
    let ij = (st * max_size as f64).floor();

    ij.clamp(0.0, (max_size - 1) as f64) as u32
}

/// Geographic position of `offset` within the (possibly out-of-range) cell
/// `(i, j)` of `face`.
fn face_ij_to_geo_point(face: Face, i: i64, j: i64, level: u8, offset: (f64, f64)) -> GeoPoint {
    let max_size = (1u64 << level) as f64;
    let s = (i as f64 + offset.0) / max_size;
    let t = (j as f64 + offset.1) / max_size;
    let (u, v) = st_to_uv(s, t);

    to_geo_point(face_uv_to_vector(face, u, v))
}

impl CellIndex {
    /// Creates a cell, validating the level and that `(i, j)` fits in it.
    pub fn new(face: Face, i: u32, j: u32, level: u8) -> Result<Self, RangeError> {
        check_level(level)?;

        let max_size = 1u64 << level;
        if u64::from(i) >= max_size || u64::from(j) >= max_size {
            return Err(RangeError::InvalidCellId(format!(
                "ij [{}, {}] out of range for level {}",
                i, j, level
            )));
        }

        Ok(Self { face, i, j, level })
    }

    /// Returns the cell containing `point` at `level`.
    pub fn from_geo_point(point: &GeoPoint, level: u8) -> Result<Self, RangeError> {
        check_level(level)?;

        let (face, u, v) = vector_to_face_uv(to_unit_vector(point))?;
        let (s, t) = uv_to_st(u, v);

        Ok(Self {
            face,
            i: st_to_ij(s, level),
            j: st_to_ij(t, level),
            level,
        })
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn i(&self) -> u32 {
        self.i
    }

    pub fn j(&self) -> u32 {
        self.j
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Geographic centre of the cell.
    pub fn center(&self) -> GeoPoint {
        face_ij_to_geo_point(
            self.face,
            i64::from(self.i),
            i64::from(self.j),
            self.level,
            CENTER_OFFSET,
        )
    }

    /// The four geographic corners, offsets `(0,0), (0,1), (1,1), (1,0)`.
    pub fn corners(&self) -> [GeoPoint; 4] {
        CORNER_OFFSETS.map(|offset| {
            face_ij_to_geo_point(
                self.face,
                i64::from(self.i),
                i64::from(self.j),
                self.level,
                offset,
            )
        })
    }

    /// The four edge-adjacent cells, in the order left, down, right, up.
    ///
    /// Steps that leave the face are carried over to the adjacent face.
    pub fn neighbors(&self) -> Result<[CellIndex; 4], RangeError> {
        let [a, b, c, d] = NEIGHBOR_DELTAS;
        Ok([
            self.offset_by(a)?,
            self.offset_by(b)?,
            self.offset_by(c)?,
            self.offset_by(d)?,
        ])
    }

    /// Cells reached by stepping `(di, dj)` for each delta.
    ///
    /// Only single-cell steps are reliable across a face boundary: the
    /// off-face position is re-projected from the stepped cell's centre, which
    /// drifts further from the true cell the further the step overshoots.
    pub fn neighbors_with_deltas(
        &self,
        deltas: &[(i64, i64)],
    ) -> Result<Vec<CellIndex>, RangeError> {
        deltas.iter().map(|&delta| self.offset_by(delta)).collect()
    }

    fn offset_by(&self, (di, dj): (i64, i64)) -> Result<CellIndex, RangeError> {
        let max_size = 1i64 << self.level;
        let overflow = || {
            RangeError::InvalidCellId(format!("{} offset by ({}, {}) overflows", self, di, dj))
        };
        let i = i64::from(self.i).checked_add(di).ok_or_else(overflow)?;
        let j = i64::from(self.j).checked_add(dj).ok_or_else(overflow)?;

        if (0..max_size).contains(&i) && (0..max_size).contains(&j) {
            return Ok(Self {
                face: self.face,
                i: i as u32,
                j: j as u32,
                level: self.level,
            });
        }

        // Off the face: treat (i, j) as lying just past the border, lift its
        // centre onto the cube and let the face selection pick it up again.
        let max_size = max_size as f64;
        let s = (i as f64 + CENTER_OFFSET.0) / max_size;
        let t = (j as f64 + CENTER_OFFSET.1) / max_size;
        let (u, v) = st_to_uv(s, t);
        let (face, u, v) = vector_to_face_uv(face_uv_to_vector(self.face, u, v))?;
        let (s, t) = uv_to_st(u, v);

        let wrapped = Self {
            face,
            i: st_to_ij(s, self.level),
            j: st_to_ij(t, self.level),
            level: self.level,
        };
        trace!(from = %self, di, dj, to = %wrapped, "neighbor crossed face boundary");

        Ok(wrapped)
    }

    /// Converts this cell to a closed polygon (corners plus the first corner
    /// repeated), with x = longitude and y = latitude.
    pub fn to_polygon(&self) -> Polygon<f64> {
        let corners = self.corners();
        let mut coords: Vec<Coord<f64>> = corners
            .iter()
            .map(|p| Coord {
                x: p.lng(),
                y: p.lat(),
            })
            .collect();
        coords.push(coords[0]);

        Polygon::new(LineString::from(coords), vec![])
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}ij[{},{}]@{}", self.face, self.i, self.j, self.level)
    }
}

impl FromStr for CellIndex {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RangeError::InvalidCellId(s.to_string());

        let rest = s.trim().strip_prefix('F').ok_or_else(invalid)?;
        let (face, rest) = rest.split_once("ij[").ok_or_else(invalid)?;
        let (ij, level) = rest.split_once("]@").ok_or_else(invalid)?;
        let (i, j) = ij.split_once(',').ok_or_else(invalid)?;

        let face: u8 = face.parse().map_err(|_| invalid())?;
        let i: u32 = i.trim().parse().map_err(|_| invalid())?;
        let j: u32 = j.trim().parse().map_err(|_| invalid())?;
        let level: u8 = level.parse().map_err(|_| invalid())?;

        CellIndex::new(Face::try_from(face)?, i, j, level)
    }
}

impl From<CellIndex> for String {
    fn from(cell: CellIndex) -> Self {
        cell.to_string()
    }
}

impl TryFrom<String> for CellIndex {
    type Error = RangeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
