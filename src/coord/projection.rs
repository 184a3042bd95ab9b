//! Projection between geographic coordinates, unit vectors and cube-face
//! (u, v) / (s, t) coordinates.
//!
//! The sphere is wrapped in an axis-aligned cube. A unit vector belongs to the
//! face whose axis carries its largest absolute component; dividing the other
//! two components by that one gives planar (u, v) in `[-1, 1]`. The (s, t)
//! warp then maps (u, v) into `[0, 1]` so that cells near the face edges are
//! not much smaller than those near the face centre.

use super::GeoPoint;
use crate::error::RangeError;
use glam::DVec3;
use std::f64::consts::PI;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// One of the six faces of the cube circumscribing the sphere.
///
/// Faces 0-2 sit on the positive x, y and z axes, faces 3-5 on the negative
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Face {
    PosX = 0,
    PosY = 1,
    PosZ = 2,
    NegX = 3,
    NegY = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::PosY,
        Face::PosZ,
        Face::NegX,
        Face::NegY,
        Face::NegZ,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Face {
    type Error = RangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Face::PosX),
            1 => Ok(Face::PosY),
            2 => Ok(Face::PosZ),
            3 => Ok(Face::NegX),
            4 => Ok(Face::NegY),
            5 => Ok(Face::NegZ),
            other => Err(RangeError::InvalidFace(other)),
        }
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Converts a geographic point to a unit vector.
///
/// `x` points at (0°, 0°), `y` at (0°, 90°E) and `z` at the north pole.
pub fn to_unit_vector(point: &GeoPoint) -> DVec3 {
    let phi = point.lat() * DEG_TO_RAD;
    let theta = point.lng() * DEG_TO_RAD;
    let cos_phi = phi.cos();

    DVec3::new(theta.cos() * cos_phi, theta.sin() * cos_phi, phi.sin())
}

/// Converts a (not necessarily normalised) vector back to latitude/longitude.
pub fn to_geo_point(xyz: DVec3) -> GeoPoint {
    let lat = xyz.z.atan2((xyz.x * xyz.x + xyz.y * xyz.y).sqrt());
    let lng = xyz.y.atan2(xyz.x);

    GeoPoint {
        lat: lat * RAD_TO_DEG,
        lng: lng * RAD_TO_DEG,
    }
}

/// Axis (0 = x, 1 = y, 2 = z) of the component with the largest magnitude.
///
/// Ties resolve towards z, then y: x only wins when strictly larger than both.
fn largest_abs_component(xyz: DVec3) -> u8 {
    let abs = xyz.abs();

    if abs.x > abs.y {
        if abs.x > abs.z { 0 } else { 2 }
    } else if abs.y > abs.z {
        1
    } else {
        2
    }
}

fn face_xyz_to_uv(face: Face, xyz: DVec3) -> (f64, f64) {
    let DVec3 { x, y, z } = xyz;

    match face {
        Face::PosX => (y / x, z / x),
        Face::PosY => (-x / y, z / y),
        Face::PosZ => (-x / z, -y / z),
        Face::NegX => (z / x, y / x),
        Face::NegY => (z / y, -x / y),
        Face::NegZ => (-y / z, -x / z),
    }
}

/// Selects the cube face for `xyz` and projects it to that face's (u, v).
pub fn vector_to_face_uv(xyz: DVec3) -> Result<(Face, f64, f64), RangeError> {
    let axis = largest_abs_component(xyz);
    let negative = xyz[axis as usize] < 0.0;
    let face = Face::try_from(if negative { axis + 3 } else { axis })?;
    let (u, v) = face_xyz_to_uv(face, xyz);

    Ok((face, u, v))
}

/// Inverse of [`vector_to_face_uv`]; the result lies on the cube surface, not
/// the unit sphere.
pub fn face_uv_to_vector(face: Face, u: f64, v: f64) -> DVec3 {
    match face {
        Face::PosX => DVec3::new(1.0, u, v),
        Face::PosY => DVec3::new(-u, 1.0, v),
        Face::PosZ => DVec3::new(-u, -v, 1.0),
        Face::NegX => DVec3::new(-1.0, -v, -u),
        Face::NegY => DVec3::new(v, -1.0, -u),
        Face::NegZ => DVec3::new(v, u, -1.0),
    }
}

fn single_uv_to_st(uv: f64) -> f64 {
    if uv >= 0.0 {
        0.5 * (1.0 + 3.0 * uv).sqrt()
    } else {
        1.0 - 0.5 * (1.0 - 3.0 * uv).sqrt()
    }
}

fn single_st_to_uv(st: f64) -> f64 {
    if st >= 0.5 {
        (1.0 / 3.0) * (4.0 * st * st - 1.0)
    } else {
        (1.0 / 3.0) * (1.0 - 4.0 * (1.0 - st) * (1.0 - st))
    }
}

/// Quadratic warp from face coordinates `[-1, 1]` to `[0, 1]`.
pub fn uv_to_st(u: f64, v: f64) -> (f64, f64) {
    (single_uv_to_st(u), single_uv_to_st(v))
}

/// Inverse of [`uv_to_st`].
pub fn st_to_uv(s: f64, t: f64) -> (f64, f64) {
    (single_st_to_uv(s), single_st_to_uv(t))
}
