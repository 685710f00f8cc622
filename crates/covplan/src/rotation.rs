//! Sweep-angle resolution and the homogeneous rotation pair.
//!
//! Conventions
//! - A sweep angle is a bearing in degrees: 0° sweeps north-south, 90° east-west.
//! - `Rotation::new(θ)` turns the plane counter-clockwise by θ, so scan lines of
//!   bearing θ become vertical. `rotate_back` undoes it.
//! - Matrices are 3×3 homogeneous; the inverse is the transpose.

use geo::{LineString, MapCoords, MultiPolygon};
use nalgebra::{Matrix3, Vector2, Vector3};

/// Requested sweep direction for a region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SweepAngle {
    /// Bearing in `[0, 360]`.
    Degrees(f64),
    /// Sweep parallel to the longest exterior edge.
    Auto,
}

impl Default for SweepAngle {
    fn default() -> Self {
        SweepAngle::Degrees(0.0)
    }
}

impl SweepAngle {
    /// Values in `[0, 360]` are explicit; anything else (e.g. `-1`) selects `Auto`.
    pub fn from_degrees(deg: f64) -> Self {
        if (0.0..=360.0).contains(&deg) {
            SweepAngle::Degrees(deg)
        } else {
            SweepAngle::Auto
        }
    }

    /// Bearing to sweep `exterior` with.
    pub fn resolve(&self, exterior: &LineString<f64>) -> f64 {
        match *self {
            SweepAngle::Degrees(deg) => deg,
            SweepAngle::Auto => bearing_parallel_to(longest_edge_angle(exterior)),
        }
    }
}

/// `atan2(dy, dx)` in degrees of the longest edge of a closed ring; `0` for degenerate rings.
pub fn longest_edge_angle(ring: &LineString<f64>) -> f64 {
    let mut best = (0.0f64, 0.0f64);
    for line in ring.lines() {
        let d = line.delta();
        let len2 = d.x * d.x + d.y * d.y;
        if len2 > best.0 {
            best = (len2, d.y.atan2(d.x).to_degrees());
        }
    }
    best.1
}

/// Sweep bearing whose scan lines run along direction `angle_deg` (measured from +x).
#[inline]
pub fn bearing_parallel_to(angle_deg: f64) -> f64 {
    90.0 - angle_deg
}

/// Rotation by a sweep bearing and its inverse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    bearing: f64,
    fwd: Matrix3<f64>,
    inv: Matrix3<f64>,
}

impl Rotation {
    pub fn new(bearing_deg: f64) -> Self {
        let (s, c) = bearing_deg.to_radians().sin_cos();
        #[rustfmt::skip]
        let fwd = Matrix3::new(
            c, -s, 0.0,
            s,  c, 0.0,
            0.0, 0.0, 1.0,
        );
        Self {
            bearing: bearing_deg,
            fwd,
            inv: fwd.transpose(),
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(0.0)
    }

    #[inline]
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.fwd
    }

    #[inline]
    pub fn inverse_matrix(&self) -> &Matrix3<f64> {
        &self.inv
    }

    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        homogeneous(&self.fwd, p)
    }

    #[inline]
    pub fn apply_inverse(&self, p: Vector2<f64>) -> Vector2<f64> {
        homogeneous(&self.inv, p)
    }

    pub fn rotate(&self, pts: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
        pts.iter().map(|&p| self.apply(p)).collect()
    }

    pub fn rotate_back(&self, pts: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
        pts.iter().map(|&p| self.apply_inverse(p)).collect()
    }

    pub fn rotate_area(&self, area: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        map_area(&self.fwd, area)
    }

    pub fn rotate_area_back(&self, area: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        map_area(&self.inv, area)
    }
}

#[inline]
fn homogeneous(m: &Matrix3<f64>, p: Vector2<f64>) -> Vector2<f64> {
    let h = m * Vector3::new(p.x, p.y, 1.0);
    Vector2::new(h.x, h.y)
}

fn map_area(m: &Matrix3<f64>, area: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    area.map_coords(|c| {
        let q = homogeneous(m, Vector2::new(c.x, c.y));
        geo::coord! { x: q.x, y: q.y }
    })
}
