//! Interpolated local planar frame around an anchor.
//!
//! The frame is not a projection. Each axis is a piecewise-linear map through
//! three knots: the south-west corner, the anchor, and the north-east corner of
//! a square of half-width `domain_radius`. Queries outside the knots fail with
//! `PlanError::Domain`; nothing is extrapolated.

use std::f64::consts::SQRT_2;

use nalgebra::Vector2;

use super::GeoPoint;
use crate::error::{require_positive, PlanError};

/// Relative slack for points that sit on the outermost knots.
const KNOT_SLACK_REL: f64 = 1e-9;

/// Piecewise-linear map through three strictly ascending knots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interp3 {
    xs: [f64; 3],
    ys: [f64; 3],
}

impl Interp3 {
    /// Both tables must be finite and strictly ascending, which keeps the map invertible.
    pub fn new(xs: [f64; 3], ys: [f64; 3]) -> Option<Self> {
        let ascending = |t: &[f64; 3]| t.iter().all(|v| v.is_finite()) && t[0] < t[1] && t[1] < t[2];
        if ascending(&xs) && ascending(&ys) {
            Some(Self { xs, ys })
        } else {
            None
        }
    }

    /// Swap the roles of the two tables.
    #[inline]
    pub fn inverse(&self) -> Interp3 {
        Interp3 {
            xs: self.ys,
            ys: self.xs,
        }
    }

    #[inline]
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[2])
    }

    /// `None` outside `[xs[0], xs[2]]` (up to a tiny relative slack).
    pub fn eval(&self, x: f64) -> Option<f64> {
        let [x0, x1, x2] = self.xs;
        let slack = KNOT_SLACK_REL * (x2 - x0);
        if !x.is_finite() || x < x0 - slack || x > x2 + slack {
            return None;
        }
        let x = x.clamp(x0, x2);
        let i = usize::from(x > x1);
        let t = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        Some(self.ys[i] + t * (self.ys[i + 1] - self.ys[i]))
    }
}

/// Local planar frame: `x` grows east, `y` grows north, both in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalFrame {
    anchor: GeoPoint,
    domain_radius: f64,
    x_of_lon: Interp3,
    y_of_lat: Interp3,
}

impl LocalFrame {
    pub fn new(anchor: GeoPoint, domain_radius: f64) -> Result<Self, PlanError> {
        if !anchor.is_finite() {
            return Err(PlanError::invalid("frame anchor must be finite"));
        }
        require_positive("domain_radius", domain_radius)?;
        let reach = domain_radius * SQRT_2;
        let sw = anchor.destination(reach, 225.0);
        let ne = anchor.destination(reach, 45.0);
        let knots = [-domain_radius, 0.0, domain_radius];
        let x_of_lon = Interp3::new([sw.lon, anchor.lon, ne.lon], knots);
        let y_of_lat = Interp3::new([sw.lat, anchor.lat, ne.lat], knots);
        match (x_of_lon, y_of_lat) {
            (Some(x_of_lon), Some(y_of_lat)) => Ok(Self {
                anchor,
                domain_radius,
                x_of_lon,
                y_of_lat,
            }),
            _ => Err(PlanError::invalid(format!(
                "domain radius {domain_radius} m does not give an invertible frame at ({}, {})",
                anchor.lat, anchor.lon
            ))),
        }
    }

    #[inline]
    pub fn anchor(&self) -> GeoPoint {
        self.anchor
    }

    #[inline]
    pub fn domain_radius(&self) -> f64 {
        self.domain_radius
    }

    pub fn to_planar(&self, p: GeoPoint) -> Result<Vector2<f64>, PlanError> {
        match (self.x_of_lon.eval(p.lon), self.y_of_lat.eval(p.lat)) {
            (Some(x), Some(y)) => Ok(Vector2::new(x, y)),
            _ => Err(PlanError::Domain(format!(
                "({:.7}, {:.7}) is beyond {} m of the anchor",
                p.lat, p.lon, self.domain_radius
            ))),
        }
    }

    pub fn to_geo(&self, p: Vector2<f64>) -> Result<GeoPoint, PlanError> {
        match (self.y_of_lat.inverse().eval(p.y), self.x_of_lon.inverse().eval(p.x)) {
            (Some(lat), Some(lon)) => Ok(GeoPoint::new(lat, lon)),
            _ => Err(PlanError::Domain(format!(
                "planar ({:.3}, {:.3}) is beyond the +/-{} m square",
                p.x, p.y, self.domain_radius
            ))),
        }
    }

    pub fn ring_to_planar(&self, ring: &[GeoPoint]) -> Result<Vec<Vector2<f64>>, PlanError> {
        ring.iter().map(|&p| self.to_planar(p)).collect()
    }

    pub fn path_to_geo(&self, path: &[Vector2<f64>]) -> Result<Vec<GeoPoint>, PlanError> {
        path.iter().map(|&p| self.to_geo(p)).collect()
    }
}
