use geo::{MultiPolygon, Polygon};
use nalgebra::Vector2;

use crate::rotation::SweepAngle;

/// Agent identifier, `1..=N`.
pub type AgentId = u32;

/// A region in the local planar frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarRegion {
    pub polygon: Polygon<f64>,
    pub sweep: SweepAngle,
    /// Distance between neighbouring scan lines, metres.
    pub spacing: f64,
}

impl PlanarRegion {
    pub fn new(polygon: Polygon<f64>, spacing: f64) -> Self {
        Self {
            polygon,
            sweep: SweepAngle::default(),
            spacing,
        }
    }

    pub fn with_sweep(mut self, sweep: SweepAngle) -> Self {
        self.sweep = sweep;
        self
    }
}

/// Sub-area assigned to one agent, in the rotated frame of its region.
#[derive(Clone, Debug, PartialEq)]
pub struct Strip {
    pub parts: MultiPolygon<f64>,
}

impl Strip {
    pub fn empty() -> Self {
        Self {
            parts: MultiPolygon::new(Vec::new()),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.0.is_empty()
    }
}

/// Waypoints for one agent in the unrotated planar frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoveragePath {
    pub points: Vec<Vector2<f64>>,
    /// Exterior vertex nearest to the requested initial position.
    pub entry: Option<Vector2<f64>>,
}

impl CoveragePath {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn length(&self) -> f64 {
        crate::polyline_length(&self.points)
    }

    /// Append another path; keeps the first known entry vertex.
    pub fn extend(&mut self, other: CoveragePath) {
        self.points.extend(other.points);
        if self.entry.is_none() {
            self.entry = other.entry;
        }
    }
}
