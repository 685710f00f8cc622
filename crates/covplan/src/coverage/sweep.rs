//! Single-polygon boustrophedon planner.

use geo::{BoundingRect, Centroid, MultiPolygon, Polygon};
use nalgebra::Vector2;

use super::repair::repair;
use super::scan::{scan_line_segments, Segment};
use super::types::CoveragePath;
use crate::cfg::{PlanCfg, MAX_SCAN_LINES};
use crate::error::{require_positive, PlanError};
use crate::rotation::Rotation;

/// Scan-line lattice for one sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepParams {
    pub spacing: f64,
    /// Lattice origin in the rotated frame; `None` uses the polygon's own `minX`.
    pub anchor_x: Option<f64>,
}

impl SweepParams {
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            anchor_x: None,
        }
    }

    pub fn anchored(spacing: f64, anchor_x: f64) -> Self {
        Self {
            spacing,
            anchor_x: Some(anchor_x),
        }
    }
}

/// Lattice positions `anchor + k·spacing` falling within `[min_x, max_x]`.
///
/// Positions on (or within tolerance of) the box edge move inside by the
/// configured inset so runs along the boundary are kept.
pub fn scan_positions(min_x: f64, max_x: f64, params: SweepParams, cfg: &PlanCfg) -> Result<Vec<f64>, PlanError> {
    require_positive("spacing", params.spacing)?;
    if !(min_x.is_finite() && max_x.is_finite()) || max_x < min_x {
        return Err(PlanError::invalid(format!("bad scan range [{min_x}, {max_x}]")));
    }
    let span = max_x - min_x;
    let eps = cfg.eps_for(span);
    let inset = (cfg.edge_inset_rel * span.max(1.0)).min(span / 4.0);
    let anchor = params.anchor_x.unwrap_or(min_x);
    let k0 = ((min_x - eps - anchor) / params.spacing).ceil();
    let k1 = ((max_x + eps - anchor) / params.spacing).floor();
    if !(k0.is_finite() && k1.is_finite()) || k1 - k0 >= MAX_SCAN_LINES as f64 {
        return Err(PlanError::invalid(format!(
            "spacing {} over width {span} needs too many scan lines",
            params.spacing
        )));
    }
    let (k0, k1) = (k0 as i64, k1 as i64);
    Ok((k0..=k1)
        .map(|k| (anchor + k as f64 * params.spacing).clamp(min_x + inset, max_x - inset))
        .collect())
}

/// Join segments into one path, reversing every other segment.
pub fn boustrophedon(segments: &[Segment]) -> Vec<Vector2<f64>> {
    let mut path = Vec::with_capacity(segments.len() * 2);
    for (i, &(a, b)) in segments.iter().enumerate() {
        if i % 2 == 0 {
            path.extend([a, b]);
        } else {
            path.extend([b, a]);
        }
    }
    path
}

/// Exterior vertex closest to `from` (first one on ties).
fn nearest_vertex(poly: &Polygon<f64>, from: Vector2<f64>) -> Option<Vector2<f64>> {
    poly.exterior()
        .coords()
        .map(|c| Vector2::new(c.x, c.y))
        .min_by(|a, b| (a - from).norm_squared().total_cmp(&(b - from).norm_squared()))
}

/// Boustrophedon path over `area`, which is already in the rotated frame.
///
/// The returned points are mapped back through `rotation`. `initial_position`
/// (rotated frame, default: centroid) only selects the reported entry vertex.
/// Scan lines that fail topologically are skipped with a warning.
pub fn plan_sweep(
    area: &Polygon<f64>,
    params: SweepParams,
    initial_position: Option<Vector2<f64>>,
    rotation: &Rotation,
    cfg: &PlanCfg,
) -> Result<CoveragePath, PlanError> {
    require_positive("spacing", params.spacing)?;
    let fixed = repair(&MultiPolygon::new(vec![area.clone()]), cfg.repair_buffer);
    let Some(bbox) = fixed.bounding_rect() else {
        return Ok(CoveragePath::default());
    };
    let (min, max) = (bbox.min(), bbox.max());
    let tol = cfg.eps_for((max.x - min.x).max(max.y - min.y)) / 2.0;

    let mut segments: Vec<Segment> = Vec::new();
    for x in scan_positions(min.x, max.x, params, cfg)? {
        match scan_line_segments(&fixed, x, tol) {
            Ok(runs) => segments.extend(runs),
            Err(e) => tracing::warn!(x, error = %e, "skipping scan line"),
        }
    }
    segments.sort_by(|a, b| a.0.x.total_cmp(&b.0.x));

    let points = rotation.rotate_back(&boustrophedon(&segments));
    let from = initial_position.or_else(|| {
        area.centroid()
            .map(|c| Vector2::new(c.x(), c.y()))
    });
    let entry = from
        .and_then(|p| nearest_vertex(area, p))
        .map(|v| rotation.apply_inverse(v));
    Ok(CoveragePath { points, entry })
}
