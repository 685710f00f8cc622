//! Vertical scan-line clipping under the even-odd rule.

use geo::MultiPolygon;
use nalgebra::Vector2;

use crate::error::PlanError;

/// A scan-line run, stored bottom to top.
pub type Segment = (Vector2<f64>, Vector2<f64>);

/// Interior intervals of the line `x = c` with the half-open rule
/// `(p.x > c) != (q.x > c)`, so a vertex on the line counts once.
fn side_runs(area: &MultiPolygon<f64>, c: f64) -> Result<Vec<(f64, f64)>, PlanError> {
    let mut ys: Vec<f64> = Vec::new();
    for poly in area.iter() {
        for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
            for line in ring.lines() {
                let (p, q) = (line.start, line.end);
                if (p.x > c) != (q.x > c) {
                    let y = p.y + (c - p.x) * (q.y - p.y) / (q.x - p.x);
                    if !y.is_finite() {
                        return Err(PlanError::topology(format!("non-finite crossing at x = {c}")));
                    }
                    ys.push(y);
                }
            }
        }
    }
    if ys.len() % 2 != 0 {
        return Err(PlanError::topology(format!(
            "{} crossings at x = {c}; rings are not closed",
            ys.len()
        )));
    }
    ys.sort_by(f64::total_cmp);
    Ok(ys.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
}

/// Runs of the line `x = c` inside or touching `area`, ordered bottom to top.
///
/// The line is evaluated at `c - tol` and `c + tol` and the two run sets are
/// merged, so boundary stretches lying on `x = c` are kept whichever side the
/// area is on, and runs meeting end to end become one. Merged runs no longer
/// than `tol` are dropped. A non-finite crossing or an odd crossing count is
/// reported as `PlanError::Topology`.
pub fn scan_line_segments(area: &MultiPolygon<f64>, c: f64, tol: f64) -> Result<Vec<Segment>, PlanError> {
    let mut runs = side_runs(area, c - tol)?;
    runs.extend(side_runs(area, c + tol)?);
    runs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(runs.len());
    for (lo, hi) in runs {
        match merged.last_mut() {
            Some(last) if lo <= last.1 + tol => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }
    Ok(merged
        .into_iter()
        .filter(|(lo, hi)| hi - lo > tol)
        .map(|(lo, hi)| (Vector2::new(c, lo), Vector2::new(c, hi)))
        .collect())
}
