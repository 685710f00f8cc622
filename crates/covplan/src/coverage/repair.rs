//! Numerical repair and panic-guarded boolean operations.

use std::panic::{self, AssertUnwindSafe};

use geo::{BooleanOps, Buffer, MultiPolygon, Rect};

use crate::error::PlanError;

/// Run a geometry-engine call, turning a panic into `PlanError::Topology`.
pub(crate) fn guarded<T>(what: &str, f: impl FnOnce() -> T) -> Result<T, PlanError> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|_| PlanError::topology(format!("{what} panicked in the geometry engine")))
}

fn all_finite(area: &MultiPolygon<f64>) -> bool {
    area.iter().all(|p| {
        std::iter::once(p.exterior())
            .chain(p.interiors())
            .all(|ring| ring.coords().all(|c| c.x.is_finite() && c.y.is_finite()))
    })
}

/// Grow by `buffer`, then shrink by the same distance.
///
/// Closes slivers and self-touching rings left by coordinate conversion. When
/// the repair fails or returns nothing, the input is returned unchanged.
pub fn repair(area: &MultiPolygon<f64>, buffer: f64) -> MultiPolygon<f64> {
    if buffer <= 0.0 || area.0.is_empty() {
        return area.clone();
    }
    match guarded("buffer repair", || area.buffer(buffer).buffer(-buffer)) {
        Ok(fixed) if !fixed.0.is_empty() && all_finite(&fixed) => fixed,
        Ok(_) => {
            tracing::warn!(buffer, "buffer repair emptied the area; keeping input");
            area.clone()
        }
        Err(e) => {
            tracing::warn!(buffer, error = %e, "buffer repair failed; keeping input");
            area.clone()
        }
    }
}

/// `area ∩ rect`.
pub(crate) fn clip_to_rect(area: &MultiPolygon<f64>, rect: Rect<f64>) -> Result<MultiPolygon<f64>, PlanError> {
    let window = rect.to_polygon();
    let out = guarded("band intersection", || area.intersection(&window))?;
    if all_finite(&out) {
        Ok(out)
    } else {
        Err(PlanError::topology("band intersection produced non-finite coordinates"))
    }
}
