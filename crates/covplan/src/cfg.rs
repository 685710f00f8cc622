//! Planner tolerances and repair knobs.

use crate::error::PlanError;

/// Upper bound on scan lines per polygon.
pub(crate) const MAX_SCAN_LINES: i64 = 1_000_000;
/// Upper bound on rows per band in the rectangular fast path.
pub(crate) const MAX_BAND_ROWS: usize = 1_000_000;

/// Numeric configuration shared by the planar planners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanCfg {
    /// Grow-then-shrink distance (planar metres) applied before boolean ops. `0` disables repair.
    pub repair_buffer: f64,
    /// Width added to each band's right edge in explicit partitioning.
    pub band_overlap: f64,
    /// Lattice membership tolerance as a fraction of the bounding-box span.
    pub eps_rel: f64,
    /// Scan lines on a bounding-box edge move inside by this fraction of the span.
    pub edge_inset_rel: f64,
}

impl Default for PlanCfg {
    fn default() -> Self {
        Self {
            repair_buffer: 0.5,
            band_overlap: 1e-4,
            eps_rel: 1e-6,
            edge_inset_rel: 1e-6,
        }
    }
}

impl PlanCfg {
    pub fn validate(&self) -> Result<(), PlanError> {
        let fields = [
            ("repair_buffer", self.repair_buffer),
            ("band_overlap", self.band_overlap),
            ("eps_rel", self.eps_rel),
            ("edge_inset_rel", self.edge_inset_rel),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v < 0.0 {
                return Err(PlanError::invalid(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        if self.edge_inset_rel >= 0.25 {
            return Err(PlanError::invalid("edge_inset_rel must stay below 0.25"));
        }
        Ok(())
    }

    /// Absolute tolerance for a box of the given span.
    #[inline]
    pub(crate) fn eps_for(&self, span: f64) -> f64 {
        self.eps_rel * span.max(1.0)
    }
}
