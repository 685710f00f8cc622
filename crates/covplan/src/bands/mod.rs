//! Rectangular band fast path.
//!
//! Purpose
//! - Cover a square of side `W` around a center by `N` horizontal bands, one
//!   per agent, using only destination/bearing steps (no local frame).
//! - Spread agents over several centers round-robin, or by explicit id lists.
//!
//! Assumptions and conventions
//! - Rows run west to east, then east to west, alternating, `s` metres apart.
//! - Optional turnaround waypoints extend each row for fixed-wing agents.

use crate::cfg::MAX_BAND_ROWS;
use crate::coverage::{validate_assignment, AgentId};
use crate::error::{require_positive, PlanError};
use crate::geodesy::GeoPoint;
use crate::plan::AgentPath;


/// Latitude slack (degrees) when comparing a row against the band's north edge.
const ROW_LAT_EPS: f64 = 1e-9;
/// Bearing of the turnaround leg after a west→east row.
const TURN_AFTER_EASTBOUND: f64 = 135.0;
/// Bearing of the turnaround leg after an east→west row.
const TURN_AFTER_WESTBOUND: f64 = 225.0;

/// Band layout options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandCfg {
    /// Length (m) of a turnaround leg appended after each row.
    pub turnaround: Option<f64>,
    /// Empty space (m) between neighbouring bands.
    pub band_gap: f64,
}

impl Default for BandCfg {
    fn default() -> Self {
        Self {
            turnaround: None,
            band_gap: 0.0,
        }
    }
}

impl BandCfg {
    /// Fixed-wing layout: 250 m turnaround legs and a 50 m gap between bands.
    pub fn fixed_wing() -> Self {
        Self {
            turnaround: Some(250.0),
            band_gap: 50.0,
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if let Some(t) = self.turnaround {
            require_positive("turnaround", t)?;
        }
        if !self.band_gap.is_finite() || self.band_gap < 0.0 {
            return Err(PlanError::invalid(format!(
                "band_gap must be finite and non-negative, got {}",
                self.band_gap
            )));
        }
        Ok(())
    }
}

/// One center, `agent_count` bands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandRequest {
    pub center: GeoPoint,
    /// Side of the covered square in metres.
    pub side_length: f64,
    pub agent_count: usize,
    pub spacing: f64,
}

/// Several centers sharing the same square size and spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiBandRequest {
    pub centers: Vec<GeoPoint>,
    pub agent_count: usize,
    pub side_length: f64,
    pub spacing: f64,
}

/// A center with its own agents, square size and spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct BandSite {
    pub center: GeoPoint,
    pub agents: Vec<AgentId>,
    pub side_length: f64,
    pub spacing: f64,
}

/// Agent `i` goes to bucket `i mod buckets`; returns per-bucket counts.
pub fn distribute_round_robin(total: usize, buckets: usize) -> Vec<usize> {
    let mut counts = vec![0; buckets];
    if buckets == 0 {
        return counts;
    }
    for i in 0..total {
        counts[i % buckets] += 1;
    }
    counts
}

/// Boustrophedon rows for each of `req.agent_count` bands, south band first.
pub fn plan_bands(req: &BandRequest, cfg: &BandCfg) -> Result<Vec<Vec<GeoPoint>>, PlanError> {
    cfg.validate()?;
    if !req.center.is_finite() {
        return Err(PlanError::invalid("band center must be finite"));
    }
    require_positive("side_length", req.side_length)?;
    require_positive("spacing", req.spacing)?;
    let n = req.agent_count;
    if n == 0 {
        return Ok(Vec::new());
    }
    let side = req.side_length;
    let band_h = (side - cfg.band_gap * (n - 1) as f64) / n as f64;
    if band_h <= 0.0 {
        return Err(PlanError::invalid(format!(
            "{n} bands with {} m gaps do not fit in {side} m",
            cfg.band_gap
        )));
    }
    let west = req.center.destination(side / 2.0, 270.0);
    (0..n)
        .map(|i| {
            // Northward offset of the band's mid-line from the center.
            let offset = i as f64 * (band_h + cfg.band_gap) - side / 2.0 + band_h / 2.0;
            let mid = req.center.destination(offset, 0.0);
            let north = mid.destination(band_h / 2.0, 0.0);
            let south = mid.destination(band_h / 2.0, 180.0);
            band_rows(south.lat, north.lat, west.lon, side, req.spacing, cfg)
        })
        .collect()
}

fn band_rows(
    south_lat: f64,
    north_lat: f64,
    west_lon: f64,
    width: f64,
    spacing: f64,
    cfg: &BandCfg,
) -> Result<Vec<GeoPoint>, PlanError> {
    let mut rows = Vec::new();
    let mut lat = south_lat;
    let mut row = 0usize;
    while lat <= north_lat + ROW_LAT_EPS {
        if row >= MAX_BAND_ROWS {
            return Err(PlanError::invalid(format!(
                "spacing {spacing} m needs more than {MAX_BAND_ROWS} rows"
            )));
        }
        let w = GeoPoint::new(lat, west_lon);
        let e = w.destination(width, 90.0);
        if row % 2 == 0 {
            rows.extend([w, e]);
            if let Some(t) = cfg.turnaround {
                rows.push(e.destination(t, TURN_AFTER_EASTBOUND));
            }
        } else {
            rows.extend([e, w]);
            if let Some(t) = cfg.turnaround {
                rows.push(w.destination(t, TURN_AFTER_WESTBOUND));
            }
        }
        let next = w.destination(spacing, 0.0).lat;
        if next <= lat {
            return Err(PlanError::invalid(format!("rows stop advancing north at latitude {lat}")));
        }
        lat = next;
        row += 1;
    }
    Ok(rows)
}

/// Round-robin agents over several centers; centers left without agents are skipped.
///
/// Agent ids are consecutive across centers in center order.
pub fn plan_band_groups(req: &MultiBandRequest, cfg: &BandCfg) -> Result<Vec<AgentPath>, PlanError> {
    if req.centers.is_empty() && req.agent_count > 0 {
        return Err(PlanError::invalid(format!(
            "no centers to share {} agents",
            req.agent_count
        )));
    }
    let counts = distribute_round_robin(req.agent_count, req.centers.len());
    let mut out = Vec::with_capacity(req.agent_count);
    for (ci, (&center, &count)) in req.centers.iter().zip(&counts).enumerate() {
        if count == 0 {
            tracing::debug!(center = ci, "no agents for center");
            continue;
        }
        let bands = plan_bands(
            &BandRequest {
                center,
                side_length: req.side_length,
                agent_count: count,
                spacing: req.spacing,
            },
            cfg,
        )?;
        for path in bands {
            let agent = AgentId::try_from(out.len() + 1)
                .map_err(|_| PlanError::invalid("agent count exceeds id range"))?;
            out.push(AgentPath {
                agent,
                path,
                entry: None,
            });
        }
    }
    Ok(out)
}

/// Explicit per-site agent lists; `result[id - 1]` belongs to agent `id`.
pub fn plan_band_sites(sites: &[BandSite], agent_count: usize, cfg: &BandCfg) -> Result<Vec<AgentPath>, PlanError> {
    validate_assignment(sites.iter().map(|s| s.agents.as_slice()), agent_count)?;
    let mut out: Vec<AgentPath> = (1..=agent_count)
        .map(|id| AgentPath {
            agent: id as AgentId,
            path: Vec::new(),
            entry: None,
        })
        .collect();
    for site in sites.iter().filter(|s| !s.agents.is_empty()) {
        let bands = plan_bands(
            &BandRequest {
                center: site.center,
                side_length: site.side_length,
                agent_count: site.agents.len(),
                spacing: site.spacing,
            },
            cfg,
        )?;
        for (&id, path) in site.agents.iter().zip(bands) {
            out[id as usize - 1].path = path;
        }
    }
    Ok(out)
}
