//! Geodetic planning requests.
//!
//! Regions arrive as latitude/longitude rings, go through a [`LocalFrame`]
//! into the planar partitioners, and come back as one waypoint list per agent.
//! Any vertex or waypoint outside the frame domain is a fatal `Domain` error.

use geo::{LineString, Polygon};

use crate::cfg::PlanCfg;
use crate::coverage::{self, AgentId, CoveragePath, PlanarRegion};
use crate::error::{require_positive, PlanError};
use crate::geodesy::{GeoPoint, LocalFrame};
use crate::rotation::SweepAngle;

/// A survey region in geodetic coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub exterior: Vec<GeoPoint>,
    pub holes: Vec<Vec<GeoPoint>>,
    pub sweep: SweepAngle,
    /// Scan-line spacing in metres.
    pub spacing: f64,
}

impl Region {
    pub fn new(exterior: Vec<GeoPoint>, spacing: f64) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
            sweep: SweepAngle::default(),
            spacing,
        }
    }

    pub fn with_holes(mut self, holes: Vec<Vec<GeoPoint>>) -> Self {
        self.holes = holes;
        self
    }

    pub fn with_sweep(mut self, sweep: SweepAngle) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn to_planar(&self, frame: &LocalFrame) -> Result<PlanarRegion, PlanError> {
        if self.exterior.len() < 3 {
            return Err(PlanError::invalid(format!(
                "region exterior needs at least 3 vertices, got {}",
                self.exterior.len()
            )));
        }
        require_positive("spacing", self.spacing)?;
        let ring = |pts: &[GeoPoint]| -> Result<LineString<f64>, PlanError> {
            Ok(frame
                .ring_to_planar(pts)?
                .into_iter()
                .map(|p| (p.x, p.y))
                .collect::<Vec<_>>()
                .into())
        };
        let holes = self
            .holes
            .iter()
            .filter(|h| h.len() >= 3)
            .map(|h| ring(h.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;
        let polygon = Polygon::new(ring(self.exterior.as_slice())?, holes);
        Ok(PlanarRegion::new(polygon, self.spacing).with_sweep(self.sweep))
    }
}

/// Parallel-list region assembly.
///
/// `holes` may be omitted; when given it needs one entry per exterior.
/// `spacings` holds one value per exterior, or a single value for all.
pub fn zip_regions(
    exteriors: Vec<Vec<GeoPoint>>,
    holes: Option<Vec<Vec<Vec<GeoPoint>>>>,
    spacings: &[f64],
    sweep: SweepAngle,
) -> Result<Vec<Region>, PlanError> {
    let n = exteriors.len();
    if let Some(h) = &holes {
        if h.len() != n {
            return Err(PlanError::ParameterLengthMismatch {
                what: "holes",
                got: h.len(),
                expected: n,
            });
        }
    }
    let spacing_at = |i: usize| match spacings.len() {
        1 => Ok(spacings[0]),
        len if len == n => Ok(spacings[i]),
        len => Err(PlanError::ParameterLengthMismatch {
            what: "spacings",
            got: len,
            expected: n,
        }),
    };
    let mut holes = holes.map(|h| h.into_iter());
    exteriors
        .into_iter()
        .enumerate()
        .map(|(i, ext)| {
            let region = Region::new(ext, spacing_at(i)?).with_sweep(sweep);
            Ok(match holes.as_mut().and_then(Iterator::next) {
                Some(h) => region.with_holes(h),
                None => region,
            })
        })
        .collect()
}

/// Waypoints for one agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentPath {
    pub agent: AgentId,
    pub path: Vec<GeoPoint>,
    /// Region vertex nearest the strip's centre, where the agent may enter.
    pub entry: Option<GeoPoint>,
}

/// Spread `agent_count` agents evenly over `regions`.
#[derive(Clone, Debug, PartialEq)]
pub struct FairRequest {
    pub regions: Vec<Region>,
    pub agent_count: usize,
}

/// Each region names the agents that sweep it.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplicitRequest {
    pub regions: Vec<(Region, Vec<AgentId>)>,
    pub agent_count: usize,
}

impl ExplicitRequest {
    /// Pair regions with id lists given as parallel vectors.
    ///
    /// `spacings`, when given, overrides each region's spacing (one per region or one for all).
    pub fn from_parallel(
        regions: Vec<Region>,
        assignments: Vec<Vec<AgentId>>,
        spacings: Option<&[f64]>,
        agent_count: usize,
    ) -> Result<Self, PlanError> {
        if assignments.len() != regions.len() {
            return Err(PlanError::ParameterLengthMismatch {
                what: "assignments",
                got: assignments.len(),
                expected: regions.len(),
            });
        }
        let mut regions = regions;
        if let Some(s) = spacings {
            if s.len() != 1 && s.len() != regions.len() {
                return Err(PlanError::ParameterLengthMismatch {
                    what: "spacings",
                    got: s.len(),
                    expected: regions.len(),
                });
            }
            for (i, r) in regions.iter_mut().enumerate() {
                r.spacing = if s.len() == 1 { s[0] } else { s[i] };
            }
        }
        Ok(Self {
            regions: regions.into_iter().zip(assignments).collect(),
            agent_count,
        })
    }
}

fn to_agent_paths(frame: &LocalFrame, paths: Vec<CoveragePath>) -> Result<Vec<AgentPath>, PlanError> {
    paths
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let agent = AgentId::try_from(i + 1)
                .map_err(|_| PlanError::invalid("agent count exceeds id range"))?;
            Ok(AgentPath {
                agent,
                path: frame.path_to_geo(&p.points)?,
                entry: p.entry.map(|e| frame.to_geo(e)).transpose()?,
            })
        })
        .collect()
}

/// Fair split over geodetic regions; `result[i]` belongs to agent `i + 1`.
pub fn plan_fair(frame: &LocalFrame, req: &FairRequest, cfg: &PlanCfg) -> Result<Vec<AgentPath>, PlanError> {
    let planar = req
        .regions
        .iter()
        .map(|r| r.to_planar(frame))
        .collect::<Result<Vec<_>, _>>()?;
    let paths = coverage::partition_fair(&planar, req.agent_count, cfg)?;
    tracing::info!(
        regions = planar.len(),
        agents = req.agent_count,
        empty = paths.iter().filter(|p| p.is_empty()).count(),
        "fair plan ready"
    );
    to_agent_paths(frame, paths)
}

/// Explicit split over geodetic regions; `result[id - 1]` belongs to agent `id`.
pub fn plan_explicit(frame: &LocalFrame, req: &ExplicitRequest, cfg: &PlanCfg) -> Result<Vec<AgentPath>, PlanError> {
    coverage::validate_assignment(req.regions.iter().map(|(_, ids)| ids.as_slice()), req.agent_count)?;
    let planar = req
        .regions
        .iter()
        .map(|(r, ids)| Ok((r.to_planar(frame)?, ids.clone())))
        .collect::<Result<Vec<_>, PlanError>>()?;
    let paths = coverage::partition_explicit(&planar, req.agent_count, cfg)?;
    tracing::info!(
        regions = planar.len(),
        agents = req.agent_count,
        empty = paths.iter().filter(|p| p.is_empty()).count(),
        "explicit plan ready"
    );
    to_agent_paths(frame, paths)
}
