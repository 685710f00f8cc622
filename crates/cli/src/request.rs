//! JSON request documents for the CLI.
//!
//! Points are `[lat, lon]` pairs in degrees. Missing `sweep_angle` means auto;
//! values outside `[0, 360]` also select auto.

use covplan::bands::{BandCfg, BandSite, MultiBandRequest};
use covplan::coverage::AgentId;
use covplan::plan::{zip_regions, ExplicitRequest, FairRequest};
use covplan::rotation::SweepAngle;
use covplan::{GeoPoint, LocalFrame, PlanCfg, PlanError};
use serde::{Deserialize, Serialize};

type LatLon = [f64; 2];

fn geo(p: &LatLon) -> GeoPoint {
    GeoPoint::new(p[0], p[1])
}

fn ring(pts: &[LatLon]) -> Vec<GeoPoint> {
    pts.iter().map(geo).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginDoc {
    pub lat: f64,
    pub lon: f64,
    pub domain_radius: f64,
}

impl OriginDoc {
    pub fn frame(&self) -> Result<LocalFrame, PlanError> {
        LocalFrame::new(GeoPoint::new(self.lat, self.lon), self.domain_radius)
    }
}

/// Optional overrides of [`PlanCfg`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CfgDoc {
    pub repair_buffer: Option<f64>,
    pub band_overlap: Option<f64>,
}

impl CfgDoc {
    pub fn apply(&self) -> PlanCfg {
        let base = PlanCfg::default();
        PlanCfg {
            repair_buffer: self.repair_buffer.unwrap_or(base.repair_buffer),
            band_overlap: self.band_overlap.unwrap_or(base.band_overlap),
            ..base
        }
    }
}

/// Regions as parallel lists, one entry per region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionsDoc {
    pub polygons: Vec<Vec<LatLon>>,
    /// Hole rings per region; omit for none.
    #[serde(default)]
    pub holes: Option<Vec<Vec<Vec<LatLon>>>>,
    /// One spacing for all regions, or one per region.
    pub spacings: Vec<f64>,
    #[serde(default)]
    pub sweep_angle: Option<f64>,
}

impl RegionsDoc {
    fn sweep(&self) -> SweepAngle {
        self.sweep_angle.map_or(SweepAngle::Auto, SweepAngle::from_degrees)
    }

    fn regions(&self) -> Result<Vec<covplan::plan::Region>, PlanError> {
        let exteriors = self.polygons.iter().map(|p| ring(p)).collect();
        let holes = self
            .holes
            .as_ref()
            .map(|hs| hs.iter().map(|h| h.iter().map(|r| ring(r)).collect()).collect());
        zip_regions(exteriors, holes, &self.spacings, self.sweep())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairDoc {
    pub origin: OriginDoc,
    #[serde(flatten)]
    pub regions: RegionsDoc,
    pub agent_count: usize,
    #[serde(default)]
    pub cfg: CfgDoc,
}

impl FairDoc {
    pub fn request(&self) -> Result<FairRequest, PlanError> {
        Ok(FairRequest {
            regions: self.regions.regions()?,
            agent_count: self.agent_count,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplicitDoc {
    pub origin: OriginDoc,
    #[serde(flatten)]
    pub regions: RegionsDoc,
    /// Agent ids per region, parallel to `polygons`.
    pub assignments: Vec<Vec<AgentId>>,
    pub agent_count: usize,
    #[serde(default)]
    pub cfg: CfgDoc,
}

impl ExplicitDoc {
    pub fn request(&self) -> Result<ExplicitRequest, PlanError> {
        ExplicitRequest::from_parallel(
            self.regions.regions()?,
            self.assignments.clone(),
            None,
            self.agent_count,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDoc {
    pub center: LatLon,
    pub agents: Vec<AgentId>,
    pub side_length: f64,
    pub spacing: f64,
}

/// Band fast path: either `centers` + shared size, or explicit `sites`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandsDoc {
    #[serde(default)]
    pub centers: Vec<LatLon>,
    #[serde(default)]
    pub sites: Vec<SiteDoc>,
    pub agent_count: usize,
    #[serde(default)]
    pub side_length: Option<f64>,
    #[serde(default)]
    pub spacing: Option<f64>,
    #[serde(default)]
    pub turnaround: Option<f64>,
    #[serde(default)]
    pub band_gap: f64,
}

/// What a [`BandsDoc`] asks for.
pub enum BandsPlan {
    Groups(MultiBandRequest),
    Sites(Vec<BandSite>),
}

impl BandsDoc {
    pub fn cfg(&self) -> BandCfg {
        BandCfg {
            turnaround: self.turnaround,
            band_gap: self.band_gap,
        }
    }

    pub fn plan(&self) -> Result<BandsPlan, PlanError> {
        match (self.centers.is_empty(), self.sites.is_empty()) {
            (false, true) => {
                let (Some(side_length), Some(spacing)) = (self.side_length, self.spacing) else {
                    return Err(PlanError::InvalidParams(
                        "centers need side_length and spacing".into(),
                    ));
                };
                Ok(BandsPlan::Groups(MultiBandRequest {
                    centers: self.centers.iter().map(geo).collect(),
                    agent_count: self.agent_count,
                    side_length,
                    spacing,
                }))
            }
            (true, false) => Ok(BandsPlan::Sites(
                self.sites
                    .iter()
                    .map(|s| BandSite {
                        center: geo(&s.center),
                        agents: s.agents.clone(),
                        side_length: s.side_length,
                        spacing: s.spacing,
                    })
                    .collect(),
            )),
            _ => Err(PlanError::InvalidParams(
                "give exactly one of centers or sites".into(),
            )),
        }
    }
}
