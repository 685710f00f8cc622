//! Coverage path planning and area partitioning for agent fleets.
//!
//! Purpose
//! - Turn survey regions into one boustrophedon waypoint sequence per agent.
//! - Every entry point is a pure function of its inputs. Results are fresh
//!   collections; history and bookkeeping belong to the caller.
//!
//! Layout
//! - `geodesy`: great-circle helpers and the interpolated local frame.
//! - `rotation`: sweep-angle resolution and the homogeneous rotation pair.
//! - `coverage`: planar sweep planner, band slicing, fair/explicit partitions.
//! - `plan`: geodetic requests on top of `coverage`.
//! - `bands`: rectangular fast path built from destination/bearing steps.
//! - `sample`: reproducible random regions for tests and benches.

pub mod bands;
pub mod cfg;
pub mod coverage;
pub mod error;
pub mod geodesy;
pub mod plan;
pub mod rotation;
pub mod sample;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::PlanCfg;
pub use error::PlanError;
pub use geodesy::{GeoPoint, LocalFrame};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::bands::{
        distribute_round_robin, plan_band_groups, plan_band_sites, plan_bands, BandCfg,
        BandRequest, BandSite, MultiBandRequest,
    };
    pub use crate::cfg::PlanCfg;
    pub use crate::coverage::{
        distribute, partition_explicit, partition_fair, plan_sweep, AgentId, CoveragePath,
        PlanarRegion, Strip, SweepParams,
    };
    pub use crate::error::PlanError;
    pub use crate::geodesy::{GeoPoint, LocalFrame};
    pub use crate::plan::{
        plan_explicit, plan_fair, zip_regions, AgentPath, ExplicitRequest, FairRequest, Region,
    };
    pub use crate::rotation::{Rotation, SweepAngle};
    pub use nalgebra::Vector2 as Vec2;
}

/// Total Euclidean length of a planar polyline.
#[inline]
pub fn polyline_length(points: &[Vec2<f64>]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}
