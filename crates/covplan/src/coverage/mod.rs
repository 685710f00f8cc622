//! Planar coverage: sweep planner and strip partitioning.
//!
//! Purpose
//! - Cover a polygon with holes by vertical scan lines spaced `s` apart and
//!   join them into a boustrophedon path.
//! - Split regions into equal-width strips, one per agent, either fairly or by
//!   an explicit id assignment.
//!
//! Assumptions and conventions
//! - Inputs live in a local planar frame (metres). Sweeping happens in the
//!   rotated frame where scan lines are vertical; paths are returned in the
//!   unrotated frame.
//! - Strips are `MultiPolygon`s and may be empty. An empty strip yields an
//!   empty path and a warning, never an error.
//! - Strips of one region share a single scan-line lattice anchored at the
//!   region's rotated `minX`.

mod partition;
mod repair;
mod scan;
mod sweep;
mod types;

#[cfg(test)]
mod tests;

pub use partition::{
    distribute, partition_explicit, partition_fair, prepare_region, split_into_bands,
    validate_assignment, PreparedRegion,
};
pub use repair::repair;
pub use scan::{scan_line_segments, Segment};
pub use sweep::{boustrophedon, plan_sweep, scan_positions, SweepParams};
pub use types::{AgentId, CoveragePath, PlanarRegion, Strip};
