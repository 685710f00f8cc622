//! Equal-width strip partitioning, fair and explicit.

use geo::{coord, BoundingRect, MultiPolygon, Rect};
use tracing::{debug, warn};

use super::repair::{clip_to_rect, repair};
use super::sweep::{plan_sweep, SweepParams};
use super::types::{AgentId, CoveragePath, PlanarRegion, Strip};
use crate::cfg::PlanCfg;
use crate::error::{require_positive, PlanError};
use crate::rotation::Rotation;

/// Split `total` agents over `buckets` as evenly as possible; the first
/// `total % buckets` buckets take one extra. Zero buckets gives an empty list.
pub fn distribute(total: usize, buckets: usize) -> Vec<usize> {
    if buckets == 0 {
        return Vec::new();
    }
    let base = total / buckets;
    let rem = total % buckets;
    (0..buckets).map(|i| base + usize::from(i < rem)).collect()
}

/// Check that the id lists together hold exactly `1..=agent_count`, once each.
pub fn validate_assignment<'a>(
    lists: impl IntoIterator<Item = &'a [AgentId]>,
    agent_count: usize,
) -> Result<(), PlanError> {
    let mut ids: Vec<AgentId> = lists.into_iter().flatten().copied().collect();
    ids.sort_unstable();
    let exact = ids.len() == agent_count
        && ids
            .iter()
            .enumerate()
            .all(|(i, &id)| usize::try_from(id).map_or(false, |id| id == i + 1));
    if exact {
        Ok(())
    } else {
        Err(PlanError::AssignmentMismatch {
            assigned: ids,
            expected: agent_count,
        })
    }
}

/// A region repaired and rotated so its sweep is vertical.
#[derive(Clone, Debug)]
pub struct PreparedRegion {
    pub rotation: Rotation,
    /// Repaired area in the rotated frame.
    pub area: MultiPolygon<f64>,
    pub spacing: f64,
    /// Scan-line lattice origin shared by every strip of the region.
    pub anchor_x: f64,
}

pub fn prepare_region(region: &PlanarRegion, cfg: &PlanCfg) -> Result<PreparedRegion, PlanError> {
    require_positive("spacing", region.spacing)?;
    let fixed = repair(&MultiPolygon::new(vec![region.polygon.clone()]), cfg.repair_buffer);
    let bearing = region.sweep.resolve(region.polygon.exterior());
    let rotation = Rotation::new(bearing);
    let area = rotation.rotate_area(&fixed);
    let anchor_x = area.bounding_rect().map_or(0.0, |r| r.min().x);
    debug!(bearing, parts = area.0.len(), anchor_x, "prepared region");
    Ok(PreparedRegion {
        rotation,
        area,
        spacing: region.spacing,
        anchor_x,
    })
}

/// Slice the bounding box of `area` into `count` equal-width vertical bands
/// and intersect each with `area`. `overlap` widens each band to the right.
pub fn split_into_bands(area: &MultiPolygon<f64>, count: usize, overlap: f64) -> Vec<Strip> {
    let Some(bbox) = area.bounding_rect() else {
        return vec![Strip::empty(); count];
    };
    if count == 0 || bbox.width() <= 0.0 || bbox.height() <= 0.0 {
        return vec![Strip::empty(); count];
    }
    let width = bbox.width() / count as f64;
    (0..count)
        .map(|i| {
            let left = bbox.min().x + i as f64 * width;
            let rect = Rect::new(
                coord! { x: left, y: bbox.min().y },
                coord! { x: left + width + overlap, y: bbox.max().y },
            );
            match clip_to_rect(area, rect) {
                Ok(parts) => Strip { parts },
                Err(e) => {
                    warn!(band = i, error = %e, "band slicing failed; strip left empty");
                    Strip::empty()
                }
            }
        })
        .collect()
}

/// Sweep every disjoint part of a strip and concatenate the paths.
pub(crate) fn cover_strip(strip: &Strip, region: &PreparedRegion, cfg: &PlanCfg) -> Result<CoveragePath, PlanError> {
    let params = SweepParams::anchored(region.spacing, region.anchor_x);
    let mut path = CoveragePath::default();
    for part in strip.parts.iter() {
        path.extend(plan_sweep(part, params, None, &region.rotation, cfg)?);
    }
    Ok(path)
}

/// One path per agent, agents spread over `regions` by [`distribute`].
///
/// Paths come in consumption order: region by region, bands left to right.
pub fn partition_fair(regions: &[PlanarRegion], agents: usize, cfg: &PlanCfg) -> Result<Vec<CoveragePath>, PlanError> {
    cfg.validate()?;
    for r in regions {
        require_positive("spacing", r.spacing)?;
    }
    if agents == 0 {
        return Ok(Vec::new());
    }
    if regions.is_empty() {
        return Err(PlanError::invalid(format!("no regions to share {agents} agents")));
    }
    let counts = distribute(agents, regions.len());
    let mut out: Vec<CoveragePath> = Vec::with_capacity(agents);
    for (ri, (region, &count)) in regions.iter().zip(&counts).enumerate() {
        if count == 0 {
            debug!(region = ri, "no agents left for region");
            continue;
        }
        let prepared = prepare_region(region, cfg)?;
        for (bi, strip) in split_into_bands(&prepared.area, count, 0.0).iter().enumerate() {
            let path = cover_strip(strip, &prepared, cfg)?;
            if path.is_empty() {
                warn!(region = ri, band = bi, agent = out.len() + 1, "strip yields no coverage");
            }
            out.push(path);
        }
    }
    Ok(out)
}

/// One path per agent for an explicit id assignment; `result[id - 1]` is agent `id`.
///
/// The assignment is validated before any geometry runs. Bands are paired with
/// ids in list order and widened by `cfg.band_overlap`.
pub fn partition_explicit(
    regions: &[(PlanarRegion, Vec<AgentId>)],
    agent_count: usize,
    cfg: &PlanCfg,
) -> Result<Vec<CoveragePath>, PlanError> {
    cfg.validate()?;
    validate_assignment(regions.iter().map(|(_, ids)| ids.as_slice()), agent_count)?;
    for (r, _) in regions {
        require_positive("spacing", r.spacing)?;
    }
    let mut out = vec![CoveragePath::default(); agent_count];
    for (ri, (region, ids)) in regions.iter().enumerate() {
        if ids.is_empty() {
            debug!(region = ri, "region has no assigned agents");
            continue;
        }
        let prepared = prepare_region(region, cfg)?;
        let strips = split_into_bands(&prepared.area, ids.len(), cfg.band_overlap);
        for (&id, strip) in ids.iter().zip(&strips) {
            let path = cover_strip(strip, &prepared, cfg)?;
            if path.is_empty() {
                warn!(region = ri, agent = id, "strip yields no coverage");
            }
            // ids were validated to lie in 1..=agent_count
            out[id as usize - 1] = path;
        }
    }
    Ok(out)
}
