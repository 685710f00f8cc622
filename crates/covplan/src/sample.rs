//! Random survey regions (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic, indexable regions for property tests and benchmarks.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, and connect the points in angle order. The result is
//!   star-shaped around the origin and usually non-convex.
//! - An optional hole is a regular polygon around the origin, small enough to
//!   stay inside the exterior ring.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use std::f64::consts::{PI, TAU};

use geo::{LineString, Polygon};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coverage::PlanarRegion;
use crate::rotation::SweepAngle;

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter region sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RegionCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radial jitter (relative amplitude). Clamped to [0, 0.9].
    pub radial_jitter: f64,
    /// Base radius in metres.
    pub base_radius: f64,
    /// Hole radius as a fraction of the smallest possible vertex radius; `None` for no hole.
    pub hole_frac: Option<f64>,
    /// Scan-line spacing given to sampled regions.
    pub spacing: f64,
}

impl Default for RegionCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Uniform { min: 6, max: 14 },
            angle_jitter_frac: 0.3,
            radial_jitter: 0.35,
            base_radius: 100.0,
            hole_frac: None,
            spacing: 10.0,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a star-shaped polygon around the origin.
pub fn draw_polygon(cfg: RegionCfg, tok: ReplayToken) -> Polygon<f64> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.9);
    let r0 = cfg.base_radius.max(1e-6);
    let delta = TAU / n as f64;
    let phase = rng.gen::<f64>() * TAU;
    let mut angles: Vec<f64> = (0..n)
        .map(|k| phase + k as f64 * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta)
        .collect();
    angles.sort_by(f64::total_cmp);
    let exterior: Vec<(f64, f64)> = angles
        .into_iter()
        .map(|th| {
            let r = (1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * rj) * r0;
            (th.cos() * r, th.sin() * r)
        })
        .collect();

    let holes = match cfg.hole_frac {
        // Edges stay beyond r_min·cos(max_gap / 2) from the origin; keep the hole well inside.
        Some(frac) if n >= 6 => {
            let max_gap = delta * (1.0 + 2.0 * aj);
            let clear = (1.0 - rj) * r0 * (max_gap / 2.0).min(PI / 2.0).cos();
            let rh = frac.clamp(0.0, 0.9) * clear;
            if rh > 0.0 {
                let ring: Vec<(f64, f64)> = (0..8)
                    .map(|k| {
                        let th = k as f64 * TAU / 8.0;
                        (th.cos() * rh, th.sin() * rh)
                    })
                    .collect();
                vec![LineString::from(ring)]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    };
    Polygon::new(LineString::from(exterior), holes)
}

/// Draw a region ready for planning; the sweep angle is explicit or auto with equal odds.
pub fn draw_region(cfg: RegionCfg, tok: ReplayToken) -> PlanarRegion {
    let polygon = draw_polygon(cfg, tok);
    let mut rng = ReplayToken {
        seed: tok.seed,
        index: tok.index ^ 0x5eed,
    }
    .to_std_rng();
    let sweep = if rng.gen::<bool>() {
        SweepAngle::Auto
    } else {
        SweepAngle::Degrees(rng.gen_range(0.0..360.0))
    };
    PlanarRegion::new(polygon, cfg.spacing).with_sweep(sweep)
}
