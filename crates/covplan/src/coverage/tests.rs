use super::*;
use geo::{polygon, LineString, MultiPolygon, Polygon};
use nalgebra::Vector2;
use proptest::prelude::*;

use crate::cfg::PlanCfg;
use crate::error::PlanError;
use crate::rotation::{Rotation, SweepAngle};
use crate::sample::{draw_region, RegionCfg, ReplayToken};

fn square(x0: f64, y0: f64, side: f64) -> Polygon<f64> {
    polygon![
        (x: x0, y: y0),
        (x: x0 + side, y: y0),
        (x: x0 + side, y: y0 + side),
        (x: x0, y: y0 + side),
    ]
}

fn region(poly: Polygon<f64>, spacing: f64) -> PlanarRegion {
    PlanarRegion::new(poly, spacing).with_sweep(SweepAngle::Degrees(0.0))
}

/// Every even-index point starts a scan run; returns their x positions.
fn run_xs(path: &CoveragePath) -> Vec<f64> {
    path.points.iter().step_by(2).map(|p| p.x).collect()
}

#[test]
fn square_single_agent_sweeps_eleven_lines() {
    let cfg = PlanCfg::default();
    let paths = partition_fair(&[region(square(0.0, 0.0, 100.0), 10.0)], 1, &cfg).unwrap();
    assert_eq!(paths.len(), 1);
    let path = &paths[0];
    assert_eq!(path.len(), 22);
    for (k, x) in run_xs(path).into_iter().enumerate() {
        assert!((x - 10.0 * k as f64).abs() < 0.05, "line {k} at x = {x}");
    }
    // Runs alternate upward and downward.
    for (i, pair) in path.points.chunks_exact(2).enumerate() {
        let up = pair[1].y > pair[0].y;
        assert_eq!(up, i % 2 == 0, "run {i}");
        assert!((pair[0].x - pair[1].x).abs() < 1e-9);
    }
    assert!((path.length() - 1200.0).abs() < 0.5, "length {}", path.length());
}

#[test]
fn square_two_agents_get_six_lines_each() {
    let cfg = PlanCfg::default();
    let paths = partition_fair(&[region(square(0.0, 0.0, 100.0), 10.0)], 2, &cfg).unwrap();
    assert_eq!(paths.len(), 2);
    for (a, path) in paths.iter().enumerate() {
        assert_eq!(path.len(), 12, "agent {}", a + 1);
        assert!((path.length() - 650.0).abs() < 0.5, "length {}", path.length());
        let xs = run_xs(path);
        let lo = 50.0 * a as f64;
        for (k, x) in xs.iter().enumerate() {
            assert!((x - (lo + 10.0 * k as f64)).abs() < 0.05, "agent {} line {k} at {x}", a + 1);
        }
    }
}

#[test]
fn oversubscribed_square_leaves_agents_idle() {
    let cfg = PlanCfg::default();
    let paths = partition_fair(&[region(square(0.0, 0.0, 10.0), 10.0)], 100, &cfg).unwrap();
    assert_eq!(paths.len(), 100);
    assert!(paths.iter().any(|p| p.is_empty()));
    assert!(paths.iter().any(|p| !p.is_empty()));
}

#[test]
fn hole_splits_scan_lines() {
    let cfg = PlanCfg::default();
    let hole = LineString::from(vec![(35.0, 35.0), (65.0, 35.0), (65.0, 65.0), (35.0, 65.0)]);
    let outer = square(0.0, 0.0, 100.0);
    let poly = Polygon::new(outer.exterior().clone(), vec![hole]);
    let paths = partition_fair(&[region(poly, 10.0)], 1, &cfg).unwrap();
    let path = &paths[0];
    // 11 lines, three of them cut in two by the hole.
    assert_eq!(path.len(), 28);
    for p in &path.points {
        let inside_hole = p.x > 35.5 && p.x < 64.5 && p.y > 35.5 && p.y < 64.5;
        assert!(!inside_hole, "waypoint {p:?} inside the hole");
    }
}

#[test]
fn rotated_sweep_runs_east_west() {
    let cfg = PlanCfg::default();
    let r = PlanarRegion::new(square(0.0, 0.0, 100.0), 10.0).with_sweep(SweepAngle::Degrees(90.0));
    let path = &partition_fair(&[r], 1, &cfg).unwrap()[0];
    assert_eq!(path.len(), 22);
    for pair in path.points.chunks_exact(2) {
        assert!((pair[0].y - pair[1].y).abs() < 1e-6, "run not horizontal: {pair:?}");
        assert!((pair[0].x - pair[1].x).abs() > 99.0);
    }
}

#[test]
fn explicit_assignment_orders_by_id() {
    let cfg = PlanCfg::default();
    let regions = vec![
        (region(square(0.0, 0.0, 100.0), 10.0), vec![2]),
        (region(square(200.0, 0.0, 100.0), 10.0), vec![3, 1]),
    ];
    let paths = partition_explicit(&regions, 3, &cfg).unwrap();
    assert_eq!(paths.len(), 3);
    let within = |p: &CoveragePath, lo: f64, hi: f64| {
        !p.is_empty() && p.points.iter().all(|q| q.x >= lo - 1e-3 && q.x <= hi + 1e-3)
    };
    assert!(within(&paths[1], 0.0, 100.0));
    assert!(within(&paths[2], 200.0, 250.0 + 1e-3));
    assert!(within(&paths[0], 250.0, 300.0));
}

#[test]
fn explicit_rejects_duplicate_ids() {
    let cfg = PlanCfg::default();
    let regions = vec![
        (region(square(0.0, 0.0, 100.0), 10.0), vec![1]),
        (region(square(200.0, 0.0, 100.0), 10.0), vec![1, 2]),
    ];
    match partition_explicit(&regions, 3, &cfg) {
        Err(PlanError::AssignmentMismatch { assigned, expected }) => {
            assert_eq!(assigned, vec![1, 1, 2]);
            assert_eq!(expected, 3);
        }
        other => panic!("expected assignment mismatch, got {other:?}"),
    }
}

#[test]
fn explicit_rejects_before_geometry() {
    // Bad spacing would fail later; the id check must win.
    let regions = vec![(region(square(0.0, 0.0, 10.0), -1.0), vec![1, 3])];
    assert!(matches!(
        partition_explicit(&regions, 2, &PlanCfg::default()),
        Err(PlanError::AssignmentMismatch { .. })
    ));
}

#[test]
fn explicit_skips_regions_without_agents() {
    let regions = vec![
        (region(square(0.0, 0.0, 100.0), 10.0), vec![]),
        (region(square(200.0, 0.0, 100.0), 10.0), vec![1]),
    ];
    let paths = partition_explicit(&regions, 1, &PlanCfg::default()).unwrap();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].points.iter().all(|p| p.x >= 199.9));
}

#[test]
fn fair_without_regions_is_invalid() {
    assert!(matches!(
        partition_fair(&[], 3, &PlanCfg::default()),
        Err(PlanError::InvalidParams(_))
    ));
    assert!(partition_fair(&[], 0, &PlanCfg::default()).unwrap().is_empty());
}

#[test]
fn fair_rejects_bad_spacing() {
    let r = region(square(0.0, 0.0, 10.0), 0.0);
    assert!(matches!(
        partition_fair(&[r], 1, &PlanCfg::default()),
        Err(PlanError::InvalidParams(_))
    ));
}

#[test]
fn scan_positions_follow_anchor() {
    let cfg = PlanCfg::default();
    let xs = scan_positions(5.0, 47.0, SweepParams::anchored(10.0, 0.0), &cfg).unwrap();
    assert_eq!(xs, vec![10.0, 20.0, 30.0, 40.0]);
    let xs = scan_positions(5.0, 47.0, SweepParams::new(10.0), &cfg).unwrap();
    assert_eq!(xs.len(), 5);
    assert!((xs[0] - 5.0).abs() < 1e-3 && xs[0] > 5.0);
    assert_eq!(xs[4], 45.0);
}

#[test]
fn scan_positions_reject_huge_lattices() {
    let cfg = PlanCfg::default();
    assert!(scan_positions(0.0, 1e6, SweepParams::new(1e-3), &cfg).is_err());
}

#[test]
fn boustrophedon_reverses_odd_runs() {
    let segs = vec![
        (Vector2::new(0.0, 0.0), Vector2::new(0.0, 1.0)),
        (Vector2::new(1.0, 0.0), Vector2::new(1.0, 1.0)),
        (Vector2::new(2.0, 0.0), Vector2::new(2.0, 1.0)),
    ];
    let path = boustrophedon(&segs);
    let ys: Vec<f64> = path.iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn scan_line_reports_broken_rings() {
    let ring = LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (f64::NAN, 10.0)]);
    let area = MultiPolygon::new(vec![Polygon::new(ring, vec![])]);
    assert!(matches!(
        scan_line_segments(&area, 5.0, 0.0),
        Err(PlanError::Topology(_))
    ));
}

#[test]
fn scan_line_counts_vertices_once() {
    let area = MultiPolygon::new(vec![polygon![
        (x: 0.0, y: 0.0), (x: 5.0, y: 0.0), (x: 10.0, y: 0.0),
        (x: 10.0, y: 10.0), (x: 0.0, y: 10.0),
    ]]);
    let runs = scan_line_segments(&area, 5.0, 0.0).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].0.y, 0.0);
    assert_eq!(runs[0].1.y, 10.0);
}

#[test]
fn sweep_reports_nearest_entry_vertex() {
    let cfg = PlanCfg::default();
    let poly = square(0.0, 0.0, 100.0);
    let path = plan_sweep(
        &poly,
        SweepParams::new(10.0),
        Some(Vector2::new(90.0, 95.0)),
        &Rotation::identity(),
        &cfg,
    )
    .unwrap();
    assert_eq!(path.entry, Some(Vector2::new(100.0, 100.0)));
}

#[test]
fn split_into_bands_covers_width() {
    let area = MultiPolygon::new(vec![square(0.0, 0.0, 90.0)]);
    let strips = split_into_bands(&area, 3, 0.0);
    assert_eq!(strips.len(), 3);
    for (i, s) in strips.iter().enumerate() {
        let bb = geo::BoundingRect::bounding_rect(&s.parts).unwrap();
        assert!((bb.min().x - 30.0 * i as f64).abs() < 1e-6);
        assert!((bb.width() - 30.0).abs() < 1e-6);
    }
    assert!(split_into_bands(&MultiPolygon::new(vec![]), 2, 0.0)
        .iter()
        .all(Strip::is_empty));
}

#[test]
fn validate_assignment_accepts_permutations() {
    let lists: Vec<Vec<AgentId>> = vec![vec![3, 1], vec![], vec![2]];
    assert!(validate_assignment(lists.iter().map(Vec::as_slice), 3).is_ok());
    assert!(validate_assignment(lists.iter().map(Vec::as_slice), 4).is_err());
    let gap: Vec<Vec<AgentId>> = vec![vec![1], vec![3]];
    assert!(validate_assignment(gap.iter().map(Vec::as_slice), 2).is_err());
}

proptest! {
    #[test]
    fn distribute_is_balanced(total in 0usize..500, buckets in 1usize..40) {
        let counts = distribute(total, buckets);
        prop_assert_eq!(counts.len(), buckets);
        prop_assert_eq!(counts.iter().sum::<usize>(), total);
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        prop_assert!(max - min <= 1);
        prop_assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn random_regions_give_one_path_per_agent(seed in 0u64..1_000, agents in 1usize..6, holed in any::<bool>()) {
        let rcfg = RegionCfg { hole_frac: holed.then_some(0.4), ..RegionCfg::default() };
        let r = draw_region(rcfg, ReplayToken { seed, index: 0 });
        let bb = geo::BoundingRect::bounding_rect(&r.polygon).unwrap();
        let paths = partition_fair(std::slice::from_ref(&r), agents, &PlanCfg::default()).unwrap();
        prop_assert_eq!(paths.len(), agents);
        for p in paths.iter().flat_map(|p| p.points.iter()) {
            prop_assert!(p.x >= bb.min().x - 0.01 && p.x <= bb.max().x + 0.01);
            prop_assert!(p.y >= bb.min().y - 0.01 && p.y <= bb.max().y + 0.01);
        }
    }
}

fn holed_square(lo: f64, hi: f64) -> Polygon<f64> {
    let hole = LineString::from(vec![(lo, lo), (hi, lo), (hi, hi), (lo, hi)]);
    Polygon::new(square(0.0, 0.0, 100.0).exterior().clone(), vec![hole])
}

fn l_shape() -> Polygon<f64> {
    polygon![
        (x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 50.0),
        (x: 50.0, y: 50.0), (x: 50.0, y: 100.0), (x: 0.0, y: 100.0),
    ]
}

#[test]
fn scan_line_keeps_runs_along_edges_on_the_line() {
    let holed = MultiPolygon::new(vec![holed_square(30.0, 70.0)]);
    for c in [30.0, 70.0] {
        let runs = scan_line_segments(&holed, c, 1e-9).unwrap();
        assert_eq!(runs.len(), 1, "x = {c}: {runs:?}");
        assert_eq!((runs[0].0.y, runs[0].1.y), (0.0, 100.0));
    }
    let runs = scan_line_segments(&holed, 50.0, 1e-9).unwrap();
    assert_eq!(runs.len(), 2);

    let l = MultiPolygon::new(vec![l_shape()]);
    let runs = scan_line_segments(&l, 50.0, 1e-9).unwrap();
    assert_eq!(runs.len(), 1, "{runs:?}");
    assert_eq!((runs[0].0.y, runs[0].1.y), (0.0, 100.0));
}

#[test]
fn lattice_aligned_hole_edges_stay_covered() {
    let cfg = PlanCfg::default();
    let path = &partition_fair(&[region(holed_square(30.0, 70.0), 10.0)], 1, &cfg).unwrap()[0];
    // 11 lines; only x = 40, 50, 60 cross the hole interior.
    assert_eq!(path.len(), 28);
    for edge in [30.0, 70.0] {
        let runs: Vec<_> = path
            .points
            .chunks_exact(2)
            .filter(|r| (r[0].x - edge).abs() < 0.05)
            .collect();
        assert_eq!(runs.len(), 1, "x = {edge}");
        assert!((runs[0][0].y - runs[0][1].y).abs() > 99.0);
    }
}

#[test]
fn l_shape_inner_corner_line_spans_full_height() {
    let cfg = PlanCfg::default();
    let path = &partition_fair(&[region(l_shape(), 10.0)], 1, &cfg).unwrap()[0];
    assert_eq!(path.len(), 22);
    let run = path
        .points
        .chunks_exact(2)
        .find(|r| (r[0].x - 50.0).abs() < 0.05)
        .unwrap();
    assert!((run[0].y - run[1].y).abs() > 99.0, "{run:?}");
}

#[test]
fn broken_scan_line_does_not_sink_the_sweep() {
    // The NaN vertex only poisons crossings for 35 <= x < 45, i.e. the line at x = 40.
    let ring = LineString::from(vec![
        (0.0, 0.0),
        (100.0, 0.0),
        (100.0, 100.0),
        (45.0, 100.0),
        (40.0, f64::NAN),
        (35.0, 100.0),
        (0.0, 100.0),
    ]);
    let poly = Polygon::new(ring, vec![]);
    let cfg = PlanCfg {
        repair_buffer: 0.0,
        ..PlanCfg::default()
    };
    let path = plan_sweep(&poly, SweepParams::new(10.0), None, &Rotation::identity(), &cfg).unwrap();
    assert_eq!(path.len(), 20);
    let xs = run_xs(&path);
    assert!(xs.iter().all(|x| (x - 40.0).abs() > 1.0), "{xs:?}");
    for expected in [0.0, 30.0, 50.0, 100.0] {
        assert!(xs.iter().any(|x| (x - expected).abs() < 0.05), "missing x = {expected}");
    }
}

#[test]
fn repair_closes_a_thin_slit() {
    use geo::Area;
    let slit = polygon![
        (x: 0.0, y: 0.0), (x: 100.0, y: 0.0), (x: 100.0, y: 100.0),
        (x: 50.1, y: 100.0), (x: 50.1, y: 40.0), (x: 49.9, y: 40.0),
        (x: 49.9, y: 100.0), (x: 0.0, y: 100.0),
    ];
    let area = MultiPolygon::new(vec![slit]);
    let before = scan_line_segments(&area, 50.0, 1e-9).unwrap();
    assert!((before[0].1.y - 40.0).abs() < 1e-9);

    let fixed = repair(&area, 0.5);
    assert_eq!(fixed.0.len(), 1);
    assert!(fixed.0[0].interiors().is_empty());
    assert!((fixed.unsigned_area() - 10_000.0).abs() < 1.0, "{}", fixed.unsigned_area());
    let runs = scan_line_segments(&fixed, 50.0, 1e-9).unwrap();
    assert_eq!(runs.len(), 1, "{runs:?}");
    assert!(runs[0].1.y - runs[0].0.y > 99.0);

    assert_eq!(repair(&area, 0.0), area);
}
