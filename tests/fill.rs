// Copyright 2026 the Trapeze Authors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end fill tessellation scenarios.

use kurbo::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trapeze::{FillRule, PathData, Tessellator, Trapezoid};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn tessellate(path: &PathData, fill_rule: FillRule) -> Vec<Trapezoid> {
    Tessellator::new(path, fill_rule, 16).trapezoid_list()
}

fn total_area(trapezoids: &[Trapezoid]) -> f64 {
    trapezoids.iter().map(Trapezoid::area).sum()
}

fn triangle() -> PathData {
    let mut path = PathData::new();
    path.move_to(p(0.0, 0.0));
    path.line_to(p(10.0, 0.0));
    path.line_to(p(5.0, 10.0));
    path.close_subpath();
    path
}

#[test]
fn axis_aligned_square_is_one_trapezoid() {
    let mut path = PathData::new();
    path.move_to(p(0.0, 0.0));
    path.line_to(p(10.0, 0.0));
    path.line_to(p(10.0, 10.0));
    path.line_to(p(0.0, 10.0));
    path.close_subpath();

    let trapezoids = tessellate(&path, FillRule::NonZero);
    assert_eq!(trapezoids.len(), 1);
    let t = trapezoids[0];
    assert_eq!(t.top_y, 0.0);
    assert_eq!(t.bottom_y, 10.0);
    assert_eq!(t.top_left_x, 0.0);
    assert_eq!(t.top_right_x, 10.0);
    assert_eq!(t.bottom_left_x, 0.0);
    assert_eq!(t.bottom_right_x, 10.0);
}

#[test]
fn triangle_covers_same_area_under_both_rules() {
    let path = triangle();

    let non_zero = tessellate(&path, FillRule::NonZero);
    let even_odd = tessellate(&path, FillRule::EvenOdd);

    let area_nz = total_area(&non_zero);
    let area_eo = total_area(&even_odd);
    assert!((area_nz - 50.0).abs() < 0.5, "non-zero area {area_nz}");
    assert!((area_eo - 50.0).abs() < 0.5, "even-odd area {area_eo}");
    assert!((area_nz - area_eo).abs() < 1e-6);

    let mut tessellator = Tessellator::new(&path, FillRule::NonZero, 16);
    tessellator.trapezoid_list();
    let bb = tessellator.bounding_box();
    assert!((bb.min_x - 0.0).abs() < 1e-9);
    assert!((bb.min_y - 0.0).abs() < 1e-9);
    assert!((bb.max_x - 10.0).abs() < 1e-9);
    assert!((bb.max_y - 10.0).abs() < 1e-9);
}

#[test]
fn coincident_opposite_windings_cancel() {
    let mut path = PathData::new();
    // Clockwise...
    path.move_to(p(0.0, 0.0));
    path.line_to(p(10.0, 0.0));
    path.line_to(p(5.0, 10.0));
    path.close_subpath();
    // ...and the same triangle counter-clockwise.
    path.move_to(p(0.0, 0.0));
    path.line_to(p(5.0, 10.0));
    path.line_to(p(10.0, 0.0));
    path.close_subpath();

    for fill_rule in [FillRule::NonZero, FillRule::EvenOdd] {
        let trapezoids = tessellate(&path, fill_rule);
        let area = total_area(&trapezoids);
        assert!(
            area.abs() < 1e-6,
            "{fill_rule:?} produced non-empty coverage: {area}"
        );
    }
}

#[test]
fn quadratic_flattening_approximates_parabolic_area() {
    let mut path = PathData::new();
    path.move_to(p(0.0, 0.0));
    path.quad_to(p(50.0, 100.0), p(100.0, 0.0));
    path.close_subpath();

    let trapezoids = tessellate(&path, FillRule::NonZero);
    assert!(trapezoids.len() > 1);

    // Analytic area of the parabolic segment: 2/3 of the control triangle.
    let expected = 2.0 / 3.0 * 5000.0;
    let area = total_area(&trapezoids);
    assert!(
        (area - expected).abs() < expected * 0.01,
        "flattened area {area} vs analytic {expected}"
    );
}

#[test]
fn self_intersecting_bowtie_respects_fill_rule() {
    // Both windings of the bowtie halves are positive under non-zero, but
    // even-odd and non-zero still agree here; the interesting property is
    // that the crossing is split cleanly and nothing overlaps.
    let mut path = PathData::new();
    path.move_to(p(0.0, 0.0));
    path.line_to(p(10.0, 10.0));
    path.line_to(p(0.0, 10.0));
    path.line_to(p(10.0, 0.0));
    path.close_subpath();

    let trapezoids = tessellate(&path, FillRule::EvenOdd);
    // Two triangles of area 25 each.
    let area = total_area(&trapezoids);
    assert!((area - 50.0).abs() < 1.0, "bowtie area {area}");
    assert_no_row_overlap(&trapezoids);
}

fn assert_no_row_overlap(trapezoids: &[Trapezoid]) {
    for (i, a) in trapezoids.iter().enumerate() {
        assert!(a.top_y < a.bottom_y);
        assert!(a.top_left_x <= a.top_right_x + 1e-9);
        assert!(a.bottom_left_x <= a.bottom_right_x + 1e-9);
        for b in &trapezoids[i + 1..] {
            let overlap_top = a.top_y.max(b.top_y);
            let overlap_bottom = a.bottom_y.min(b.bottom_y);
            if overlap_top >= overlap_bottom {
                continue;
            }
            let mid = 0.5 * (overlap_top + overlap_bottom);
            let side = |t: &Trapezoid, top: f64, bottom: f64| {
                let ty = (mid - t.top_y) / (t.bottom_y - t.top_y);
                top + (bottom - top) * ty
            };
            let a_left = side(a, a.top_left_x, a.bottom_left_x);
            let a_right = side(a, a.top_right_x, a.bottom_right_x);
            let b_left = side(b, b.top_left_x, b.bottom_left_x);
            let b_right = side(b, b.top_right_x, b.bottom_right_x);
            assert!(
                a_right <= b_left + 1e-6 || b_right <= a_left + 1e-6,
                "trapezoids overlap at y={mid}: [{a_left},{a_right}] vs [{b_left},{b_right}]"
            );
        }
    }
}

#[test]
fn random_polygons_satisfy_trapezoid_invariants() {
    let mut rng = StdRng::seed_from_u64(0x7e55e11a);
    for _ in 0..50 {
        let mut path = PathData::new();
        let corners = rng.gen_range(3..8);
        path.move_to(p(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)));
        for _ in 1..corners {
            path.line_to(p(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)));
        }
        path.close_subpath();

        for fill_rule in [FillRule::NonZero, FillRule::EvenOdd] {
            let trapezoids = tessellate(&path, fill_rule);
            for t in &trapezoids {
                assert!(t.top_y < t.bottom_y);
            }
            assert_no_row_overlap(&trapezoids);
            for pair in trapezoids.windows(2) {
                assert!(pair[0].top_y <= pair[1].top_y);
            }
        }
    }
}

#[test]
fn full_circle_arc_area_matches_disc() {
    let mut path = PathData::new();
    path.move_to(p(30.0, 20.0));
    path.arc(
        p(20.0, 20.0),
        kurbo::Vec2::new(10.0, 10.0),
        0.0,
        2.0 * std::f64::consts::PI,
        false,
    );
    path.close_subpath();

    let trapezoids = tessellate(&path, FillRule::NonZero);
    let expected = std::f64::consts::PI * 100.0;
    let area = total_area(&trapezoids);
    assert!(
        (area - expected).abs() < expected * 0.01,
        "disc area {area} vs {expected}"
    );
}
