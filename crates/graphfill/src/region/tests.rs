use std::collections::BTreeSet;

use nalgebra::{vector, Vector2};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::eval::{CurveFn, ExprCompiler};
use crate::model::{
    Axes, BoundaryElement, DetectCfg, FunctionElement, LineElement, LineKind, Owner,
};
use crate::sampler::sample_element;

struct Curves;
impl ExprCompiler for Curves {
    fn compile(&self, expression: &str) -> Option<CurveFn<'_>> {
        match expression {
            "x^2" => Some(Box::new(|x: f64| x * x)),
            "x" => Some(Box::new(|x: f64| x)),
            "2x" => Some(Box::new(|x: f64| 2.0 * x)),
            _ => None,
        }
    }
}

fn axes() -> Axes {
    Axes::new(-10.0, 10.0, -10.0, 10.0)
}

fn func(id: &str, expression: &str) -> BoundaryElement {
    BoundaryElement::Function(FunctionElement::new(id, expression))
}

fn detect(
    drop: Vector2<f64>,
    elements: &[BoundaryElement],
    ignored: &BTreeSet<String>,
) -> Option<crate::model::RegionResult> {
    detect_region(&Curves, drop, elements, axes(), ignored, &DetectCfg::default())
}

#[test]
fn open_pocket_above_a_single_parabola_is_no_region() {
    // The cup of x^2 around (0, 5) only closes via the viewport top edge,
    // which does not count as enclosure.
    let result = detect(vector![0.0, 5.0], &[func("sq", "x^2")], &BTreeSet::new());
    assert!(result.is_none());
}

#[test]
fn lens_between_two_curves_is_detected() {
    let elements = [func("sq", "x^2"), func("lin2", "2x")];
    let result = detect(vector![0.5, 0.6], &elements, &BTreeSet::new()).expect("enclosed lens");
    assert!(result.polygon.len() >= 3);
    assert!(result
        .polygon
        .iter()
        .all(|p| p.x.is_finite() && p.y.is_finite()));
    let ids: Vec<&str> = result.boundary_ids.iter().map(|s| s.as_str()).collect();
    assert_eq!(ids, vec!["lin2", "sq"]);
    assert!(!result.boundary_ids.contains(VIEWPORT_ID));
    // The lens spans x in [0, 2] up to sampling resolution.
    assert!(result.domain.0 > -0.5 && result.domain.0 < 0.5);
    assert!(result.domain.1 > 1.5 && result.domain.1 < 2.5);
}

#[test]
fn boundary_ids_contain_exactly_the_hit_elements() {
    // A far-away segment is present but can never be the nearest hit from
    // inside the lens.
    let elements = [
        func("sq", "x^2"),
        func("lin2", "2x"),
        BoundaryElement::Line(LineElement::new(
            "far",
            LineKind::Segment,
            vector![8.0, 8.0],
            vector![9.0, 8.0],
        )),
    ];
    let result = detect(vector![0.5, 0.6], &elements, &BTreeSet::new()).expect("enclosed lens");
    assert!(result.boundary_ids.contains("sq"));
    assert!(result.boundary_ids.contains("lin2"));
    assert!(!result.boundary_ids.contains("far"));
    assert!(!result.boundary_ids.contains(VIEWPORT_ID));
}

#[test]
fn ignored_boundary_never_reappears_in_the_result() {
    let elements = [func("sq", "x^2"), func("lin", "x"), func("lin2", "2x")];
    let mut ignored = BTreeSet::new();
    ignored.insert("lin".to_string());
    let result = detect(vector![0.5, 0.5], &elements, &ignored).expect("region without y=x");
    assert!(!result.boundary_ids.contains("lin"));
    assert!(result.boundary_ids.iter().all(|id| id != VIEWPORT_ID));
}

#[test]
fn drop_on_a_boundary_curve_is_graceful() {
    // (0.5, 0.5) lies exactly on y = x; detection must neither panic nor
    // loop, and any polygon it does return must be valid.
    let elements = [func("sq", "x^2"), func("lin", "x"), func("lin2", "2x")];
    if let Some(result) = detect(vector![0.5, 0.5], &elements, &BTreeSet::new()) {
        assert!(result.polygon.len() >= 3);
    }
    // Exactly on the parabola as well.
    let elements = [func("sq", "x^2"), func("lin2", "2x")];
    if let Some(result) = detect(vector![1.0, 1.0], &elements, &BTreeSet::new()) {
        assert!(result.polygon.len() >= 3);
    }
}

#[test]
fn off_screen_vertical_lines_cannot_close_an_open_channel() {
    // A horizontal channel y in [-1, 1] is open to the left and right
    // viewport edges, so no region exists. Vertical lines far outside
    // the viewport must not materialize as on-screen walls.
    let channel = [
        BoundaryElement::Line(LineElement::new(
            "top",
            LineKind::Segment,
            vector![-9.0, 1.0],
            vector![9.0, 1.0],
        )),
        BoundaryElement::Line(LineElement::new(
            "bot",
            LineKind::Segment,
            vector![-9.0, -1.0],
            vector![9.0, -1.0],
        )),
    ];
    assert!(detect(vector![0.0, 0.0], &channel, &BTreeSet::new()).is_none());

    let mut with_walls = channel.to_vec();
    for (id, x) in [("wall_l", -50.0), ("wall_r", 50.0)] {
        with_walls.push(BoundaryElement::Line(LineElement::new(
            id,
            LineKind::Line,
            vector![x, -1.0],
            vector![x, 1.0],
        )));
    }
    assert!(
        detect(vector![0.0, 0.0], &with_walls, &BTreeSet::new()).is_none(),
        "off-screen vertical lines must contribute nothing"
    );
}

#[test]
fn detection_is_invariant_to_element_order() {
    let fwd = [func("sq", "x^2"), func("lin2", "2x")];
    let rev = [func("lin2", "2x"), func("sq", "x^2")];
    let empty = BTreeSet::new();
    let a = detect(vector![0.5, 0.6], &fwd, &empty).expect("region");
    let b = detect(vector![0.5, 0.6], &rev, &empty).expect("region");
    assert_eq!(a.boundary_ids, b.boundary_ids);
    assert_eq!(a.polygon.len(), b.polygon.len());
    for (p, q) in a.polygon.iter().zip(b.polygon.iter()) {
        assert!((p - q).norm() < 1e-9);
    }
}

#[test]
fn invalid_axes_yield_no_region() {
    let bad = Axes::new(3.0, -3.0, -1.0, 1.0);
    let result = detect_region(
        &Curves,
        vector![0.0, 0.0],
        &[func("sq", "x^2")],
        bad,
        &BTreeSet::new(),
        &DetectCfg::default(),
    );
    assert!(result.is_none());
}

#[test]
fn empty_scene_rays_all_land_on_the_viewport() {
    let cfg = DetectCfg::default();
    let segments = build_segments(&[], axes(), &cfg);
    assert_eq!(segments.len(), 4);
    let base = cast_fan(vector![0.0, 0.0], &segments, &cfg);
    assert_eq!(base.len(), cfg.ray_count);
    assert!(base.iter().all(|h| h.owner == Owner::Viewport));
    // And therefore: no enclosed region.
    assert!(detect(vector![0.0, 0.0], &[], &BTreeSet::new()).is_none());
}

#[test]
fn cast_ray_finds_the_nearest_hit() {
    let cfg = DetectCfg::default();
    let polylines: Vec<_> = [
        LineElement::new("near", LineKind::Segment, vector![-1.0, 1.0], vector![1.0, 1.0]),
        LineElement::new("far", LineKind::Segment, vector![-1.0, 2.0], vector![1.0, 2.0]),
    ]
    .into_iter()
    .filter_map(|l| sample_element(&Curves, &BoundaryElement::Line(l), axes(), &cfg))
    .collect();
    let segments = build_segments(&polylines, axes(), &cfg);
    let hit = cast_ray(
        vector![0.0, 0.0],
        std::f64::consts::FRAC_PI_2,
        &segments,
        &cfg,
    )
    .expect("hit");
    assert_eq!(hit.owner, Owner::Curve(0));
    assert!((hit.t - 1.0).abs() < 1e-9);
    assert!((hit.point - vector![0.0, 1.0]).norm() < 1e-9);
}

#[test]
fn cast_ray_rejects_near_parallel_segments() {
    let cfg = DetectCfg::default();
    let seg = crate::model::Segment {
        p1: vector![-1.0, 0.0],
        p2: vector![1.0, 0.0],
        owner: Owner::Curve(0),
        start_index: 0,
    };
    // Collinear ray: no well-conditioned intersection exists.
    assert!(cast_ray(vector![-2.0, 0.0], 0.0, &[seg], &cfg).is_none());
}

#[test]
fn refinement_pins_ownership_transitions_down() {
    let cfg = DetectCfg::default();
    let polylines: Vec<_> = [
        LineElement::new("right", LineKind::Segment, vector![1.0, -10.0], vector![1.0, 10.0]),
        LineElement::new("left", LineKind::Segment, vector![-1.0, -10.0], vector![-1.0, 10.0]),
    ]
    .into_iter()
    .filter_map(|l| sample_element(&Curves, &BoundaryElement::Line(l), axes(), &cfg))
    .collect();
    let segments = build_segments(&polylines, axes(), &cfg);
    let origin = vector![0.0, 0.0];
    let base = cast_fan(origin, &segments, &cfg);
    let refined = refine_transitions(origin, base.clone(), &segments, &cfg);
    assert!(refined.len() > base.len(), "transitions must add hits");
    // Angles stay monotone and every remaining ownership flip is pinned
    // below the refinement cutoff.
    for pair in refined.windows(2) {
        let gap = pair[1].angle - pair[0].angle;
        assert!(gap >= 0.0);
        if pair[0].owner != pair[1].owner {
            assert!(gap <= cfg.refine_min_angle * 1.01, "blunt transition: {gap}");
        }
    }
}

#[test]
fn degenerate_segments_are_filtered() {
    let cfg = DetectCfg::default();
    let pl = crate::model::Polyline {
        owner_id: "z".into(),
        kind: crate::model::ElementKind::Line,
        points: vec![
            vector![0.0, 0.0],
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![f64::NAN, 1.0],
        ],
        x_lo: 0.0,
        x_hi: 1.0,
    };
    let segments = build_segments(&[pl], axes(), &cfg);
    // One real segment plus the four viewport edges.
    assert_eq!(segments.len(), 5);
}

#[test]
fn random_scenes_never_panic_and_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let mut elements = vec![func("sq", "x^2"), func("lin2", "2x")];
        for k in 0..4 {
            let p = vector![rng.gen_range(-9.0..9.0), rng.gen_range(-9.0..9.0)];
            let q = vector![rng.gen_range(-9.0..9.0), rng.gen_range(-9.0..9.0)];
            let kind = match k % 3 {
                0 => LineKind::Segment,
                1 => LineKind::Ray,
                _ => LineKind::Line,
            };
            elements.push(BoundaryElement::Line(LineElement::new(
                format!("l{k}"),
                kind,
                p,
                q,
            )));
        }
        let drop = vector![rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)];
        if let Some(result) = detect(drop, &elements, &BTreeSet::new()) {
            assert!(result.polygon.len() >= 3);
            assert!(!result.boundary_ids.is_empty());
            assert!(!result.boundary_ids.contains(VIEWPORT_ID));
            assert!(result.domain.0 <= result.domain.1);
        }
    }
}

proptest! {
    #[test]
    fn detection_upholds_result_invariants(
        x in -3.0f64..3.0,
        y in -3.0f64..3.0,
    ) {
        let elements = [func("sq", "x^2"), func("lin2", "2x")];
        if let Some(result) = detect(vector![x, y], &elements, &BTreeSet::new()) {
            prop_assert!(result.polygon.len() >= 3);
            prop_assert!(result.polygon.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
            prop_assert!(!result.boundary_ids.contains(VIEWPORT_ID));
            prop_assert!(result.boundary_ids.iter().all(|id| id == "sq" || id == "lin2"));
            prop_assert!(result.domain.0 <= result.domain.1);
        }
    }
}
