//! Transition refiner: adaptive angular bisection at ownership changes.
//!
//! Fixed uniform sampling alone can miss thin pockets where the nearest
//! owner flips over a tiny angular span. Whenever two angularly adjacent
//! hits belong to different owners, the gap is bisected recursively
//! (bounded depth, minimum-angle cutoff), recursing into every half that
//! still straddles a change. Cost stays proportional to the number of
//! real transitions, not to a high fixed resolution.

use nalgebra::Vector2;

use crate::model::{DetectCfg, RayHit, Segment};

use super::raycast::cast_ray;

/// Walk the base hits in angular order (including the wrap pair) and
/// splice refined hits into every ownership transition.
pub fn refine_transitions(
    origin: Vector2<f64>,
    base: Vec<RayHit>,
    segments: &[Segment],
    cfg: &DetectCfg,
) -> Vec<RayHit> {
    if base.len() < 2 {
        return base;
    }
    let mut out: Vec<RayHit> = Vec::with_capacity(base.len() * 2);
    for i in 0..base.len() {
        let lo = base[i];
        let mut hi = base[(i + 1) % base.len()];
        if i + 1 == base.len() {
            hi.angle += std::f64::consts::TAU;
        }
        out.push(lo);
        bisect(origin, &lo, &hi, segments, cfg.refine_depth, cfg, &mut out);
    }
    out
}

fn bisect(
    origin: Vector2<f64>,
    lo: &RayHit,
    hi: &RayHit,
    segments: &[Segment],
    depth: usize,
    cfg: &DetectCfg,
    out: &mut Vec<RayHit>,
) {
    if lo.owner == hi.owner {
        return;
    }
    let gap = hi.angle - lo.angle;
    if gap <= cfg.refine_min_angle {
        return;
    }
    if depth == 0 {
        tracing::trace!(gap, "bisection depth exhausted; accepting blunt hand-off");
        return;
    }
    let mid_angle = 0.5 * (lo.angle + hi.angle);
    let Some(mid) = cast_ray(origin, mid_angle, segments, cfg) else {
        return;
    };
    bisect(origin, lo, &mid, segments, depth - 1, cfg, out);
    out.push(mid);
    bisect(origin, &mid, hi, segments, depth - 1, cfg, out);
}
