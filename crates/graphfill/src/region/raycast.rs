//! Visibility ray caster: nearest positive-t hit against all segments.

use nalgebra::Vector2;

use crate::model::{DetectCfg, RayHit, Segment};

/// Cast a ray from `origin` at `angle` and return the nearest hit.
///
/// For each segment `p1→p2` the 2×2 system
/// `origin + t·dir = p1 + u·(p2−p1)` is solved in cross-determinant form;
/// near-parallel pairs (`|det| < eps_det`) and `u` outside `[0,1]` (with
/// slack) are rejected, as are hits at `t <= eps_len` so that a drop
/// point sitting exactly on a boundary does not hit itself.
pub fn cast_ray(
    origin: Vector2<f64>,
    angle: f64,
    segments: &[Segment],
    cfg: &DetectCfg,
) -> Option<RayHit> {
    let dir = Vector2::new(angle.cos(), angle.sin());
    let mut best: Option<RayHit> = None;
    for seg in segments {
        let edge = seg.p2 - seg.p1;
        let det = edge.x * dir.y - dir.x * edge.y;
        if det.abs() < cfg.eps_det {
            continue;
        }
        let w = seg.p1 - origin;
        let t = (edge.x * w.y - w.x * edge.y) / det;
        let u = (dir.x * w.y - w.x * dir.y) / det;
        if t <= cfg.eps_len || !t.is_finite() {
            continue;
        }
        if u < -cfg.u_slack || u > 1.0 + cfg.u_slack {
            continue;
        }
        if best.as_ref().is_none_or(|b| t < b.t) {
            best = Some(RayHit {
                point: origin + dir * t,
                t,
                angle,
                owner: seg.owner,
                start_index: seg.start_index,
            });
        }
    }
    best
}

/// Cast the uniform base fan: `cfg.ray_count` rays on [0, 2π), ascending
/// angle. With the viewport edges present every ray hits something, but a
/// missing hit is simply skipped rather than treated as an error.
pub fn cast_fan(origin: Vector2<f64>, segments: &[Segment], cfg: &DetectCfg) -> Vec<RayHit> {
    let n = cfg.ray_count.max(3);
    let step = std::f64::consts::TAU / n as f64;
    (0..n)
        .filter_map(|k| cast_ray(origin, k as f64 * step, segments, cfg))
        .collect()
}
