//! Curve follower: chords between same-owner hits become sampled arcs.
//!
//! Connecting two hits on the same curve with a straight edge flattens
//! the boundary; instead the owner polyline's original points strictly
//! between the two hit positions are spliced in, direction-matched, and
//! stride-downsampled past `follow_max_points`.

use nalgebra::Vector2;

use crate::model::{DetectCfg, Owner, Polyline, RayHit};

/// Assemble the raw polygon: hit points in angular order, with the arc of
/// the shared owner spliced between each same-owner consecutive pair
/// (cyclically, so the last→first edge is followed too).
pub fn follow_curves(
    hits: &[RayHit],
    polylines: &[Polyline],
    cfg: &DetectCfg,
) -> Vec<Vector2<f64>> {
    let mut out: Vec<Vector2<f64>> = Vec::with_capacity(hits.len() * 2);
    for i in 0..hits.len() {
        let cur = &hits[i];
        let next = &hits[(i + 1) % hits.len()];
        out.push(cur.point);
        if let (Owner::Curve(a), Owner::Curve(b)) = (cur.owner, next.owner) {
            if a == b {
                let pl = &polylines[a];
                let from = nearest_index(pl, cur);
                let to = nearest_index(pl, next);
                out.extend(arc_between(&pl.points, from, to, cfg.follow_max_points));
            }
        }
    }
    out
}

/// Index of the polyline point nearest the hit: the hit's segment gives
/// the candidate pair, the closer endpoint wins.
fn nearest_index(pl: &Polyline, hit: &RayHit) -> usize {
    let last = pl.points.len().saturating_sub(1);
    let s = hit.start_index.min(last);
    let e = (s + 1).min(last);
    let ds = (pl.points[s] - hit.point).norm_squared();
    let de = (pl.points[e] - hit.point).norm_squared();
    if de < ds {
        e
    } else {
        s
    }
}

/// Points strictly between `from` and `to`, emitted in hit order
/// (reversed when the indices run backwards), downsampled to `max_len`.
fn arc_between(
    points: &[Vector2<f64>],
    from: usize,
    to: usize,
    max_len: usize,
) -> Vec<Vector2<f64>> {
    let mut arc: Vec<Vector2<f64>> = if to > from + 1 {
        points[from + 1..to].to_vec()
    } else if from > to + 1 {
        points[to + 1..from].iter().rev().copied().collect()
    } else {
        Vec::new()
    };
    if max_len > 0 && arc.len() > max_len {
        let stride = arc.len().div_ceil(max_len);
        arc = arc.into_iter().step_by(stride).collect();
    }
    arc
}
