//! Region detection: the general ray-casting path.
//!
//! Pipeline per call: sample boundary elements into polylines, flatten
//! into tagged segments (+ viewport edges), cast the uniform base fan,
//! refine ownership transitions, follow curved edges, assemble and
//! deduplicate the polygon. Everything here is request-scoped; the
//! polyline table and segment list are built fresh and dropped at return.
//!
//! A region counts as enclosed only when every accepted hit lands on a
//! real boundary. The synthetic viewport edges keep the caster total and
//! act as the leak sentinel: a ray that reaches the viewport means the
//! pocket is open to the screen border, which reports as "no region"
//! rather than an error.

mod follow;
mod raycast;
mod refine;
mod segment;

pub use raycast::{cast_fan, cast_ray};
pub use refine::refine_transitions;
pub use segment::{build_segments, VIEWPORT_ID};

use std::collections::BTreeSet;

use nalgebra::Vector2;

use crate::eval::ExprCompiler;
use crate::model::{Axes, BoundaryElement, DetectCfg, Owner, Polyline, RegionResult};
use crate::sampler::sample_element;

use follow::follow_curves;

/// Detect the closed region around `drop`, or `None` when no enclosed
/// pocket exists. Elements whose id is in `ignored` are left out before
/// sampling, which backs the caller's "ignore this boundary and retry"
/// flow.
pub fn detect_region(
    compiler: &dyn ExprCompiler,
    drop: Vector2<f64>,
    elements: &[BoundaryElement],
    axes: Axes,
    ignored: &BTreeSet<String>,
    cfg: &DetectCfg,
) -> Option<RegionResult> {
    if !axes.is_valid() {
        tracing::debug!(?axes, "invalid axes; no detection attempted");
        return None;
    }
    if !drop.x.is_finite() || !drop.y.is_finite() {
        return None;
    }
    let polylines: Vec<Polyline> = elements
        .iter()
        .filter(|e| !ignored.contains(e.id()))
        .filter_map(|e| sample_element(compiler, e, axes, cfg))
        .collect();
    let segments = build_segments(&polylines, axes, cfg);
    let base = cast_fan(drop, &segments, cfg);
    if base.len() < 3 {
        tracing::debug!(hits = base.len(), "too few base hits; no region");
        return None;
    }
    let hits = refine_transitions(drop, base, &segments, cfg);
    if hits.iter().any(|h| h.owner == Owner::Viewport) {
        tracing::debug!("pocket is open to the viewport boundary; no region");
        return None;
    }
    let raw = follow_curves(&hits, &polylines, cfg);
    let polygon = dedup_closed(raw, cfg.eps_dedup);
    if polygon.len() < 3 {
        tracing::debug!(vertices = polygon.len(), "degenerate polygon; no region");
        return None;
    }
    let mut boundary_ids = BTreeSet::new();
    for h in &hits {
        if let Owner::Curve(i) = h.owner {
            boundary_ids.insert(polylines[i].owner_id.clone());
        }
    }
    let mut x_lo = f64::INFINITY;
    let mut x_hi = f64::NEG_INFINITY;
    for p in &polygon {
        x_lo = x_lo.min(p.x);
        x_hi = x_hi.max(p.x);
    }
    Some(RegionResult {
        polygon,
        boundary_ids,
        domain: (x_lo, x_hi),
    })
}

/// Remove consecutive near-duplicate vertices, including the wrap pair
/// between the last and first vertex.
fn dedup_closed(points: Vec<Vector2<f64>>, eps: f64) -> Vec<Vector2<f64>> {
    let mut out: Vec<Vector2<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|q| (p - q).norm() > eps) {
            out.push(p);
        }
    }
    while out.len() > 1 && (out[0] - out[out.len() - 1]).norm() <= eps {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests;
