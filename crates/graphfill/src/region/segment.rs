//! Segment list builder: polylines → flat, tagged edge primitives.
//!
//! The four viewport edges go in last under the reserved synthetic owner,
//! so every cast ray finds at least one hit.

use nalgebra::Vector2;

use crate::model::{Axes, DetectCfg, Owner, Polyline, Segment};

/// Reserved owner id for the synthetic viewport edges. Never appears in
/// `RegionResult::boundary_ids`.
pub const VIEWPORT_ID: &str = "__viewport__";

/// Flatten every polyline into segments and append the viewport edges.
/// Degenerate pairs (squared length below tolerance², or non-finite
/// coordinates) are dropped.
pub fn build_segments(polylines: &[Polyline], axes: Axes, cfg: &DetectCfg) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    for (pi, pl) in polylines.iter().enumerate() {
        for (si, pair) in pl.points.windows(2).enumerate() {
            let (p1, p2) = (pair[0], pair[1]);
            if !finite(p1) || !finite(p2) {
                continue;
            }
            if (p2 - p1).norm_squared() < cfg.eps_len * cfg.eps_len {
                continue;
            }
            out.push(Segment {
                p1,
                p2,
                owner: Owner::Curve(pi),
                start_index: si,
            });
        }
    }
    let corners = [
        Vector2::new(axes.x_min, axes.y_min),
        Vector2::new(axes.x_max, axes.y_min),
        Vector2::new(axes.x_max, axes.y_max),
        Vector2::new(axes.x_min, axes.y_max),
    ];
    for k in 0..4 {
        out.push(Segment {
            p1: corners[k],
            p2: corners[(k + 1) % 4],
            owner: Owner::Viewport,
            start_index: k,
        });
    }
    out
}

#[inline]
fn finite(p: Vector2<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
