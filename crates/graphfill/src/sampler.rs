//! Curve sampler: one boundary element → one viewport polyline.
//!
//! Functions are sampled at evenly spaced x-values; lines, rays, and
//! segments are clipped against the viewport rectangle. Points emitted
//! for the `ray`/`line` kinds are clamped into the box, so containment
//! holds by construction. Elements that contribute nothing (unparsable
//! expression, off-screen line, degenerate direction) yield `None`.

use nalgebra::Vector2;

use crate::eval::{CurveFn, ExprCompiler};
use crate::model::{
    Axes, BoundaryElement, DetectCfg, ElementKind, FunctionElement, LineElement, LineKind, Polyline,
};

/// Sample one element into a polyline, or `None` if it contributes nothing.
pub fn sample_element(
    compiler: &dyn ExprCompiler,
    element: &BoundaryElement,
    axes: Axes,
    cfg: &DetectCfg,
) -> Option<Polyline> {
    match element {
        BoundaryElement::Function(f) => sample_function(compiler, f, axes, cfg),
        BoundaryElement::Line(l) => sample_line(l, axes, cfg),
    }
}

/// Evaluate a function element at `n` evenly spaced x-values over
/// `[x_lo, x_hi]`, dropping non-finite samples. Ascending x.
pub(crate) fn function_points(
    f: &CurveFn<'_>,
    el: &FunctionElement,
    x_lo: f64,
    x_hi: f64,
    n: usize,
) -> Vec<Vector2<f64>> {
    let n = n.max(2);
    let step = (x_hi - x_lo) / (n - 1) as f64;
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let x = x_lo + step * i as f64;
        let y = el.apply(f, x);
        if x.is_finite() && y.is_finite() {
            points.push(Vector2::new(x, y));
        }
    }
    points
}

fn sample_function(
    compiler: &dyn ExprCompiler,
    el: &FunctionElement,
    axes: Axes,
    cfg: &DetectCfg,
) -> Option<Polyline> {
    let Some(f) = compiler.compile(&el.expression) else {
        tracing::debug!(id = %el.id, "expression did not compile; element skipped");
        return None;
    };
    let (x_lo, x_hi) = el.domain.unwrap_or((axes.x_min, axes.x_max));
    if !(x_hi > x_lo) || !x_lo.is_finite() || !x_hi.is_finite() {
        return None;
    }
    let points = function_points(&f, el, x_lo, x_hi, cfg.curve_samples);
    if points.len() < 2 {
        tracing::debug!(id = %el.id, "fewer than two finite samples; element skipped");
        return None;
    }
    Some(Polyline {
        owner_id: el.id.clone(),
        kind: ElementKind::Function,
        points,
        x_lo,
        x_hi,
    })
}

fn sample_line(el: &LineElement, axes: Axes, cfg: &DetectCfg) -> Option<Polyline> {
    if !el.start.x.is_finite()
        || !el.start.y.is_finite()
        || !el.end.x.is_finite()
        || !el.end.y.is_finite()
    {
        return None;
    }
    let (points, x_lo, x_hi) = match el.kind {
        LineKind::Segment => {
            let (lo, hi) = ordered(el.start.x, el.end.x);
            (vec![el.start, el.end], lo, hi)
        }
        LineKind::Line => clip_infinite_line(el.start, el.end, axes, cfg)?,
        LineKind::Ray => clip_ray(el.start, el.end, axes, cfg)?,
    };
    Some(Polyline {
        owner_id: el.id.clone(),
        kind: ElementKind::Line,
        points,
        x_lo,
        x_hi,
    })
}

#[inline]
fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Clip an infinite line through `start`/`end` to the viewport rectangle.
/// Near-vertical lines short-circuit to the viewport's y-extremes.
fn clip_infinite_line(
    start: Vector2<f64>,
    end: Vector2<f64>,
    axes: Axes,
    cfg: &DetectCfg,
) -> Option<(Vec<Vector2<f64>>, f64, f64)> {
    let d = end - start;
    if d.norm_squared() < cfg.eps_len * cfg.eps_len {
        return None;
    }
    if d.x.abs() < cfg.eps_len {
        let x = start.x;
        if x < axes.x_min - cfg.eps_box || x > axes.x_max + cfg.eps_box {
            return None;
        }
        let x = x.clamp(axes.x_min, axes.x_max);
        let points = vec![
            Vector2::new(x, axes.y_min),
            Vector2::new(x, axes.y_max),
        ];
        return Some((points, x, x));
    }
    // Parametric intersections with the four viewport edges; keep the two
    // extreme ones that actually land on the box.
    let mut ts: Vec<f64> = Vec::with_capacity(4);
    ts.push((axes.x_min - start.x) / d.x);
    ts.push((axes.x_max - start.x) / d.x);
    if d.y.abs() > cfg.eps_len {
        ts.push((axes.y_min - start.y) / d.y);
        ts.push((axes.y_max - start.y) / d.y);
    }
    let mut t_lo = f64::INFINITY;
    let mut t_hi = f64::NEG_INFINITY;
    for &t in &ts {
        let p = start + d * t;
        if axes.contains_eps(p, cfg.eps_box) {
            t_lo = t_lo.min(t);
            t_hi = t_hi.max(t);
        }
    }
    if t_lo >= t_hi {
        return None;
    }
    let p1 = axes.clamp(start + d * t_lo);
    let p2 = axes.clamp(start + d * t_hi);
    let (x_lo, x_hi) = ordered(p1.x, p2.x);
    Some((vec![p1, p2], x_lo, x_hi))
}

/// Clip a ray to the viewport: the start stays anchored, the free end
/// extends to whichever edge the direction points at. The open side's
/// x-extent is left unbounded in the effective domain.
fn clip_ray(
    start: Vector2<f64>,
    end: Vector2<f64>,
    axes: Axes,
    cfg: &DetectCfg,
) -> Option<(Vec<Vector2<f64>>, f64, f64)> {
    let d = end - start;
    if d.norm_squared() < cfg.eps_len * cfg.eps_len {
        return None;
    }
    // Slab entry/exit parameters. The start stays anchored (t >= 0); a
    // start outside the box is advanced along the ray's own line to the
    // true viewport entry, never snapped sideways onto the border.
    let mut t_entry = 0.0f64;
    let mut t_exit = f64::INFINITY;
    for (s, dv, lo, hi) in [
        (start.x, d.x, axes.x_min, axes.x_max),
        (start.y, d.y, axes.y_min, axes.y_max),
    ] {
        if dv.abs() > cfg.eps_len {
            let t1 = (lo - s) / dv;
            let t2 = (hi - s) / dv;
            t_entry = t_entry.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
        } else if s < lo - cfg.eps_box || s > hi + cfg.eps_box {
            // Parallel to this slab and outside it: never on screen.
            return None;
        }
    }
    if !t_exit.is_finite() || t_entry >= t_exit {
        return None;
    }
    let p1 = axes.clamp(start + d * t_entry);
    let p2 = axes.clamp(start + d * t_exit);
    if (p2 - p1).norm_squared() < cfg.eps_len * cfg.eps_len {
        return None;
    }
    let (x_lo, x_hi) = if d.x > cfg.eps_len {
        (start.x, f64::INFINITY)
    } else if d.x < -cfg.eps_len {
        (f64::NEG_INFINITY, start.x)
    } else {
        (p1.x, p1.x)
    };
    Some((vec![p1, p2], x_lo, x_hi))
}
