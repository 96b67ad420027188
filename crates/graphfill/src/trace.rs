//! Special-case polygon builders.
//!
//! When the caller already knows exactly which boundaries close the
//! region (two functions, or a function against a visible axis or a
//! vertical line), the polygon is constructed in closed form without
//! running the general ray-casting path.

use nalgebra::Vector2;

use crate::eval::ExprCompiler;
use crate::model::{Axes, BoundaryElement, DetectCfg, FunctionElement, LineKind};
use crate::sampler::function_points;

/// Polygon between two function curves over `[x_min, x_max]`.
///
/// Both curves are sampled independently; whichever is higher at the
/// domain midpoint becomes the upper boundary. The result is the upper
/// samples followed by the lower samples reversed, explicitly closed
/// (first point repeated last). Empty when either expression fails to
/// compile or the domain is degenerate.
pub fn trace_between_curves(
    compiler: &dyn ExprCompiler,
    fa: &FunctionElement,
    fb: &FunctionElement,
    x_min: f64,
    x_max: f64,
    samples: usize,
) -> Vec<Vector2<f64>> {
    if !(x_max > x_min) || !x_min.is_finite() || !x_max.is_finite() {
        return Vec::new();
    }
    let (Some(ca), Some(cb)) = (compiler.compile(&fa.expression), compiler.compile(&fb.expression))
    else {
        tracing::debug!("expression did not compile; no trace");
        return Vec::new();
    };
    let pa = function_points(&ca, fa, x_min, x_max, samples);
    let pb = function_points(&cb, fb, x_min, x_max, samples);
    if pa.len() < 2 || pb.len() < 2 {
        return Vec::new();
    }
    let mid = 0.5 * (x_min + x_max);
    let ya = fa.apply(&ca, mid);
    let yb = fb.apply(&cb, mid);
    let (upper, lower) = if yb.is_finite() && (!ya.is_finite() || ya >= yb) {
        (pa, pb)
    } else {
        (pb, pa)
    };
    let first = upper[0];
    let mut polygon = upper;
    polygon.extend(lower.into_iter().rev());
    polygon.push(first);
    polygon
}

/// Recognized partner shapes for [`trace_bounded_by_elements`].
enum Partner {
    XAxis,
    YAxis,
    VerticalLine(f64),
}

/// Closed-form polygon for a small enumerated set of boundary pairs:
/// function + visible x-axis (area under a curve), function + visible
/// y-axis, function + vertical line. Axis partners count only while the
/// axis is on screen. Falls back to sampling just the first function when
/// no pattern matches; empty when no function is present.
pub fn trace_bounded_by_elements(
    compiler: &dyn ExprCompiler,
    boundaries: &[BoundaryElement],
    drop: Vector2<f64>,
    axes: Axes,
) -> Vec<Vector2<f64>> {
    let cfg = DetectCfg::default();
    let Some(func) = boundaries.iter().find_map(|b| match b {
        BoundaryElement::Function(f) => Some(f),
        BoundaryElement::Line(_) => None,
    }) else {
        return Vec::new();
    };
    let Some(cf) = compiler.compile(&func.expression) else {
        return Vec::new();
    };
    let (d_lo, d_hi) = func.domain.unwrap_or((axes.x_min, axes.x_max));
    if !(d_hi > d_lo) {
        return Vec::new();
    }

    let partner = boundaries
        .iter()
        .filter(|b| b.id() != func.id)
        .find_map(|b| classify_partner(b, axes, &cfg));

    match partner {
        Some(Partner::XAxis) => {
            let mut polygon = function_points(&cf, func, d_lo, d_hi, cfg.curve_samples);
            if polygon.len() < 2 {
                return Vec::new();
            }
            let (first, last) = (polygon[0], polygon[polygon.len() - 1]);
            polygon.push(Vector2::new(last.x, 0.0));
            polygon.push(Vector2::new(first.x, 0.0));
            polygon
        }
        Some(Partner::YAxis) => {
            let mut polygon = function_points(&cf, func, d_lo, d_hi, cfg.curve_samples);
            if polygon.len() < 2 {
                return Vec::new();
            }
            let (first, last) = (polygon[0], polygon[polygon.len() - 1]);
            polygon.push(Vector2::new(0.0, last.y));
            polygon.push(Vector2::new(0.0, first.y));
            polygon
        }
        Some(Partner::VerticalLine(x_line)) => {
            // Sample the span between the drop side of the line and the
            // line itself, then close down the line at the far end's y.
            let (lo, hi) = if drop.x <= x_line {
                (d_lo.min(x_line), x_line)
            } else {
                (x_line, d_hi.max(x_line))
            };
            if !(hi > lo) {
                return function_points(&cf, func, d_lo, d_hi, cfg.curve_samples);
            }
            let mut polygon = function_points(&cf, func, lo, hi, cfg.curve_samples);
            if polygon.len() < 2 {
                return Vec::new();
            }
            let (first, last) = (polygon[0], polygon[polygon.len() - 1]);
            if (hi - x_line).abs() <= (lo - x_line).abs() {
                polygon.push(Vector2::new(x_line, first.y));
            } else {
                polygon.push(Vector2::new(x_line, last.y));
            }
            polygon
        }
        None => function_points(&cf, func, d_lo, d_hi, cfg.curve_samples),
    }
}

/// Classify a non-function boundary as an on-screen axis or a vertical
/// line. The x-axis counts only if `y_min <= 0 <= y_max`; symmetric for
/// the y-axis.
fn classify_partner(b: &BoundaryElement, axes: Axes, cfg: &DetectCfg) -> Option<Partner> {
    let BoundaryElement::Line(l) = b else {
        return None;
    };
    if l.kind != LineKind::Line {
        return None;
    }
    let d = l.end - l.start;
    let horizontal = d.y.abs() < cfg.eps_len && d.x.abs() > cfg.eps_len;
    let vertical = d.x.abs() < cfg.eps_len && d.y.abs() > cfg.eps_len;
    if horizontal && l.start.y.abs() < cfg.eps_dedup {
        if axes.y_min <= 0.0 && 0.0 <= axes.y_max {
            return Some(Partner::XAxis);
        }
        return None;
    }
    if vertical {
        if l.start.x.abs() < cfg.eps_dedup {
            if axes.x_min <= 0.0 && 0.0 <= axes.x_max {
                return Some(Partner::YAxis);
            }
            return None;
        }
        return Some(Partner::VerticalLine(l.start.x));
    }
    None
}
