//! Core value types for region detection.
//!
//! - `DetectCfg`: centralizes epsilons and sampling/refinement budgets.
//! - `Axes`: the viewport rectangle every computation is framed in.
//! - `BoundaryElement`: a function curve or a line/ray/segment, as handed
//!   over by the editor with anchors already resolved to coordinates.
//! - `Polyline`, `Segment`, `RayHit`, `RegionResult`: the request-scoped
//!   intermediates and the final output. All of these are built fresh per
//!   detection call and dropped at return; nothing is shared or cached.

use std::collections::BTreeSet;

use nalgebra::Vector2;

/// Detection configuration (tolerances and budgets).
///
/// The fixed counts double as the latency cap: one call costs
/// O(rays × segments) times a bounded refinement factor.
#[derive(Clone, Copy, Debug)]
pub struct DetectCfg {
    /// Samples per function curve across its domain.
    pub curve_samples: usize,
    /// Uniformly spaced base rays around the drop point.
    pub ray_count: usize,
    /// Maximum bisection depth when the nearest-hit owner changes.
    pub refine_depth: usize,
    /// Angular gap below which a transition is accepted as resolved.
    pub refine_min_angle: f64,
    /// Longest spliced arc before stride-downsampling kicks in.
    pub follow_max_points: usize,
    /// Determinant cutoff for the ray/segment 2×2 solve.
    pub eps_det: f64,
    /// Length tolerance: degenerate segments and zero-distance hits.
    pub eps_len: f64,
    /// Consecutive polygon vertices closer than this are merged.
    pub eps_dedup: f64,
    /// Slack on the segment parameter u outside [0, 1].
    pub u_slack: f64,
    /// Slack for viewport containment checks on clipped polylines.
    pub eps_box: f64,
}

impl Default for DetectCfg {
    fn default() -> Self {
        Self {
            curve_samples: 200,
            ray_count: 120,
            refine_depth: 6,
            refine_min_angle: 1e-3,
            follow_max_points: 30,
            eps_det: 1e-12,
            eps_len: 1e-9,
            eps_dedup: 1e-6,
            u_slack: 1e-9,
            eps_box: 1e-9,
        }
    }
}

/// Viewport bounds. Invariant: `x_max > x_min`, `y_max > y_min`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axes {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Axes {
    #[inline]
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x_min.is_finite()
            && self.x_max.is_finite()
            && self.y_min.is_finite()
            && self.y_max.is_finite()
            && self.x_max > self.x_min
            && self.y_max > self.y_min
    }

    /// Component-wise clamp into the viewport rectangle.
    #[inline]
    pub fn clamp(&self, p: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            p.x.clamp(self.x_min, self.x_max),
            p.y.clamp(self.y_min, self.y_max),
        )
    }

    #[inline]
    pub fn contains_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        p.x >= self.x_min - eps
            && p.x <= self.x_max + eps
            && p.y >= self.y_min - eps
            && p.y <= self.y_max + eps
    }
}

/// Line element flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Segment,
    Ray,
    Line,
}

/// A function curve `y = f(x)`, with the expression still textual; the
/// injected [`crate::eval::ExprCompiler`] turns it numeric per call.
#[derive(Clone, Debug)]
pub struct FunctionElement {
    pub id: String,
    pub expression: String,
    /// Explicit x-domain; the viewport's x-range when absent.
    pub domain: Option<(f64, f64)>,
    /// Evaluation shift: the expression is evaluated at `x - offset_x`.
    pub offset_x: f64,
    /// Output transform: `y * scale_y + offset_y`.
    pub offset_y: f64,
    pub scale_y: f64,
}

impl FunctionElement {
    pub fn new(id: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            expression: expression.into(),
            domain: None,
            offset_x: 0.0,
            offset_y: 0.0,
            scale_y: 1.0,
        }
    }

    /// Evaluate the compiled curve at `x`, applying offsets and scale.
    #[inline]
    pub(crate) fn apply(&self, f: &crate::eval::CurveFn<'_>, x: f64) -> f64 {
        f(x - self.offset_x) * self.scale_y + self.offset_y
    }
}

/// A segment, ray, or infinite line with coordinate anchors.
#[derive(Clone, Debug)]
pub struct LineElement {
    pub id: String,
    pub kind: LineKind,
    pub start: Vector2<f64>,
    pub end: Vector2<f64>,
}

impl LineElement {
    pub fn new(id: impl Into<String>, kind: LineKind, start: Vector2<f64>, end: Vector2<f64>) -> Self {
        Self {
            id: id.into(),
            kind,
            start,
            end,
        }
    }
}

/// A boundary the editor hands over: either a curve or a line flavor.
#[derive(Clone, Debug)]
pub enum BoundaryElement {
    Function(FunctionElement),
    Line(LineElement),
}

impl BoundaryElement {
    #[inline]
    pub fn id(&self) -> &str {
        match self {
            BoundaryElement::Function(f) => &f.id,
            BoundaryElement::Line(l) => &l.id,
        }
    }
}

/// Which element family a polyline came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Function,
    Line,
}

/// Ordered point approximation of one boundary element in the viewport.
///
/// `x_lo`/`x_hi` give the effective x-domain; a ray's open side stays
/// unbounded (`f64::NEG_INFINITY` / `f64::INFINITY`).
#[derive(Clone, Debug)]
pub struct Polyline {
    pub owner_id: String,
    pub kind: ElementKind,
    pub points: Vec<Vector2<f64>>,
    pub x_lo: f64,
    pub x_hi: f64,
}

/// Owner tag for segments and hits: an index into the per-call polyline
/// table, or the reserved synthetic viewport boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Curve(usize),
    Viewport,
}

/// One edge primitive used only for ray intersection. `start_index` is
/// the index of `p1` within the owner polyline so the curve follower can
/// map a hit back to its source arc.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub p1: Vector2<f64>,
    pub p2: Vector2<f64>,
    pub owner: Owner,
    pub start_index: usize,
}

/// Nearest intersection of one cast ray.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub point: Vector2<f64>,
    /// Ray parameter, strictly positive.
    pub t: f64,
    /// Cast angle; refinement inserts keep these monotone per walk.
    pub angle: f64,
    pub owner: Owner,
    pub start_index: usize,
}

/// A detected region: the closed polygon (implicitly closed, ≥3 points),
/// the ids of the elements that bound it, and its horizontal extent.
#[derive(Clone, Debug)]
pub struct RegionResult {
    pub polygon: Vec<Vector2<f64>>,
    pub boundary_ids: BTreeSet<String>,
    pub domain: (f64, f64),
}
