//! Region detection for a graph-authoring tool.
//!
//! Given boundary curves (functions of x) and lines (segments, rays,
//! infinite lines) on a 2D coordinate plane plus a drop point inside an
//! apparent pocket, compute the closed polygon bounding that pocket, the
//! boundaries that form it, and its horizontal extent.
//!
//! The engine is a pure, synchronous, stateless computation: visibility
//! ray casting against sampled curves, adaptive bisection at ownership
//! transitions, and curve following so curved boundaries stay curves.
//! Expected negative outcomes (unparsable expressions, no enclosed
//! region) are ordinary `None`/empty values, never errors.

pub mod api;
pub mod eval;
pub mod model;
pub mod region;
pub mod sampler;
pub mod trace;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use model::{Axes, BoundaryElement, DetectCfg, RegionResult};
pub use nalgebra::Vector2 as Vec2;
pub use region::detect_region;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::eval::{CurveFn, ExprCompiler};
    pub use crate::model::{
        Axes, BoundaryElement, DetectCfg, ElementKind, FunctionElement, LineElement, LineKind,
        Owner, Polyline, RayHit, RegionResult, Segment,
    };
    pub use crate::region::{build_segments, cast_fan, cast_ray, detect_region, VIEWPORT_ID};
    pub use crate::trace::{trace_between_curves, trace_bounded_by_elements};
    pub use nalgebra::Vector2 as Vec2;
}
