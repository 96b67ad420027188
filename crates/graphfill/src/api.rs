//! Curated API surface for embedding callers (the editor, the cli).
//!
//! Prefer these re-exports for clarity and consistency; the module tree
//! stays reachable for anything not listed here.

// Entry points
pub use crate::region::detect_region;
pub use crate::trace::{trace_between_curves, trace_bounded_by_elements};

// Input model and configuration
pub use crate::eval::{CurveFn, ExprCompiler};
pub use crate::model::{
    Axes, BoundaryElement, DetectCfg, FunctionElement, LineElement, LineKind, RegionResult,
};

// Ray-casting internals, exposed for diagnostic tooling
pub use crate::model::{Owner, Polyline, RayHit, Segment};
pub use crate::region::{build_segments, cast_fan, cast_ray, refine_transitions, VIEWPORT_ID};
pub use crate::sampler::sample_element;
