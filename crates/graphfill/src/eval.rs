//! Injected expression-evaluation capability.
//!
//! Expression parsing lives outside this crate: the editor owns a real
//! evaluator, the cli ships a demo one, tests use closures. The core only
//! assumes "compiles to a finite `x -> y` map, or signals failure".

/// A compiled curve: maps x to y. Non-finite outputs are discarded by the
/// sampler, so implementations may return NaN freely.
pub type CurveFn<'a> = Box<dyn Fn(f64) -> f64 + 'a>;

/// Compiles a textual expression into a numeric map.
///
/// `None` means the expression is unparsable; the element then simply
/// contributes nothing to detection. Never an error (expected outcome).
pub trait ExprCompiler {
    fn compile(&self, expression: &str) -> Option<CurveFn<'_>>;
}
