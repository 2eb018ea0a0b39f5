//! Stack safety for recursive tree traversal.
//!
//! Rendering and serializing a diagnostics tree recurses once per node level,
//! and hosts routinely hand us trees thousands of levels deep (long chains of
//! single-child wrappers). Every recursive step in the renderer, the
//! serializer and the summary-tree filter is wrapped in
//! [`ensure_sufficient_stack`] so a deep tree grows the stack instead of
//! overflowing it.
//!
//! - **Native targets**: the `stacker` crate grows the stack on demand.
//! - **WASM targets**: passthrough.

/// Remaining stack below which we grow (64KB).
///
/// A single render frame holds a few `String` prefixes and a `Vec` of
/// children, well under this.
const RED_ZONE: usize = 64 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
///
/// ```text
/// fn render_node(&self, node: &DiagnosticsNode) -> String {
///     ensure_sufficient_stack(|| {
///         // ... recurse into children ...
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
