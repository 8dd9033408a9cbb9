//! Native stack growth for deep recursion.
//!
//! Every nested expression, block and call re-enters the evaluator, so a
//! deeply nested program can exhaust the thread's stack long before it
//! reaches the configured call-depth limit. `stacker` grows the stack on
//! demand instead.

/// Bytes that must remain free before recursing.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
#[cfg(not(target_arch = "wasm32"))]
const NEW_SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, NEW_SEGMENT, f)
}

/// WASM manages its own stack; call through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
