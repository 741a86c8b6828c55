//! Stack overflow protection for deeply recursive compiler passes.
//!
//! The parser and the evaluator both recurse on expression structure, so a
//! pathological input like `((((((...))))))` can exhaust the native stack
//! long before any configured recursion limit trips. Wrapping the recursive
//! step in [`ensure_sufficient_stack`] grows the stack on demand instead of
//! crashing the process.
//!
//! On native targets this delegates to `stacker`; on wasm32 it is a
//! passthrough since the engine manages its own stack.

/// Remaining stack below this threshold triggers a growth (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if the remaining space is inside the
/// red zone.
///
/// Call this at every self-recursive entry point that walks expression
/// trees. The check is a few arithmetic instructions in the common case, so
/// it is cheap enough for per-node use.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// wasm32 variant: call through without growing.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
