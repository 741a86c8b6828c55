//! Diagnostic types and rendering for the tern compiler.
//!
//! Every user-facing error flows through [`Diagnostic`]: a stable
//! [`ErrorCode`], a severity, labeled source spans, and optional notes and
//! suggestions. The parser and evaluator build diagnostics; the driver
//! renders them with [`TerminalEmitter`].
//!
//! Error codes are grouped by phase:
//! - `E0xxx` lexer errors
//! - `E1xxx` parser errors
//! - `E6xxx` runtime errors
//! - `Wxxxx` warnings
//!
//! Long-form explanations live in [`ErrorDocs`] and back `--explain`.

mod diagnostic;
mod docs;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use docs::ErrorDocs;
pub use emitter::{ColorMode, TerminalEmitter};
pub use error_code::ErrorCode;
